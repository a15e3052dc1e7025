//! Pattern extraction - flattens a nested source tree into a pattern dictionary

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::error::GrammarError;
use crate::location::{LocationSpec, RawLocation};
use crate::source::Node;

use super::inheritance::validate_dictionary;
use super::model::{ComponentRef, Pattern, PatternDictionary, PatternKind, Placement};

const PATTERNS_KEY: &str = "patterns";
const DEFINITION_KEY: &str = "pattern_definition";
const ITEM_PATTERN_KEY: &str = "item_pattern";
const LOCATION_KEY: &str = "location";
const PATTERN_KEY: &str = "pattern";
const EXTENDS_KEY: &str = "extends";
const KIND_KEY: &str = "kind";
const SIZE_KEY: &str = "size";

/// Suffix of ids synthesized for inline definitions
const INLINE_SUFFIX: &str = "_inline";

/// Keys with structural meaning that never land in the property bag
const RESERVED_KEYS: &[&str] = &[
    DEFINITION_KEY,
    ITEM_PATTERN_KEY,
    LOCATION_KEY,
    PATTERN_KEY,
    EXTENDS_KEY,
    "inner",
    "outer",
];

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Flatten a source tree into a pattern dictionary.
///
/// The root is either a map with a `patterns` key or the patterns map itself.
/// Inline `pattern_definition`s on components become top-level patterns named
/// `<component>_inline`. Fails on the first id that resolves twice, and on
/// duplicate or cyclic `extends`; no partial dictionary is returned.
pub fn extract_patterns(root: &Node) -> Result<PatternDictionary, GrammarError> {
    let entries = match root.get(PATTERNS_KEY).and_then(Node::as_map) {
        Some(map) => map,
        None => match root.as_map() {
            Some(map) => map,
            None => {
                log::debug!("source root is not a map; no patterns extracted");
                return Ok(PatternDictionary::new());
            }
        },
    };

    let mut extractor = Extractor::default();
    for (name, entry) in entries {
        if entry.as_map().is_none() {
            log::debug!("skipping non-map entry '{}'", name);
            continue;
        }
        extractor.enqueue(name.clone(), entry)?;
    }

    let dict = extractor.run()?;
    validate_dictionary(&dict)?;
    log::debug!("extracted {} patterns", dict.len());
    Ok(dict)
}

/// Worklist over entries still to be turned into patterns.
///
/// Every id is claimed in `seen` when queued, so the walk terminates and a
/// second claim on an id is reported as a duplicate.
#[derive(Default)]
struct Extractor<'a> {
    queue: VecDeque<(String, &'a Node)>,
    seen: HashSet<String>,
}

impl<'a> Extractor<'a> {
    fn enqueue(&mut self, id: String, entry: &'a Node) -> Result<(), GrammarError> {
        if !self.seen.insert(id.clone()) {
            return Err(GrammarError::duplicate(id));
        }
        self.queue.push_back((id, entry));
        Ok(())
    }

    fn run(mut self) -> Result<PatternDictionary, GrammarError> {
        let mut dict = PatternDictionary::new();
        while let Some((id, entry)) = self.queue.pop_front() {
            log::trace!("extracting pattern '{}'", id);
            let pattern = self.extract_entry(entry)?;
            dict.insert(id, pattern)?;
        }
        Ok(dict)
    }

    fn extract_entry(&mut self, entry: &'a Node) -> Result<Pattern, GrammarError> {
        let mut pattern = Pattern::new();
        let Some(fields) = entry.as_map() else {
            return Ok(pattern);
        };

        if let Some(definition) = fields.get(DEFINITION_KEY).and_then(Node::as_map) {
            hoist_definition(&mut pattern, definition);
        }

        for (key, value) in fields {
            match key.as_str() {
                "inner" => self.extract_components(&mut pattern, Placement::Inner, value)?,
                "outer" => self.extract_components(&mut pattern, Placement::Outer, value)?,
                EXTENDS_KEY => pattern.extends = normalize_extends(value),
                k if is_reserved(k) => {}
                _ => hoist_property(&mut pattern, key, value),
            }
        }
        Ok(pattern)
    }

    fn extract_components(
        &mut self,
        pattern: &mut Pattern,
        placement: Placement,
        value: &'a Node,
    ) -> Result<(), GrammarError> {
        let Some(children) = value.as_map() else {
            log::debug!("ignoring non-map {} block", placement);
            return Ok(());
        };

        for (name, child) in children {
            let cref = match child {
                // `header: cell` names the pattern directly
                Node::Str(target) => ComponentRef::new(target.clone(), LocationSpec::new()),
                Node::Map(fields) => {
                    let location = fields
                        .get(LOCATION_KEY)
                        .map(normalize_location)
                        .unwrap_or_default();

                    let target = if fields.contains_key(DEFINITION_KEY) {
                        let inline_id = format!("{}{}", name, INLINE_SUFFIX);
                        log::trace!("hoisting inline definition '{}'", inline_id);
                        self.enqueue(inline_id.clone(), child)?;
                        inline_id
                    } else {
                        fields
                            .get(PATTERN_KEY)
                            .and_then(Node::scalar_text)
                            .unwrap_or_else(|| name.clone())
                    };
                    ComponentRef::new(target, location)
                }
                _ => ComponentRef::new(name.clone(), LocationSpec::new()),
            };
            pattern.components_mut(placement).insert(name.clone(), cref);
        }
        Ok(())
    }
}

/// Copy `pattern_definition` keys onto the pattern.
///
/// `item_pattern` is only meaningful (and only captured) for `array` kinds.
fn hoist_definition(pattern: &mut Pattern, definition: &BTreeMap<String, Node>) {
    if let Some(kind) = definition.get(KIND_KEY) {
        hoist_property(pattern, KIND_KEY, kind);
    }
    let is_array = pattern.kind == Some(PatternKind::Array);

    for (key, value) in definition {
        match key.as_str() {
            KIND_KEY => {}
            ITEM_PATTERN_KEY if is_array => pattern.item_pattern = value.scalar_text(),
            k if is_reserved(k) => {
                log::debug!("ignoring structural key '{}' inside {}", k, DEFINITION_KEY);
            }
            _ => hoist_property(pattern, key, value),
        }
    }
}

/// Place one non-structural key; `kind` and `size` have typed slots.
fn hoist_property(pattern: &mut Pattern, key: &str, value: &Node) {
    match key {
        KIND_KEY => match value.as_str().and_then(PatternKind::from_name) {
            Some(kind) => pattern.kind = Some(kind),
            None if value.is_null() => pattern.kind = None,
            None => {
                log::warn!("unknown pattern kind {:?}; kept as a property", value);
                pattern.properties.insert(key.to_string(), value.clone());
            }
        },
        SIZE_KEY => pattern.size = value.scalar_text(),
        _ => {
            pattern.properties.insert(key.to_string(), value.clone());
        }
    }
}

/// Collect the raw side keys of a `location` value.
///
/// Accepts a map (`{left: 0}`), a list of side names (`[left, top]`, each
/// meaning offset `0`), a list of single-key maps (`[{left: 1}]`), or a
/// delimited string (`"left:0, top:2+"`).
pub fn raw_location(value: &Node) -> RawLocation {
    let mut raw = RawLocation::new();
    match value {
        Node::Map(map) => {
            for (k, v) in map {
                raw.insert(location_key(k), location_value(v));
            }
        }
        Node::Seq(items) => {
            for item in items {
                match item {
                    Node::Str(side) => {
                        raw.insert(location_key(side), "0".to_string());
                    }
                    Node::Map(map) => {
                        for (k, v) in map {
                            raw.insert(location_key(k), location_value(v));
                        }
                    }
                    other => log::debug!("ignoring location item {:?}", other),
                }
            }
        }
        Node::Str(text) => {
            for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (side, offset) = match part.split_once(':') {
                    Some((side, offset)) => (side, offset.trim()),
                    None => (part, ""),
                };
                let offset = if offset.is_empty() { "0" } else { offset };
                raw.insert(location_key(side), offset.to_string());
            }
        }
        Node::Null | Node::Bool(_) | Node::Int(_) | Node::Float(_) => {}
    }
    raw
}

fn location_key(key: &str) -> String {
    key.trim().to_lowercase()
}

fn location_value(value: &Node) -> String {
    match value {
        Node::Null => "0".to_string(),
        other => other.scalar_text().unwrap_or_default(),
    }
}

/// Normalize any accepted `location` spelling into a [`LocationSpec`]
pub fn normalize_location(value: &Node) -> LocationSpec {
    LocationSpec::from_raw(&raw_location(value))
}

/// Normalize `extends` given as a string, a list, or an index-keyed map
pub fn normalize_extends(value: &Node) -> Vec<String> {
    match value {
        Node::Str(s) => vec![s.clone()],
        Node::Seq(items) => items.iter().filter_map(Node::scalar_text).collect(),
        Node::Map(map) => {
            let mut indexed: Vec<(Option<u64>, &String, &Node)> = map
                .iter()
                .map(|(k, v)| (k.trim().parse::<u64>().ok(), k, v))
                .collect();
            // Numeric keys in numeric order, anything else after them
            indexed.sort_by(|a, b| match (a.0, b.0) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.1.cmp(b.1),
            });
            indexed
                .into_iter()
                .filter_map(|(_, _, v)| v.scalar_text())
                .collect()
        }
        _ => Vec::new(),
    }
}

impl PatternDictionary {
    /// Render the dictionary back into an already-flat source tree.
    ///
    /// Extracting the result yields a dictionary equal to `self`.
    pub fn to_source(&self) -> Node {
        let patterns = self
            .iter()
            .map(|(id, pattern)| (id.clone(), pattern_to_source(pattern)))
            .collect();
        Node::from_pairs([(PATTERNS_KEY, Node::Map(patterns))])
    }
}

fn pattern_to_source(pattern: &Pattern) -> Node {
    let mut entry = Node::map();

    let mut definition = Node::map();
    if let Some(kind) = pattern.kind {
        definition.insert(KIND_KEY, Node::str(kind.as_str()));
    }
    if let Some(size) = &pattern.size {
        definition.insert(SIZE_KEY, Node::str(size.clone()));
    }
    if let Some(item) = &pattern.item_pattern {
        definition.insert(ITEM_PATTERN_KEY, Node::str(item.clone()));
    }
    if definition.as_map().is_some_and(|m| !m.is_empty()) {
        entry.insert(DEFINITION_KEY, definition);
    }

    for (key, value) in &pattern.properties {
        entry.insert(key.clone(), value.clone());
    }

    for placement in Placement::ALL {
        let components = pattern.components(placement);
        if components.is_empty() {
            continue;
        }
        let children = components
            .iter()
            .map(|(name, cref)| {
                let mut child = Node::from_pairs([(PATTERN_KEY, Node::str(cref.pattern.clone()))]);
                if !cref.location.is_empty() {
                    let location = cref
                        .location
                        .to_raw()
                        .into_iter()
                        .map(|(side, token)| (side, Node::Str(token)))
                        .collect();
                    child.insert(LOCATION_KEY, Node::Map(location));
                }
                (name.clone(), child)
            })
            .collect();
        entry.insert(placement.key(), Node::Map(children));
    }

    if !pattern.extends.is_empty() {
        let extends = pattern.extends.iter().cloned().map(Node::Str).collect();
        entry.insert(EXTENDS_KEY, Node::Seq(extends));
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{OffsetRange, Side};

    fn yaml(text: &str) -> Node {
        serde_yaml::from_str(text).expect("valid yaml")
    }

    #[test]
    fn test_empty_entry_defaults() {
        let dict = extract_patterns(&yaml("patterns:\n  page: {}\n")).unwrap();
        assert_eq!(dict.get("page"), Some(&Pattern::new()));
    }

    #[test]
    fn test_root_without_patterns_key() {
        let dict = extract_patterns(&yaml("page: {}\ncell: {}\nnote: text\n")).unwrap();
        assert_eq!(dict.len(), 2);
        assert!(!dict.contains("note"));
    }

    #[test]
    fn test_definition_hoisting() {
        let dict = extract_patterns(&yaml(
            r#"
list:
  pattern_definition:
    kind: array
    item_pattern: row
    size: "1x*"
    direction: column
  style: striped
"#,
        ))
        .unwrap();
        let list = dict.get("list").unwrap();
        assert_eq!(list.kind, Some(PatternKind::Array));
        assert_eq!(list.item_pattern.as_deref(), Some("row"));
        assert_eq!(list.size.as_deref(), Some("1x*"));
        assert_eq!(list.properties.get("direction"), Some(&Node::str("column")));
        assert_eq!(list.properties.get("style"), Some(&Node::str("striped")));
    }

    #[test]
    fn test_item_pattern_ignored_without_array_kind() {
        let dict = extract_patterns(&yaml(
            "cell:\n  pattern_definition:\n    kind: cell\n    item_pattern: row\n",
        ))
        .unwrap();
        let cell = dict.get("cell").unwrap();
        assert_eq!(cell.item_pattern, None);
        assert_eq!(cell.properties.get("item_pattern"), Some(&Node::str("row")));
    }

    #[test]
    fn test_component_reference_defaults_to_name() {
        let dict = extract_patterns(&yaml(
            r#"
page:
  inner:
    header: {location: {top: 0}}
    body: {pattern: text_block}
"#,
        ))
        .unwrap();
        let page = dict.get("page").unwrap();
        assert_eq!(page.inner["header"].pattern, "header");
        assert_eq!(page.inner["body"].pattern, "text_block");
        assert_eq!(page.inner["header"].location.top, Some(OffsetRange::exact(0)));
    }

    #[test]
    fn test_inline_definition_synthesizes_id() {
        let dict = extract_patterns(&yaml(
            r#"
page:
  outer:
    caption:
      location: [bottom]
      pattern_definition: {kind: cell}
      font: small
      inner:
        icon: {location: "left:0"}
"#,
        ))
        .unwrap();
        let page = dict.get("page").unwrap();
        assert_eq!(page.outer["caption"].pattern, "caption_inline");
        assert_eq!(page.outer["caption"].location.bottom, Some(OffsetRange::exact(0)));

        let inline = dict.get("caption_inline").unwrap();
        assert_eq!(inline.kind, Some(PatternKind::Cell));
        assert_eq!(inline.properties.get("font"), Some(&Node::str("small")));
        assert!(inline.properties.get("location").is_none());
        assert_eq!(inline.inner["icon"].pattern, "icon");
    }

    #[test]
    fn test_duplicate_inline_id_rejected() {
        let err = extract_patterns(&yaml(
            r#"
header_inline: {}
page:
  inner:
    header:
      pattern_definition: {kind: area}
"#,
        ))
        .unwrap_err();
        assert_eq!(err, GrammarError::duplicate("header_inline"));
    }

    #[test]
    fn test_duplicate_across_nesting_depths_rejected() {
        let err = extract_patterns(&yaml(
            r#"
a:
  inner:
    x: {pattern_definition: {kind: cell}}
b:
  outer:
    x: {pattern_definition: {kind: area}}
"#,
        ))
        .unwrap_err();
        assert_eq!(err, GrammarError::duplicate("x_inline"));
    }

    #[test]
    fn test_location_spellings() {
        let map = normalize_location(&yaml("{left: 0, margin-top: '2+'}"));
        assert_eq!(map.left, Some(OffsetRange::exact(0)));
        assert_eq!(map.top, Some(OffsetRange::at_least(2)));

        let sides = normalize_location(&yaml("[Left, top]"));
        assert_eq!(
            sides,
            LocationSpec::new()
                .with(Side::Left, OffsetRange::exact(0))
                .with(Side::Top, OffsetRange::exact(0))
        );

        let maps = normalize_location(&yaml("[{right: 1}, {bottom: '0..3'}]"));
        assert_eq!(maps.right, Some(OffsetRange::exact(1)));
        assert_eq!(maps.bottom, Some(OffsetRange::between(0, 3)));

        let text = normalize_location(&Node::str("left:1, right , top: 0..*"));
        assert_eq!(text.left, Some(OffsetRange::exact(1)));
        assert_eq!(text.right, Some(OffsetRange::exact(0)));
        assert_eq!(text.top, Some(OffsetRange::at_least(0)));
    }

    #[test]
    fn test_malformed_location_token_recovers() {
        let spec = normalize_location(&yaml("{left: wide}"));
        assert_eq!(spec.left, Some(OffsetRange::exact(0)));
    }

    #[test]
    fn test_extends_spellings() {
        assert_eq!(normalize_extends(&Node::str("base")), vec!["base"]);
        assert_eq!(normalize_extends(&yaml("[a, b]")), vec!["a", "b"]);
        assert_eq!(
            normalize_extends(&yaml("{'10': k, '2': c, '0': a}")),
            vec!["a", "c", "k"]
        );
        assert!(normalize_extends(&Node::Null).is_empty());
    }

    #[test]
    fn test_cyclic_extends_fails_extraction() {
        let err = extract_patterns(&yaml("a: {extends: b}\nb: {extends: a}\n")).unwrap_err();
        assert!(matches!(err, GrammarError::CyclicExtends { .. }));
    }

    #[test]
    fn test_unknown_kind_kept_as_property() {
        let dict = extract_patterns(&yaml("a: {kind: blob}\n")).unwrap();
        let a = dict.get("a").unwrap();
        assert_eq!(a.kind, None);
        assert_eq!(a.properties.get("kind"), Some(&Node::str("blob")));
    }

    #[test]
    fn test_string_component_shorthand() {
        let dict = extract_patterns(&yaml("page:\n  inner:\n    logo: image\n")).unwrap();
        assert_eq!(dict.get("page").unwrap().inner["logo"].pattern, "image");
    }
}
