//! Lint engine for non-fatal defects in pattern grammars.
//!
//! Extraction recovers from several kinds of bad input (dangling component
//! references, unknown `extends` targets, malformed offset tokens) instead of
//! failing. These checks report them, together with overlapping siblings in a
//! computed layout.

use std::fmt;

use crate::layout::PatternLayout;
use crate::location::{is_location_key, parse_offset_strict};
use crate::pattern::{raw_location, PatternDictionary, Placement};
use crate::source::Node;

/// A lint warning about a grammar or layout defect
#[derive(Debug)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Reference,
    Inheritance,
    Location,
    Overlap,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Reference => write!(f, "reference"),
            LintCategory::Inheritance => write!(f, "inheritance"),
            LintCategory::Location => write!(f, "location"),
            LintCategory::Overlap => write!(f, "overlap"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Run the dictionary checks: dangling references and unknown `extends` targets.
pub fn check(dict: &PatternDictionary) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_references(dict, &mut warnings);
    check_extends(dict, &mut warnings);
    warnings
}

// ── Dictionary references ─────────────────────────────────────────

fn check_references(dict: &PatternDictionary, warnings: &mut Vec<LintWarning>) {
    for dangling in dict.dangling_references() {
        warnings.push(LintWarning {
            category: LintCategory::Reference,
            message: format!(
                "{} component \"{}\" of \"{}\" references missing pattern \"{}\"",
                dangling.placement, dangling.component, dangling.parent, dangling.target
            ),
        });
    }
}

fn check_extends(dict: &PatternDictionary, warnings: &mut Vec<LintWarning>) {
    for (id, pattern) in dict.iter() {
        for target in &pattern.extends {
            if !dict.contains(target) {
                warnings.push(LintWarning {
                    category: LintCategory::Inheritance,
                    message: format!("\"{}\" extends unknown pattern \"{}\"", id, target),
                });
            }
        }
    }
}

// ── Raw location tokens ───────────────────────────────────────────

/// Check every `location` in a raw source tree.
///
/// Extraction silently reads malformed tokens as `0`; this reports them, and
/// any key that is not a side spelling, with a dotted path to the value.
pub fn check_source(root: &Node) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    let entries = root
        .get("patterns")
        .and_then(Node::as_map)
        .or_else(|| root.as_map());
    if let Some(entries) = entries {
        for (name, entry) in entries {
            check_entry_locations(name, entry, &mut warnings);
        }
    }
    warnings
}

fn check_entry_locations(path: &str, entry: &Node, warnings: &mut Vec<LintWarning>) {
    for placement in Placement::ALL {
        let Some(children) = entry.get(placement.key()).and_then(Node::as_map) else {
            continue;
        };
        for (name, child) in children {
            let child_path = format!("{}.{}.{}", path, placement, name);
            if let Some(location) = child.get("location") {
                check_location(&child_path, location, warnings);
            }
            if child.get("pattern_definition").is_some() {
                check_entry_locations(&child_path, child, warnings);
            }
        }
    }
}

fn check_location(path: &str, location: &Node, warnings: &mut Vec<LintWarning>) {
    for (key, token) in raw_location(location) {
        if !is_location_key(&key) {
            warnings.push(LintWarning {
                category: LintCategory::Location,
                message: format!("{}: unknown location key \"{}\"", path, key),
            });
            continue;
        }
        if let Err(err) = parse_offset_strict(&token) {
            warnings.push(LintWarning {
                category: LintCategory::Location,
                message: format!("{}.{}: {}; read as 0", path, key, err),
            });
        }
    }
}

// ── Layout overlaps ───────────────────────────────────────────────

/// Report siblings in the same placement map whose bounds overlap
pub fn check_layout(layout: &PatternLayout) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    let components = &layout.components;
    for i in 0..components.len() {
        for j in (i + 1)..components.len() {
            let a = &components[i];
            let b = &components[j];
            if a.placement != b.placement || !a.bounds.intersects(&b.bounds) {
                continue;
            }
            let overlap_w = a.bounds.right().min(b.bounds.right()) - a.bounds.x.max(b.bounds.x);
            let overlap_h =
                a.bounds.bottom().min(b.bounds.bottom()) - a.bounds.y.max(b.bounds.y);
            warnings.push(LintWarning {
                category: LintCategory::Overlap,
                message: format!(
                    "{} components \"{}\" and \"{}\" of \"{}\" overlap by {:.0}x{:.0}px",
                    a.placement, a.name, b.name, layout.pattern, overlap_w, overlap_h
                ),
            });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout_pattern, LayoutConfig, Size};
    use crate::pattern::extract_patterns;

    fn yaml(text: &str) -> Node {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_dangling_and_unknown_extends() {
        let source = yaml(
            r#"
page:
  extends: [ghost]
  inner:
    header: {pattern: missing}
"#,
        );
        let dict = extract_patterns(&source).unwrap();
        let warnings = check(&dict);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].category, LintCategory::Reference);
        assert!(warnings[0].message.contains("\"missing\""));
        assert_eq!(warnings[1].category, LintCategory::Inheritance);
    }

    #[test]
    fn test_malformed_tokens_reported_with_path() {
        let source = yaml(
            r#"
patterns:
  page:
    inner:
      header: {location: {left: wide, top: 0, centre: 1}}
      body:
        pattern_definition: {kind: area}
        outer:
          note: {location: "bottom:2x"}
"#,
        );
        let warnings = check_source(&source);
        let messages: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        assert_eq!(messages.len(), 3, "{:#?}", messages);
        assert!(messages
            .iter()
            .any(|m| m.starts_with("[location] page.inner.header.left:")));
        assert!(messages.iter().any(|m| m.contains("unknown location key \"centre\"")));
        assert!(messages
            .iter()
            .any(|m| m.starts_with("[location] page.inner.body.outer.note.bottom:")));
    }

    #[test]
    fn test_overlapping_siblings() {
        let source = yaml(
            r#"
cell: {}
page:
  inner:
    a: {pattern: cell}
    b: {pattern: cell}
  outer:
    c: {pattern: cell, location: {left: 0}}
"#,
        );
        let dict = extract_patterns(&source).unwrap();
        let layout =
            layout_pattern(&dict, "page", Size::new(600.0, 600.0), &LayoutConfig::default())
                .unwrap();
        let warnings = check_layout(&layout);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::Overlap);
        assert!(warnings[0].message.contains("overlap by 100x70px"));
    }
}
