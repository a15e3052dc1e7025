//! Pattern dictionary: the flat, id-keyed store of pattern definitions

use std::collections::BTreeMap;
use std::fmt;

use crate::error::GrammarError;
use crate::location::LocationSpec;
use crate::source::Node;

use super::inheritance::validate_extends;

/// Prefix of ids allocated by [`PatternDictionary::create_empty`]
const GENERATED_ID_PREFIX: &str = "pattern_";

/// What a pattern represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    External,
    Internal,
    Area,
    Cell,
    Array,
}

impl PatternKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::External => "external",
            PatternKind::Internal => "internal",
            PatternKind::Area => "area",
            PatternKind::Cell => "cell",
            PatternKind::Array => "array",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "external" => Some(PatternKind::External),
            "internal" => Some(PatternKind::Internal),
            "area" => Some(PatternKind::Area),
            "cell" => Some(PatternKind::Cell),
            "array" => Some(PatternKind::Array),
            _ => None,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which component map of a parent a child lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Drawn inside the parent's bounds
    Inner,
    /// Drawn outside the parent, beside one of its edges
    Outer,
}

impl Placement {
    pub const ALL: [Placement; 2] = [Placement::Inner, Placement::Outer];

    pub fn key(self) -> &'static str {
        match self {
            Placement::Inner => "inner",
            Placement::Outer => "outer",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A named placement of one pattern inside another.
///
/// This is a reference by id, not ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRef {
    pub pattern: String,
    pub location: LocationSpec,
}

impl ComponentRef {
    pub fn new(pattern: impl Into<String>, location: LocationSpec) -> Self {
        Self {
            pattern: pattern.into(),
            location,
        }
    }
}

/// A reusable rectangular region definition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pattern {
    pub kind: Option<PatternKind>,
    /// Free-form size spec, opaque to layout
    pub size: Option<String>,
    /// Element pattern of an `array` kind
    pub item_pattern: Option<String>,
    /// Extra properties (style, description, ...)
    pub properties: BTreeMap<String, Node>,
    pub inner: BTreeMap<String, ComponentRef>,
    pub outer: BTreeMap<String, ComponentRef>,
    /// Ordered ids this pattern inherits from
    pub extends: Vec<String>,
}

impl Pattern {
    /// An empty pattern: no kind, no components, no extends
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: PatternKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn components(&self, placement: Placement) -> &BTreeMap<String, ComponentRef> {
        match placement {
            Placement::Inner => &self.inner,
            Placement::Outer => &self.outer,
        }
    }

    pub(crate) fn components_mut(
        &mut self,
        placement: Placement,
    ) -> &mut BTreeMap<String, ComponentRef> {
        match placement {
            Placement::Inner => &mut self.inner,
            Placement::Outer => &mut self.outer,
        }
    }

    /// All components with their placement, inner first
    pub fn all_components(
        &self,
    ) -> impl Iterator<Item = (Placement, &String, &ComponentRef)> + '_ {
        Placement::ALL.into_iter().flat_map(move |placement| {
            self.components(placement)
                .iter()
                .map(move |(name, cref)| (placement, name, cref))
        })
    }

    /// Rewrite every reference to `old` so it names `new`
    fn retarget(&mut self, old: &str, new: &str) {
        for cref in self.inner.values_mut().chain(self.outer.values_mut()) {
            if cref.pattern == old {
                cref.pattern = new.to_string();
            }
        }
        for target in self.extends.iter_mut() {
            if target == old {
                *target = new.to_string();
            }
        }
        let mut seen = std::collections::HashSet::new();
        self.extends.retain(|t| seen.insert(t.clone()));

        if self.item_pattern.as_deref() == Some(old) {
            self.item_pattern = Some(new.to_string());
        }
    }
}

/// A component whose pattern id is not in the dictionary
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingReference {
    pub parent: String,
    pub placement: Placement,
    pub component: String,
    pub target: String,
}

/// The flat set of patterns, keyed by unique id.
///
/// Every edit validates before mutating, so a rejected edit leaves the
/// dictionary unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternDictionary {
    patterns: BTreeMap<String, Pattern>,
}

impl PatternDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.patterns.contains_key(id)
    }

    /// Pattern ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Pattern)> {
        self.patterns.iter()
    }

    /// Insert a new pattern under a fresh id
    pub fn insert(&mut self, id: impl Into<String>, pattern: Pattern) -> Result<(), GrammarError> {
        let id = id.into();
        if self.patterns.contains_key(&id) {
            return Err(GrammarError::duplicate(id));
        }
        self.patterns.insert(id, pattern);
        Ok(())
    }

    pub fn set_kind(&mut self, id: &str, kind: Option<PatternKind>) -> Result<(), GrammarError> {
        self.pattern_mut(id)?.kind = kind;
        Ok(())
    }

    /// Set or clear (`None`) one entry of a pattern's property bag
    pub fn set_property(
        &mut self,
        id: &str,
        key: impl Into<String>,
        value: Option<Node>,
    ) -> Result<(), GrammarError> {
        let pattern = self.pattern_mut(id)?;
        let key = key.into();
        match value {
            Some(value) => {
                pattern.properties.insert(key, value);
            }
            None => {
                pattern.properties.remove(&key);
            }
        }
        Ok(())
    }

    fn pattern_mut(&mut self, id: &str) -> Result<&mut Pattern, GrammarError> {
        self.patterns
            .get_mut(id)
            .ok_or_else(|| GrammarError::unknown_pattern(id))
    }

    /// Next free generated id (`pattern_<n>`)
    pub fn next_pattern_id(&self) -> String {
        let highest = self
            .patterns
            .keys()
            .filter_map(|id| id.strip_prefix(GENERATED_ID_PREFIX))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{}{}", GENERATED_ID_PREFIX, highest + 1)
    }

    /// Create an empty pattern under a generated id and return the id
    pub fn create_empty(&mut self) -> String {
        let id = self.next_pattern_id();
        log::debug!("creating empty pattern '{}'", id);
        self.patterns.insert(id.clone(), Pattern::new());
        id
    }

    /// Rename a pattern, rewriting every reference to it.
    ///
    /// Component refs, `extends` entries and `item_pattern` values naming
    /// `old` all follow the rename in one step.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), GrammarError> {
        if old == new {
            return if self.contains(old) {
                Ok(())
            } else {
                Err(GrammarError::unknown_pattern(old))
            };
        }
        if self.contains(new) {
            log::debug!("rename '{}' -> '{}' rejected: name taken", old, new);
            return Err(GrammarError::duplicate(new));
        }
        let pattern = self
            .patterns
            .remove(old)
            .ok_or_else(|| GrammarError::unknown_pattern(old))?;
        self.patterns.insert(new.to_string(), pattern);

        for pattern in self.patterns.values_mut() {
            pattern.retarget(old, new);
        }
        log::debug!("renamed pattern '{}' -> '{}'", old, new);
        Ok(())
    }

    /// Remove a pattern. References to it are left dangling.
    pub fn remove(&mut self, id: &str) -> Option<Pattern> {
        self.patterns.remove(id)
    }

    /// Look up the pattern a component points to; `None` when it dangles.
    pub fn resolve_component(&self, cref: &ComponentRef) -> Option<&Pattern> {
        self.patterns.get(&cref.pattern)
    }

    pub fn add_component(
        &mut self,
        parent: &str,
        placement: Placement,
        name: impl Into<String>,
        cref: ComponentRef,
    ) -> Result<(), GrammarError> {
        let name = name.into();
        let pattern = self.pattern_mut(parent)?;
        let components = pattern.components_mut(placement);
        if components.contains_key(&name) {
            return Err(GrammarError::component_collision(parent, placement, name));
        }
        components.insert(name, cref);
        Ok(())
    }

    /// Remove a component. The referenced pattern is untouched.
    pub fn remove_component(
        &mut self,
        parent: &str,
        placement: Placement,
        name: &str,
    ) -> Result<ComponentRef, GrammarError> {
        let pattern = self.pattern_mut(parent)?;
        pattern
            .components_mut(placement)
            .remove(name)
            .ok_or_else(|| GrammarError::unknown_component(parent, placement, name))
    }

    pub fn set_location(
        &mut self,
        parent: &str,
        placement: Placement,
        name: &str,
        location: LocationSpec,
    ) -> Result<(), GrammarError> {
        let pattern = self.pattern_mut(parent)?;
        let cref = pattern
            .components_mut(placement)
            .get_mut(name)
            .ok_or_else(|| GrammarError::unknown_component(parent, placement, name))?;
        cref.location = location;
        Ok(())
    }

    /// Add an `extends` edge after checking it keeps the graph acyclic
    pub fn add_extends(&mut self, pattern: &str, target: &str) -> Result<(), GrammarError> {
        if let Err(err) = validate_extends(self, pattern, target) {
            log::debug!("extends {} -> {} rejected: {}", pattern, target, err);
            return Err(err);
        }
        if let Some(p) = self.patterns.get_mut(pattern) {
            p.extends.push(target.to_string());
        }
        Ok(())
    }

    /// Remove an `extends` edge; returns whether it was present
    pub fn remove_extends(&mut self, pattern: &str, target: &str) -> Result<bool, GrammarError> {
        let p = self.pattern_mut(pattern)?;
        let before = p.extends.len();
        p.extends.retain(|t| t != target);
        Ok(p.extends.len() != before)
    }

    /// Components whose pattern is missing from the dictionary
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for (parent, pattern) in &self.patterns {
            for (placement, name, cref) in pattern.all_components() {
                if !self.contains(&cref.pattern) {
                    dangling.push(DanglingReference {
                        parent: parent.clone(),
                        placement,
                        component: name.clone(),
                        target: cref.pattern.clone(),
                    });
                }
            }
        }
        dangling
    }
}
