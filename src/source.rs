//! Nested source tree consumed by the pattern extractor
//!
//! Hosts parse whatever textual notation they use (YAML, TOML, JSON) into a
//! [`Node`] tree. The extractor never sees host-specific types.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A value in the nested source tree.
///
/// Map keys are always strings; scalar keys (`0:`, `true:`) are read as their
/// text so index-keyed maps load from any notation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

impl Node {
    /// Create an empty map node
    pub fn map() -> Self {
        Node::Map(BTreeMap::new())
    }

    /// Create a string node
    pub fn str(value: impl Into<String>) -> Self {
        Node::Str(value.into())
    }

    /// Build a map node from key/value pairs
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Node)>) -> Self {
        Node::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Insert into a map node. No-op on other variants.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        if let Node::Map(map) = self {
            map.insert(key.into(), value);
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|m| m.get(key))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Scalar rendered as text, the way location offsets and ids are read.
    ///
    /// Returns `None` for null, sequences and maps.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Node::Bool(b) => Some(b.to_string()),
            Node::Int(i) => Some(i.to_string()),
            Node::Float(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INT => {
                Some(format!("{}", *f as i64))
            }
            Node::Float(f) => Some(f.to_string()),
            Node::Str(s) => Some(s.clone()),
            Node::Null | Node::Seq(_) | Node::Map(_) => None,
        }
    }

    /// Recursively drop nulls, empty strings and containers left empty.
    ///
    /// Returns `None` when nothing survives.
    pub fn pruned(&self) -> Option<Node> {
        match self {
            Node::Null => None,
            Node::Str(s) if s.is_empty() => None,
            Node::Map(map) => {
                let cleaned: BTreeMap<String, Node> = map
                    .iter()
                    .filter_map(|(k, v)| v.pruned().map(|v| (k.clone(), v)))
                    .collect();
                if cleaned.is_empty() {
                    None
                } else {
                    Some(Node::Map(cleaned))
                }
            }
            Node::Seq(items) => {
                let cleaned: Vec<Node> = items.iter().filter_map(Node::pruned).collect();
                if cleaned.is_empty() {
                    None
                } else {
                    Some(Node::Seq(cleaned))
                }
            }
            other => Some(other.clone()),
        }
    }
}

/// Floats below this magnitude convert to `i64` without loss
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, sequence or map")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(i64::try_from(v).map_or(Node::Float(v as f64), Node::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::Str(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Seq(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Node, A::Error> {
        let mut map = BTreeMap::new();
        while let Some((MapKey(key), value)) = access.next_entry::<MapKey, Node>()? {
            map.insert(key, value);
        }
        Ok(Node::Map(map))
    }
}

/// Map key read from any scalar
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = Node::deserialize(deserializer)?;
        match key {
            Node::Null => Ok(MapKey("null".to_string())),
            other => other
                .scalar_text()
                .map(MapKey)
                .ok_or_else(|| de::Error::custom("map keys must be scalars")),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Str(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Str(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Seq(value)
    }
}
