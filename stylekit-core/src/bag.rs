//! Style bags: the loosely typed key/value stores attached to every node.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::value::is_unset;

/// A flat style-settings object.
///
/// Keys are property names (`margin_top`, `box_shadow_blur`, ...), values are
/// arbitrary JSON. Nested objects are used for `elements` and `typography`.
///
/// Older documents sometimes stored an empty bag as `[]` or `null`; both
/// deserialize to an empty bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyleBag(Map<String, Value>);

impl StyleBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Raw value stored under `key`, including empty values.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Value stored under `key` if it is set (not `null`, not empty).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !is_unset(v))
    }

    /// Whether `key` holds a set value.
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Store a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Nested object under `key` as a bag of its own.
    #[must_use]
    pub fn nested(&self, key: &str) -> Option<Self> {
        match self.0.get(key) {
            Some(Value::Object(map)) => Some(Self(map.clone())),
            _ => None,
        }
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of stored keys, including empty values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying JSON map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for StyleBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for StyleBag {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for StyleBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(Self(map)),
            Value::Null | Value::Array(_) => Ok(Self::new()),
            other => Err(serde::de::Error::custom(format!(
                "expected a style object, found {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_skips_empty_values() {
        let mut bag = StyleBag::new();
        bag.set("margin_top", "");
        bag.set("margin_left", 0);
        assert!(bag.get("margin_top").is_none());
        assert!(bag.raw("margin_top").is_some());
        assert_eq!(bag.get("margin_left"), Some(&json!(0)));
    }

    #[test]
    fn test_legacy_empty_array_deserializes() {
        let bag: StyleBag = serde_json::from_str("[]").expect("should parse");
        assert!(bag.is_empty());
        let bag: StyleBag = serde_json::from_str("null").expect("should parse");
        assert!(bag.is_empty());
        assert!(serde_json::from_str::<StyleBag>("42").is_err());
    }

    #[test]
    fn test_nested() {
        let bag: StyleBag = serde_json::from_value(json!({
            "typography": { "font_size": "18px" },
            "color": "#333"
        }))
        .expect("should parse");
        let typo = bag.nested("typography").expect("nested bag");
        assert_eq!(typo.get("font_size"), Some(&json!("18px")));
        assert!(bag.nested("color").is_none());
    }
}
