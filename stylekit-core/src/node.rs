//! Nodes - the styled modules a page is built from.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{StyleBag, StyleResult};

/// Unique identifier for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create a new unique node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from the hyphenated string form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StyleError::InvalidNodeId`] if the string is not a UUID.
    pub fn parse(s: &str) -> StyleResult<Self> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form overrides from the "advanced" tab.
///
/// Passed through verbatim; the engine does not validate custom CSS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedSettings {
    /// Element id attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_id: Option<String>,
    /// Space-separated extra classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    /// Raw CSS declarations appended by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
}

impl AdvancedSettings {
    /// Extra classes, split on whitespace.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.css_class
            .as_deref()
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// A styled module with its four attribute bags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier.
    #[serde(default)]
    pub id: NodeId,
    /// Module type (`button`, `hero`, ...), selects the element schema.
    #[serde(rename = "type")]
    pub module_type: String,
    /// Domain content, opaque to the engine.
    #[serde(default)]
    pub content: serde_json::Value,
    /// Current style bag.
    #[serde(default)]
    pub design: StyleBag,
    /// Older style bag kept for backward compatibility.
    #[serde(default, rename = "legacySettings", alias = "settings")]
    pub legacy_settings: StyleBag,
    /// Id/class/custom CSS overrides.
    #[serde(default)]
    pub advanced: AdvancedSettings,
}

impl Node {
    /// Create a node of the given module type with empty bags.
    #[must_use]
    pub fn new(module_type: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            module_type: module_type.into(),
            content: serde_json::Value::Null,
            design: StyleBag::new(),
            legacy_settings: StyleBag::new(),
            advanced: AdvancedSettings::default(),
        }
    }

    /// Set the design bag.
    #[must_use]
    pub fn with_design(mut self, design: StyleBag) -> Self {
        self.design = design;
        self
    }

    /// Set the legacy settings bag.
    #[must_use]
    pub fn with_legacy_settings(mut self, settings: StyleBag) -> Self {
        self.legacy_settings = settings;
        self
    }

    /// Set the advanced overrides.
    #[must_use]
    pub fn with_advanced(mut self, advanced: AdvancedSettings) -> Self {
        self.advanced = advanced;
        self
    }
}
