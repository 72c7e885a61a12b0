//! Property bag merger.
//!
//! Every node carries two style bags: `legacySettings` from older documents
//! and `design` from the current editor. Both may use historical spellings for
//! the same property (`marginTop`, `border_radius_top_left`,
//! `box_shadow_horizontal`). The merger resolves those spellings once, per
//! bag, and then lays `design` over `legacySettings`. Nothing downstream ever
//! sees a non-canonical key.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Deref;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Breakpoint, Node, StyleBag};

/// Canonical key → ordered alias list. The first alias holding a non-empty
/// value wins within a bag.
static ALIASES: &[(&str, &[&str])] = &[
    // Spacing
    ("margin_top", &["margin_top", "marginTop"]),
    ("margin_right", &["margin_right", "marginRight"]),
    ("margin_bottom", &["margin_bottom", "marginBottom"]),
    ("margin_left", &["margin_left", "marginLeft"]),
    ("margin", &["margin"]),
    ("padding_top", &["padding_top", "paddingTop"]),
    ("padding_right", &["padding_right", "paddingRight"]),
    ("padding_bottom", &["padding_bottom", "paddingBottom"]),
    ("padding_left", &["padding_left", "paddingLeft"]),
    // Border
    ("border_width_top", &["border_width_top", "borderWidthTop"]),
    ("border_width_right", &["border_width_right", "borderWidthRight"]),
    ("border_width_bottom", &["border_width_bottom", "borderWidthBottom"]),
    ("border_width_left", &["border_width_left", "borderWidthLeft"]),
    ("border_width", &["border_width", "borderWidth"]),
    ("border_style", &["border_style", "borderStyle"]),
    ("border_color", &["border_color", "borderColor"]),
    (
        "border_radius_tl",
        &["border_radius_tl", "border_radius_top_left", "borderRadiusTopLeft"],
    ),
    (
        "border_radius_tr",
        &["border_radius_tr", "border_radius_top_right", "borderRadiusTopRight"],
    ),
    (
        "border_radius_br",
        &["border_radius_br", "border_radius_bottom_right", "borderRadiusBottomRight"],
    ),
    (
        "border_radius_bl",
        &["border_radius_bl", "border_radius_bottom_left", "borderRadiusBottomLeft"],
    ),
    ("border_radius", &["border_radius", "borderRadius"]),
    // Background and text
    ("background_color", &["background_color", "backgroundColor"]),
    ("text_align", &["text_align", "textAlign"]),
    // Shadow
    ("box_shadow_h", &["box_shadow_h", "box_shadow_horizontal"]),
    ("box_shadow_v", &["box_shadow_v", "box_shadow_vertical"]),
    ("box_shadow", &["box_shadow", "boxShadow"]),
    // Filters: the editor writes `filter_saturation`, older documents `filter_saturate`.
    ("filter_saturate", &["filter_saturation", "filter_saturate"]),
    // Transform
    ("transform_translate_x", &["transform_translate_x", "transform_translateX"]),
    ("transform_translate_y", &["transform_translate_y", "transform_translateY"]),
    ("transform_skew_x", &["transform_skew_x", "transform_skewX"]),
    ("transform_skew_y", &["transform_skew_y", "transform_skewY"]),
    // Position and layering
    ("z_index", &["z_index", "zIndex"]),
];

/// Ordered alias list for a canonical key (just the key itself when it has no
/// alternate spellings).
#[must_use]
pub fn aliases(canonical: &str) -> &'static [&'static str] {
    ALIASES
        .iter()
        .find(|(key, _)| *key == canonical)
        .map_or(&[], |(_, list)| *list)
}

/// Canonical base key and alias rank for a base (unsuffixed) key.
fn lookup(base: &str) -> Option<(&'static str, usize)> {
    ALIASES.iter().find_map(|(canonical, list)| {
        list.iter()
            .position(|alias| *alias == base)
            .map(|rank| (*canonical, rank))
    })
}

/// Canonical spelling of a (possibly breakpoint-suffixed) key.
///
/// ```
/// use stylekit_core::merge::canonical_key;
///
/// assert_eq!(canonical_key("marginTop"), "margin_top");
/// assert_eq!(canonical_key("border_radius_top_left_tablet"), "border_radius_tl_tablet");
/// assert_eq!(canonical_key("color"), "color");
/// ```
#[must_use]
pub fn canonical_key(key: &str) -> Cow<'_, str> {
    canonical_with_rank(key).0
}

fn canonical_with_rank(key: &str) -> (Cow<'_, str>, usize) {
    if let Some((canonical, rank)) = lookup(key) {
        return (Cow::Borrowed(canonical), rank);
    }
    let (base, bp) = Breakpoint::split_key(key);
    if bp.is_base() {
        return (Cow::Borrowed(key), 0);
    }
    match lookup(base) {
        Some((canonical, rank)) => (Cow::Owned(bp.key(canonical).into_owned()), rank),
        None => (Cow::Borrowed(key), 0),
    }
}

/// Rewrite one bag to canonical keys.
///
/// When several spellings of a property hold values, the one declared first
/// in the alias list wins. Empty values are dropped.
#[must_use]
pub fn canonicalize(bag: &StyleBag) -> StyleBag {
    let mut best: HashMap<String, (usize, &Value)> = HashMap::new();
    for (key, value) in bag.iter() {
        if bag.get(key).is_none() {
            continue;
        }
        let (canonical, rank) = canonical_with_rank(key);
        match best.get(canonical.as_ref()) {
            Some((existing, _)) if *existing <= rank => {
                tracing::trace!(key = %key, canonical = %canonical, "alias shadowed by earlier spelling");
            }
            _ => {
                best.insert(canonical.into_owned(), (rank, value));
            }
        }
    }
    best.into_iter()
        .map(|(key, (_, value))| (key, value.clone()))
        .collect::<Map<String, Value>>()
        .into()
}

/// The merged, canonical style bag of one node.
///
/// Lookups through [`EffectiveStyleBag::get`] accept any alias spelling and
/// are redirected to the canonical key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EffectiveStyleBag(StyleBag);

impl EffectiveStyleBag {
    /// Value for `key` under any of its spellings.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(&canonical_key(key))
    }

    /// Borrow the canonical bag.
    #[must_use]
    pub fn as_bag(&self) -> &StyleBag {
        &self.0
    }

    /// Consume into the canonical bag.
    #[must_use]
    pub fn into_bag(self) -> StyleBag {
        self.0
    }
}

impl Deref for EffectiveStyleBag {
    type Target = StyleBag;

    fn deref(&self) -> &StyleBag {
        &self.0
    }
}

/// Merge two bags: canonicalize each, then `design` wins for every key it
/// holds a value for.
#[must_use]
pub fn merge(legacy: &StyleBag, design: &StyleBag) -> EffectiveStyleBag {
    let mut merged = canonicalize(legacy).into_map();
    for (key, value) in canonicalize(design).into_map() {
        merged.insert(key, value);
    }
    EffectiveStyleBag(merged.into())
}

/// Effective style bag of a node.
#[must_use]
pub fn effective(node: &Node) -> EffectiveStyleBag {
    merge(&node.legacy_settings, &node.design)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> StyleBag {
        serde_json::from_value(value).expect("valid bag")
    }

    #[test]
    fn test_design_wins_over_legacy() {
        let legacy = bag(json!({ "backgroundColor": "#ffffff", "textAlign": "left" }));
        let design = bag(json!({ "backgroundColor": "#112233" }));
        let merged = merge(&legacy, &design);

        assert_eq!(merged.get("backgroundColor"), Some(&json!("#112233")));
        assert_eq!(merged.get("background_color"), Some(&json!("#112233")));
        assert_eq!(merged.get("text_align"), Some(&json!("left")));
        // Only canonical keys are stored.
        assert!(merged.raw("backgroundColor").is_none());
    }

    #[test]
    fn test_alias_order_within_bag() {
        let design = bag(json!({
            "border_radius_top_left": "4px",
            "border_radius_tl": "8px",
        }));
        let merged = merge(&StyleBag::new(), &design);
        assert_eq!(merged.get("border_radius_tl"), Some(&json!("8px")));

        // The later spelling fills in when the earlier one is empty.
        let design = bag(json!({
            "box_shadow_h": "",
            "box_shadow_horizontal": "3px",
        }));
        let merged = merge(&StyleBag::new(), &design);
        assert_eq!(merged.get("box_shadow_h"), Some(&json!("3px")));
    }

    #[test]
    fn test_alias_resolution_is_per_bag() {
        // Legacy uses the preferred spelling, design a later one: design
        // still wins because precedence between bags is applied after
        // alias resolution inside each bag.
        let legacy = bag(json!({ "filter_saturation": 50 }));
        let design = bag(json!({ "filter_saturate": 80 }));
        let merged = merge(&legacy, &design);
        assert_eq!(merged.get("filter_saturate"), Some(&json!(80)));
    }

    #[test]
    fn test_empty_design_value_does_not_mask_legacy() {
        let legacy = bag(json!({ "margin_top": "12px" }));
        let design = bag(json!({ "marginTop": "" }));
        let merged = merge(&legacy, &design);
        assert_eq!(merged.get("margin_top"), Some(&json!("12px")));
    }

    #[test]
    fn test_suffixed_aliases() {
        let design = bag(json!({ "marginTop_tablet": "5px", "paddingLeft_mobile": 3 }));
        let merged = merge(&StyleBag::new(), &design);
        assert_eq!(merged.raw("margin_top_tablet"), Some(&json!("5px")));
        assert_eq!(merged.raw("padding_left_mobile"), Some(&json!(3)));
    }

    #[test]
    fn test_aliases_table() {
        assert_eq!(aliases("margin_top"), &["margin_top", "marginTop"]);
        assert!(aliases("unknown_key").is_empty());
    }
}
