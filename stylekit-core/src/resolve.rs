//! Responsive value resolver.
//!
//! Desktop values live under the plain key; tablet and mobile overrides live
//! under `<key>_tablet` / `<key>_mobile`. A missing override falls back to the
//! desktop value, never to the other non-desktop breakpoint.

use std::borrow::Cow;

use serde_json::Value;

use crate::box_model::BoxGroup;
use crate::value::{as_number, as_text, format_number, is_truthy};
use crate::{Breakpoint, StyleBag};

/// Default shadow color.
pub const DEFAULT_SHADOW_COLOR: &str = "rgba(0,0,0,0.1)";

/// A declared per-property default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    /// Numeric default.
    Number(f64),
    /// Textual default.
    Text(&'static str),
}

impl Fallback {
    fn to_value(self) -> Value {
        match self {
            Self::Number(n) => serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.to_string()),
        }
    }
}

static DEFAULTS: &[(&str, Fallback)] = &[
    ("box_shadow_h", Fallback::Number(0.0)),
    ("box_shadow_v", Fallback::Number(4.0)),
    ("box_shadow_blur", Fallback::Number(10.0)),
    ("box_shadow_spread", Fallback::Number(0.0)),
    ("box_shadow_color", Fallback::Text(DEFAULT_SHADOW_COLOR)),
    ("filter_blur", Fallback::Number(0.0)),
    ("filter_brightness", Fallback::Number(100.0)),
    ("filter_contrast", Fallback::Number(100.0)),
    ("filter_saturate", Fallback::Number(100.0)),
    ("filter_grayscale", Fallback::Number(0.0)),
    ("filter_sepia", Fallback::Number(0.0)),
    ("filter_hue_rotate", Fallback::Number(0.0)),
    ("filter_invert", Fallback::Number(0.0)),
    ("filter_opacity", Fallback::Number(100.0)),
    ("transform_scale_x", Fallback::Number(100.0)),
    ("transform_scale_y", Fallback::Number(100.0)),
    ("transform_scale", Fallback::Number(1.0)),
    ("transform_rotate", Fallback::Number(0.0)),
    ("transform_skew_x", Fallback::Number(0.0)),
    ("transform_skew_y", Fallback::Number(0.0)),
    ("transform_translate_x", Fallback::Number(0.0)),
    ("transform_translate_y", Fallback::Number(0.0)),
    ("opacity", Fallback::Number(1.0)),
    ("animation_duration", Fallback::Number(0.6)),
    ("animation_easing", Fallback::Text("ease-out")),
    ("animation_delay", Fallback::Number(0.0)),
];

/// Declared default for a canonical key.
#[must_use]
pub fn property_default(key: &str) -> Option<Fallback> {
    DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, fallback)| *fallback)
}

/// Stored value with breakpoint fallback, without declared defaults.
#[must_use]
pub fn resolve_raw<'a>(bag: &'a StyleBag, key: &str, breakpoint: Breakpoint) -> Option<&'a Value> {
    if breakpoint.is_base() {
        return bag.get(key);
    }
    bag.get(&breakpoint.key(key)).or_else(|| bag.get(key))
}

/// Effective value of `key` at `breakpoint`.
///
/// Falls back to the desktop value, then to the declared default.
///
/// ```
/// use serde_json::json;
/// use stylekit_core::{resolve, Breakpoint, StyleBag};
///
/// let mut bag = StyleBag::new();
/// bag.set("margin_top", "20px");
/// bag.set("margin_top_tablet", "10px");
///
/// assert_eq!(resolve(&bag, "margin_top", Breakpoint::Tablet).unwrap().as_ref(), &json!("10px"));
/// assert_eq!(resolve(&bag, "margin_top", Breakpoint::Mobile).unwrap().as_ref(), &json!("20px"));
/// ```
#[must_use]
pub fn resolve<'a>(bag: &'a StyleBag, key: &str, breakpoint: Breakpoint) -> Option<Cow<'a, Value>> {
    resolve_raw(bag, key, breakpoint)
        .map(Cow::Borrowed)
        .or_else(|| property_default(key).map(|f| Cow::Owned(f.to_value())))
}

/// Text form of the effective value.
#[must_use]
pub fn resolve_text(bag: &StyleBag, key: &str, breakpoint: Breakpoint) -> Option<String> {
    resolve_raw(bag, key, breakpoint)
        .and_then(as_text)
        .or_else(|| match property_default(key)? {
            Fallback::Number(n) => Some(format_number(n)),
            Fallback::Text(s) => Some(s.to_string()),
        })
}

/// Numeric form of the effective value.
///
/// A stored value that does not read as a number falls back to the declared
/// default rather than leaking into generated CSS.
#[must_use]
pub fn resolve_number(bag: &StyleBag, key: &str, breakpoint: Breakpoint) -> Option<f64> {
    resolve_raw(bag, key, breakpoint)
        .and_then(as_number)
        .or_else(|| match property_default(key)? {
            Fallback::Number(n) => Some(n),
            Fallback::Text(_) => None,
        })
}

/// Effective boolean of an arbitrary flag key.
///
/// A non-desktop flag that is present (even `false`) wins; otherwise the base
/// flag decides. Absent means `false`.
#[must_use]
pub fn resolve_flag_key(bag: &StyleBag, key: &str, breakpoint: Breakpoint) -> bool {
    resolve_raw(bag, key, breakpoint).is_some_and(is_truthy)
}

/// Effective `linked` flag of a box group.
#[must_use]
pub fn resolve_flag(bag: &StyleBag, group: BoxGroup, breakpoint: Breakpoint) -> bool {
    resolve_flag_key(bag, group.linked_key(), breakpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> StyleBag {
        serde_json::from_value(value).expect("valid bag")
    }

    #[test]
    fn test_mobile_does_not_fall_through_tablet() {
        let bag = bag(json!({ "margin_top": "20px", "margin_top_tablet": "8px" }));
        assert_eq!(resolve_text(&bag, "margin_top", Breakpoint::Desktop).as_deref(), Some("20px"));
        assert_eq!(resolve_text(&bag, "margin_top", Breakpoint::Tablet).as_deref(), Some("8px"));
        assert_eq!(resolve_text(&bag, "margin_top", Breakpoint::Mobile).as_deref(), Some("20px"));
    }

    #[test]
    fn test_empty_override_falls_back() {
        let bag = bag(json!({ "padding_left": "4px", "padding_left_mobile": "" }));
        assert_eq!(
            resolve_text(&bag, "padding_left", Breakpoint::Mobile).as_deref(),
            Some("4px")
        );
    }

    #[test]
    fn test_declared_defaults() {
        let empty = StyleBag::new();
        assert_eq!(resolve_number(&empty, "box_shadow_v", Breakpoint::Desktop), Some(4.0));
        assert_eq!(
            resolve_text(&empty, "box_shadow_color", Breakpoint::Tablet).as_deref(),
            Some(DEFAULT_SHADOW_COLOR)
        );
        assert_eq!(
            resolve(&empty, "filter_brightness", Breakpoint::Desktop).map(Cow::into_owned),
            Some(json!(100.0))
        );
        assert!(resolve(&empty, "color", Breakpoint::Desktop).is_none());
    }

    #[test]
    fn test_explicit_zero_is_a_value() {
        let bag = bag(json!({ "box_shadow_v": 0 }));
        assert_eq!(resolve_number(&bag, "box_shadow_v", Breakpoint::Desktop), Some(0.0));
    }

    #[test]
    fn test_non_numeric_falls_back_to_default() {
        let bag = bag(json!({ "filter_contrast": "lots" }));
        assert_eq!(resolve_number(&bag, "filter_contrast", Breakpoint::Desktop), Some(100.0));
    }

    #[test]
    fn test_flag_fallback() {
        let bag = bag(json!({ "margin_linked": true, "margin_linked_tablet": false }));
        assert!(resolve_flag(&bag, BoxGroup::Margin, Breakpoint::Desktop));
        assert!(!resolve_flag(&bag, BoxGroup::Margin, Breakpoint::Tablet));
        assert!(resolve_flag(&bag, BoxGroup::Margin, Breakpoint::Mobile));
        assert!(!resolve_flag(&bag, BoxGroup::Padding, Breakpoint::Desktop));
    }

    #[test]
    fn test_resolution_leaves_bag_untouched() {
        let bag = bag(json!({ "margin_top": "20px", "filter_blur": 3 }));
        let before = bag.clone();
        for bp in Breakpoint::ALL {
            let _ = resolve(&bag, "margin_top", bp);
            let _ = resolve_number(&bag, "filter_blur", bp);
        }
        assert_eq!(bag, before);
    }
}
