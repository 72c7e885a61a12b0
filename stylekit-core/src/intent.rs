//! Style edit intents and the reducer that applies them to a `design` bag.
//!
//! Editors never write bag keys directly. They dispatch a [`StyleIntent`];
//! the reducer canonicalizes the key, applies the breakpoint suffix and routes
//! box-side writes through the linked-sides model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::box_model::{self, BoxGroup, Side};
use crate::color::hex_to_rgba;
use crate::merge::{aliases, canonical_key};
use crate::schema::ElementState;
use crate::value::{is_truthy, is_unset};
use crate::{Breakpoint, NodeId, StyleBag, StyleError, StyleResult};

/// Alpha applied when a picker hands over an opaque hex shadow color.
pub const DEFAULT_SHADOW_ALPHA: f64 = 0.1;

/// Named box-shadow presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowPreset {
    /// Zeroed shadow, disabled.
    None,
    /// `0 2px 4px` at 10%.
    Subtle,
    /// `0 4px 12px` at 15%.
    Medium,
    /// `0 10px 30px` at 20%.
    Large,
    /// `0 2px 8px` at 25%.
    Sharp,
    /// `0 20px 50px` at 10%.
    Soft,
    /// Inset `0 2px 4px` at 10%.
    InsetSubtle,
}

/// Concrete shadow fields of a preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowValues {
    /// Horizontal offset in px.
    pub h: f64,
    /// Vertical offset in px.
    pub v: f64,
    /// Blur radius in px.
    pub blur: f64,
    /// Spread radius in px.
    pub spread: f64,
    /// Shadow color.
    pub color: &'static str,
    /// Inner shadow.
    pub inset: bool,
}

impl ShadowPreset {
    /// All presets.
    pub const ALL: [Self; 7] = [
        Self::None,
        Self::Subtle,
        Self::Medium,
        Self::Large,
        Self::Sharp,
        Self::Soft,
        Self::InsetSubtle,
    ];

    /// Snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Subtle => "subtle",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Sharp => "sharp",
            Self::Soft => "soft",
            Self::InsetSubtle => "inset_subtle",
        }
    }

    /// Field values written by the preset.
    #[must_use]
    pub const fn values(self) -> ShadowValues {
        let (v, blur, color, inset) = match self {
            Self::None => (0.0, 0.0, "rgba(0,0,0,0)", false),
            Self::Subtle => (2.0, 4.0, "rgba(0,0,0,0.1)", false),
            Self::Medium => (4.0, 12.0, "rgba(0,0,0,0.15)", false),
            Self::Large => (10.0, 30.0, "rgba(0,0,0,0.2)", false),
            Self::Sharp => (2.0, 8.0, "rgba(0,0,0,0.25)", false),
            Self::Soft => (20.0, 50.0, "rgba(0,0,0,0.1)", false),
            Self::InsetSubtle => (2.0, 4.0, "rgba(0,0,0,0.1)", true),
        };
        ShadowValues {
            h: 0.0,
            v,
            blur,
            spread: 0.0,
            color,
            inset,
        }
    }
}

impl fmt::Display for ShadowPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShadowPreset {
    type Err = StyleError;

    fn from_str(s: &str) -> StyleResult<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| StyleError::UnknownPreset(s.to_string()))
    }
}

/// A single edit to a node's `design` bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleAction {
    /// Set a property. Box-side keys honour the group's `linked` flag.
    Set {
        /// Property key, any alias spelling.
        key: String,
        /// New value; empty clears.
        value: Value,
    },
    /// Remove a property under every spelling.
    Clear {
        /// Property key, any alias spelling.
        key: String,
    },
    /// Write one side of a box group.
    SetSide {
        /// Box group.
        group: BoxGroup,
        /// Side or corner.
        side: Side,
        /// New value, normalized to a CSS length.
        value: Value,
    },
    /// Flip the `linked` flag of a box group.
    ToggleLink {
        /// Box group.
        group: BoxGroup,
    },
    /// Set one property of an element state under `elements`.
    SetElementStyle {
        /// Element key from the module schema.
        element: String,
        /// Interaction state.
        state: ElementState,
        /// Property key, any alias spelling.
        key: String,
        /// New value; empty clears.
        value: Value,
    },
    /// Overwrite the shadow fields with a preset.
    ApplyShadowPreset {
        /// Preset to apply.
        preset: ShadowPreset,
    },
    /// Set the shadow color; hex colors are converted to `rgba`.
    SetShadowColor {
        /// Color from the picker.
        color: String,
        /// Alpha for hex colors, 0.1 when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alpha: Option<f64>,
    },
}

/// An action addressed to one node at one breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleIntent {
    /// Target node.
    pub node_id: NodeId,
    /// Breakpoint the edit applies to.
    #[serde(default)]
    pub breakpoint: Breakpoint,
    /// The edit.
    pub action: StyleAction,
}

impl StyleIntent {
    /// Create an intent.
    #[must_use]
    pub fn new(node_id: NodeId, breakpoint: Breakpoint, action: StyleAction) -> Self {
        Self {
            node_id,
            breakpoint,
            action,
        }
    }
}

/// Write `value` under the canonical `base` key at a breakpoint, dropping any
/// other spelling of the same key there.
fn write_canonical(map: &mut Map<String, Value>, base: &str, value: Value, breakpoint: Breakpoint) {
    for alias in aliases(base) {
        map.remove(&*breakpoint.key(alias));
    }
    let key = breakpoint.key(base).into_owned();
    if is_unset(&value) {
        map.remove(&key);
    } else {
        map.insert(key, value);
    }
}

fn write(bag: &mut StyleBag, base: &str, value: Value, breakpoint: Breakpoint) {
    let mut map = std::mem::take(bag).into_map();
    write_canonical(&mut map, base, value, breakpoint);
    *bag = map.into();
}

fn take_object(map: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match map.remove(key) {
        Some(Value::Object(inner)) => inner,
        _ => Map::new(),
    }
}

fn set_element_style(
    bag: &mut StyleBag,
    element: &str,
    state: ElementState,
    key: &str,
    value: Value,
    breakpoint: Breakpoint,
) {
    let Some(base) = target_key(key, breakpoint) else {
        return;
    };
    let mut elements = match bag.remove("elements") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let mut states = take_object(&mut elements, element);
    let mut styles = take_object(&mut states, state.name());

    write_canonical(&mut styles, &base, value, breakpoint);

    if !styles.is_empty() {
        states.insert(state.name().to_string(), Value::Object(styles));
    }
    if !states.is_empty() {
        elements.insert(element.to_string(), Value::Object(states));
    }
    if !elements.is_empty() {
        bag.set("elements", Value::Object(elements));
    }
}

fn apply_preset(bag: &mut StyleBag, preset: ShadowPreset, breakpoint: Breakpoint) {
    let values = preset.values();
    let px = |n: f64| Value::String(format!("{}px", crate::value::format_number(n)));
    write(bag, "box_shadow_h", px(values.h), breakpoint);
    write(bag, "box_shadow_v", px(values.v), breakpoint);
    write(bag, "box_shadow_blur", px(values.blur), breakpoint);
    write(bag, "box_shadow_spread", px(values.spread), breakpoint);
    write(bag, "box_shadow_color", values.color.into(), breakpoint);
    write(bag, "box_shadow_inset", values.inset.into(), breakpoint);
    write(
        bag,
        "box_shadow_enabled",
        (preset != ShadowPreset::None).into(),
        breakpoint,
    );
}

/// Canonical base key an action may write at `breakpoint`.
///
/// A key that carries the suffix of another breakpoint is refused.
fn target_key(key: &str, breakpoint: Breakpoint) -> Option<String> {
    let canonical = canonical_key(key);
    let (base, suffix) = Breakpoint::split_key(&canonical);
    if suffix.is_base() || suffix == breakpoint {
        Some(base.to_string())
    } else {
        tracing::debug!(
            key = %key,
            breakpoint = %breakpoint,
            "key suffix does not match the intent breakpoint, ignoring"
        );
        None
    }
}

/// Set or clear one key. Box sides and `linked` flags go through the box
/// model so linked sides never disagree.
fn set_key(bag: &mut StyleBag, key: &str, value: &Value, breakpoint: Breakpoint) {
    let Some(base) = target_key(key, breakpoint) else {
        return;
    };
    if let Some(group) = BoxGroup::for_linked_key(&base) {
        let linked = (!is_unset(value)).then(|| is_truthy(value));
        box_model::set_linked(bag, group, linked, breakpoint);
    } else if let Some((group, side)) = BoxGroup::for_side_key(&base) {
        if is_unset(value) {
            box_model::clear_side(bag, group, side, breakpoint);
        } else {
            box_model::set_side(bag, group, side, value.clone(), breakpoint);
        }
    } else {
        write(bag, &base, value.clone(), breakpoint);
    }
}

/// Apply one action to a `design` bag at a breakpoint.
pub fn apply_action(bag: &mut StyleBag, action: &StyleAction, breakpoint: Breakpoint) {
    match action {
        StyleAction::Set { key, value } => set_key(bag, key, value, breakpoint),
        StyleAction::Clear { key } => set_key(bag, key, &Value::Null, breakpoint),
        StyleAction::SetSide { group, side, value } => {
            box_model::set_side(bag, *group, *side, value.clone(), breakpoint);
        }
        StyleAction::ToggleLink { group } => {
            box_model::toggle_link(bag, *group, breakpoint);
        }
        StyleAction::SetElementStyle {
            element,
            state,
            key,
            value,
        } => set_element_style(bag, element, *state, key, value.clone(), breakpoint),
        StyleAction::ApplyShadowPreset { preset } => apply_preset(bag, *preset, breakpoint),
        StyleAction::SetShadowColor { color, alpha } => {
            let stored = if color.trim_start().starts_with('#') || alpha.is_some() {
                hex_to_rgba(color, alpha.unwrap_or(DEFAULT_SHADOW_ALPHA))
                    .unwrap_or_else(|| color.clone())
            } else {
                color.clone()
            };
            write(bag, "box_shadow_color", Value::String(stored), breakpoint);
        }
    }
}
