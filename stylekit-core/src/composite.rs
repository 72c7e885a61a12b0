//! Composite CSS builder.
//!
//! Folds groups of atomic bag fields (`box_shadow_h`, `filter_blur`,
//! `margin_top`, ...) into single CSS property values. Every group has a fixed
//! emission order and a neutral value per field; a group whose fields are all
//! neutral is omitted, so repeated composition of an untouched bag stays empty.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::box_model::BoxGroup;
use crate::resolve::{
    property_default, resolve_flag_key, resolve_number, resolve_raw, resolve_text, Fallback,
};
use crate::value::{as_text, css_length, format_number, is_zero_length};
use crate::{Breakpoint, StyleBag};

/// A named CSS property assembled from several bag fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeGroup {
    /// `box-shadow` from `box_shadow_*`.
    BoxShadow,
    /// `filter` from `filter_*`.
    Filter,
    /// `transform` from `transform_*`.
    Transform,
    /// `margin` shorthand.
    Margin,
    /// `padding` shorthand.
    Padding,
    /// `border-width` shorthand.
    BorderWidth,
    /// `border-radius` shorthand.
    BorderRadius,
}

impl CompositeGroup {
    /// All groups.
    pub const ALL: [Self; 7] = [
        Self::BoxShadow,
        Self::Filter,
        Self::Transform,
        Self::Margin,
        Self::Padding,
        Self::BorderWidth,
        Self::BorderRadius,
    ];

    /// CSS property the group produces.
    #[must_use]
    pub const fn css_property(self) -> &'static str {
        match self {
            Self::BoxShadow => "box-shadow",
            Self::Filter => "filter",
            Self::Transform => "transform",
            Self::Margin => BoxGroup::Margin.css_property(),
            Self::Padding => BoxGroup::Padding.css_property(),
            Self::BorderWidth => BoxGroup::BorderWidth.css_property(),
            Self::BorderRadius => BoxGroup::BorderRadius.css_property(),
        }
    }
}

impl From<BoxGroup> for CompositeGroup {
    fn from(group: BoxGroup) -> Self {
        match group {
            BoxGroup::Margin => Self::Margin,
            BoxGroup::Padding => Self::Padding,
            BoxGroup::BorderWidth => Self::BorderWidth,
            BoxGroup::BorderRadius => Self::BorderRadius,
        }
    }
}

/// Filter functions in emission order: key, CSS function, unit.
const FILTER_TERMS: [(&str, &str, &str); 9] = [
    ("filter_blur", "blur", "px"),
    ("filter_brightness", "brightness", "%"),
    ("filter_contrast", "contrast", "%"),
    ("filter_saturate", "saturate", "%"),
    ("filter_grayscale", "grayscale", "%"),
    ("filter_sepia", "sepia", "%"),
    ("filter_hue_rotate", "hue-rotate", "deg"),
    ("filter_invert", "invert", "%"),
    ("filter_opacity", "opacity", "%"),
];

/// Typography fields, all passed through as `font-family`, `font-size`, ...
const TYPOGRAPHY_FIELDS: [&str; 7] = [
    "font_family",
    "font_size",
    "font_weight",
    "line_height",
    "letter_spacing",
    "text_transform",
    "color",
];

const POSITION_OFFSETS: [(&str, &str); 4] = [
    ("position_top", "top"),
    ("position_right", "right"),
    ("position_bottom", "bottom"),
    ("position_left", "left"),
];

/// Keys consumed by the builder itself or carrying editor state; never passed
/// through as raw CSS.
const ENGINE_KEYS: &[&str] = &[
    "box_shadow_enabled",
    "box_shadow_h",
    "box_shadow_v",
    "box_shadow_blur",
    "box_shadow_spread",
    "box_shadow_color",
    "box_shadow_inset",
    "box_shadow",
    "filter_blur",
    "filter_brightness",
    "filter_contrast",
    "filter_saturate",
    "filter_grayscale",
    "filter_sepia",
    "filter_hue_rotate",
    "filter_invert",
    "filter_opacity",
    "transform_scale_x",
    "transform_scale_y",
    "transform_scale",
    "transform_rotate",
    "transform_skew_x",
    "transform_skew_y",
    "transform_translate_x",
    "transform_translate_y",
    "transform_origin",
    "margin",
    "padding",
    "border_width",
    "border_radius",
    "border_style",
    "border_color",
    "background_color",
    "text_align",
    "position",
    "position_top",
    "position_right",
    "position_bottom",
    "position_left",
    "z_index",
    "opacity",
    "typography",
    "elements",
    "animation_enabled",
    "animation_type",
    "animation_duration",
    "animation_delay",
    "animation_easing",
    "hover_enabled",
    "scroll_trigger_enabled",
    "scroll_trigger_point",
    "scroll_animate_once",
    "background_type",
    "gradient_type",
    "hover_color",
    "hover_border_color",
    "hover_background",
];

fn is_engine_key(key: &str) -> bool {
    ENGINE_KEYS.contains(&key) || key.ends_with("_linked") || BoxGroup::for_side_key(key).is_some()
}

fn neutral(key: &str) -> f64 {
    match property_default(key) {
        Some(Fallback::Number(n)) => n,
        _ => 0.0,
    }
}

/// Number at `key`, or its neutral value.
fn number(bag: &StyleBag, key: &str, breakpoint: Breakpoint) -> f64 {
    resolve_number(bag, key, breakpoint).unwrap_or_else(|| neutral(key))
}

/// Build one composite property value.
///
/// Returns `None` when every field of the group is neutral. A disabled
/// structured shadow falls back to a raw `box_shadow` string when one is
/// stored.
///
/// ```
/// use stylekit_core::{build_composite, Breakpoint, CompositeGroup, StyleBag};
///
/// let mut bag = StyleBag::new();
/// bag.set("filter_contrast", 120);
/// bag.set("filter_blur", 2);
/// assert_eq!(
///     build_composite(&bag, CompositeGroup::Filter, Breakpoint::Desktop).as_deref(),
///     Some("blur(2px) contrast(120%)")
/// );
/// ```
#[must_use]
pub fn build_composite(
    bag: &StyleBag,
    group: CompositeGroup,
    breakpoint: Breakpoint,
) -> Option<String> {
    match group {
        CompositeGroup::BoxShadow => box_shadow(bag, breakpoint),
        CompositeGroup::Filter => filter(bag, breakpoint),
        CompositeGroup::Transform => transform(bag, breakpoint),
        CompositeGroup::Margin => box_shorthand(bag, BoxGroup::Margin, breakpoint),
        CompositeGroup::Padding => box_shorthand(bag, BoxGroup::Padding, breakpoint),
        CompositeGroup::BorderWidth => box_shorthand(bag, BoxGroup::BorderWidth, breakpoint),
        CompositeGroup::BorderRadius => box_shorthand(bag, BoxGroup::BorderRadius, breakpoint),
    }
}

fn box_shadow(bag: &StyleBag, breakpoint: Breakpoint) -> Option<String> {
    if !resolve_flag_key(bag, "box_shadow_enabled", breakpoint) {
        return resolve_text(bag, "box_shadow", breakpoint);
    }
    let inset = if resolve_flag_key(bag, "box_shadow_inset", breakpoint) {
        "inset "
    } else {
        ""
    };
    let color = resolve_text(bag, "box_shadow_color", breakpoint)
        .unwrap_or_else(|| crate::resolve::DEFAULT_SHADOW_COLOR.to_string());
    Some(format!(
        "{inset}{}px {}px {}px {}px {color}",
        format_number(number(bag, "box_shadow_h", breakpoint)),
        format_number(number(bag, "box_shadow_v", breakpoint)),
        format_number(number(bag, "box_shadow_blur", breakpoint)),
        format_number(number(bag, "box_shadow_spread", breakpoint)),
    ))
}

fn filter(bag: &StyleBag, breakpoint: Breakpoint) -> Option<String> {
    let terms: Vec<String> = FILTER_TERMS
        .iter()
        .filter_map(|(key, function, unit)| {
            let value = number(bag, key, breakpoint);
            #[allow(clippy::float_cmp)]
            let is_neutral = value == neutral(key);
            (!is_neutral).then(|| format!("{function}({}{unit})", format_number(value)))
        })
        .collect();
    (!terms.is_empty()).then(|| terms.join(" "))
}

#[allow(clippy::float_cmp)]
fn transform(bag: &StyleBag, breakpoint: Breakpoint) -> Option<String> {
    let mut parts = Vec::new();

    let scale_x = number(bag, "transform_scale_x", breakpoint);
    let scale_y = number(bag, "transform_scale_y", breakpoint);
    let factor = number(bag, "transform_scale", breakpoint);
    if scale_x != 100.0 || scale_y != 100.0 {
        parts.push(format!(
            "scale({}, {})",
            format_number(scale_x / 100.0),
            format_number(scale_y / 100.0)
        ));
    } else if factor != 1.0 {
        parts.push(format!("scale({})", format_number(factor)));
    }

    let rotate = number(bag, "transform_rotate", breakpoint);
    if rotate != 0.0 {
        parts.push(format!("rotate({}deg)", format_number(rotate)));
    }

    let skew_x = number(bag, "transform_skew_x", breakpoint);
    let skew_y = number(bag, "transform_skew_y", breakpoint);
    if skew_x != 0.0 || skew_y != 0.0 {
        parts.push(format!(
            "skew({}deg, {}deg)",
            format_number(skew_x),
            format_number(skew_y)
        ));
    }

    let translate_x = number(bag, "transform_translate_x", breakpoint);
    let translate_y = number(bag, "transform_translate_y", breakpoint);
    if translate_x != 0.0 || translate_y != 0.0 {
        parts.push(format!(
            "translate({}px, {}px)",
            format_number(translate_x),
            format_number(translate_y)
        ));
    }

    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Side values at a breakpoint, `None` for sides that are unset.
fn side_values(bag: &StyleBag, group: BoxGroup, breakpoint: Breakpoint) -> [Option<String>; 4] {
    group
        .side_keys()
        .map(|key| resolve_raw(bag, key, breakpoint).and_then(css_length))
}

fn box_shorthand(bag: &StyleBag, group: BoxGroup, breakpoint: Breakpoint) -> Option<String> {
    let values = side_values(bag, group, breakpoint);
    if values.iter().all(Option::is_none) {
        return resolve_raw(bag, group.prefix(), breakpoint)
            .and_then(css_length)
            .filter(|unified| !is_zero_length(unified));
    }
    if values.iter().flatten().all(|v| is_zero_length(v)) {
        return None;
    }
    let sides: Vec<String> = values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| "0px".to_string()))
        .collect();
    Some(sides.join(" "))
}

/// Border style paired with the border width.
///
/// An explicit style always wins. Otherwise `solid` when any width is
/// non-zero and `none` when widths are set but all zero.
#[must_use]
pub fn border_style(bag: &StyleBag, breakpoint: Breakpoint) -> Option<String> {
    if let Some(style) = resolve_text(bag, "border_style", breakpoint) {
        return Some(style);
    }
    if build_composite(bag, CompositeGroup::BorderWidth, breakpoint).is_some() {
        return Some("solid".to_string());
    }
    let any_width = side_values(bag, BoxGroup::BorderWidth, breakpoint)
        .iter()
        .any(Option::is_some);
    any_width.then(|| "none".to_string())
}

/// What to emit for a disabled box shadow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowFallback {
    /// Leave `box-shadow` out.
    #[default]
    Omit,
    /// Emit `box-shadow: none` so an inherited shadow is cleared.
    NoneKeyword,
}

/// One CSS declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// CSS property name.
    pub property: String,
    /// CSS value.
    pub value: String,
}

impl Declaration {
    /// Create a declaration.
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)
    }
}

/// Options for [`compose`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Disabled shadow convention.
    pub shadow_fallback: ShadowFallback,
    /// Emit unrecognised scalar keys as `key-with-dashes: value`.
    pub passthrough: bool,
    /// Trailing `transition` value, if any.
    pub transition: Option<String>,
}

impl ComposeOptions {
    /// Options used for element/state rules: pass-through on, no shadow
    /// `none`, no transition.
    #[must_use]
    pub fn element() -> Self {
        Self {
            shadow_fallback: ShadowFallback::Omit,
            passthrough: true,
            transition: None,
        }
    }
}

/// All declarations of a bag at a breakpoint, in a fixed order.
///
/// Order: margin, padding, background-color, text-align, border-width,
/// border-style, border-color, border-radius, box-shadow, transform,
/// transform-origin, filter, position and offsets, z-index, opacity,
/// typography, animation, raw pass-through, transition.
#[must_use]
pub fn compose(bag: &StyleBag, breakpoint: Breakpoint, options: &ComposeOptions) -> Vec<Declaration> {
    let mut out = Vec::new();
    let mut push = |property: &str, value: Option<String>| {
        if let Some(value) = value {
            out.push(Declaration::new(property, value));
        }
    };

    push("margin", build_composite(bag, CompositeGroup::Margin, breakpoint));
    push("padding", build_composite(bag, CompositeGroup::Padding, breakpoint));
    push("background-color", resolve_text(bag, "background_color", breakpoint));
    push("text-align", resolve_text(bag, "text_align", breakpoint));
    push(
        "border-width",
        build_composite(bag, CompositeGroup::BorderWidth, breakpoint),
    );
    push("border-style", border_style(bag, breakpoint));
    push("border-color", resolve_text(bag, "border_color", breakpoint));
    push(
        "border-radius",
        build_composite(bag, CompositeGroup::BorderRadius, breakpoint),
    );

    let shadow = build_composite(bag, CompositeGroup::BoxShadow, breakpoint).or_else(|| {
        (options.shadow_fallback == ShadowFallback::NoneKeyword).then(|| "none".to_string())
    });
    push("box-shadow", shadow);
    push(
        "transform",
        build_composite(bag, CompositeGroup::Transform, breakpoint),
    );
    push(
        "transform-origin",
        resolve_text(bag, "transform_origin", breakpoint),
    );
    push("filter", build_composite(bag, CompositeGroup::Filter, breakpoint));

    if let Some(position) = resolve_text(bag, "position", breakpoint).filter(|p| p != "static") {
        push("position", Some(position));
        for (key, property) in POSITION_OFFSETS {
            push(property, resolve_raw(bag, key, breakpoint).and_then(css_length));
        }
    }
    push(
        "z-index",
        resolve_text(bag, "z_index", breakpoint).filter(|z| z != "auto"),
    );
    #[allow(clippy::float_cmp)]
    let opacity = resolve_number(bag, "opacity", breakpoint).filter(|o| *o != 1.0);
    push("opacity", opacity.map(format_number));

    if let Some(typography) = bag.nested("typography") {
        for field in TYPOGRAPHY_FIELDS {
            push(
                &field.replace('_', "-"),
                resolve_text(&typography, field, breakpoint),
            );
        }
    }
    push("animation", animation(bag, breakpoint));

    if options.passthrough {
        for (property, value) in passthrough(bag, breakpoint) {
            if !out.iter().any(|d| d.property == property) {
                out.push(Declaration::new(property, value));
            }
        }
    }
    if let Some(transition) = &options.transition {
        out.push(Declaration::new("transition", transition.clone()));
    }
    out
}

fn animation(bag: &StyleBag, breakpoint: Breakpoint) -> Option<String> {
    if !resolve_flag_key(bag, "animation_enabled", breakpoint) {
        return None;
    }
    let name = resolve_text(bag, "animation_type", breakpoint).filter(|t| t != "none")?;
    Some(format!(
        "tb-{name} {}s {} {}s both",
        format_number(number(bag, "animation_duration", breakpoint)),
        resolve_text(bag, "animation_easing", breakpoint).unwrap_or_default(),
        format_number(number(bag, "animation_delay", breakpoint)),
    ))
}

/// Remaining scalar keys as raw CSS, in key order.
fn passthrough(bag: &StyleBag, breakpoint: Breakpoint) -> Vec<(String, String)> {
    let bases: BTreeSet<&str> = bag
        .iter()
        .map(|(key, _)| Breakpoint::split_key(key).0)
        .filter(|base| !is_engine_key(base))
        .collect();
    bases
        .into_iter()
        .filter_map(|base| {
            let value = resolve_raw(bag, base, breakpoint)?;
            if value.is_boolean() {
                return None;
            }
            as_text(value).map(|text| (base.replace('_', "-"), text))
        })
        .collect()
}

/// Serialize declarations as an inline `style` attribute value.
#[must_use]
pub fn inline_style(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|d| format!("{}:{}", d.property, d.value))
        .collect::<Vec<_>>()
        .join(";")
}
