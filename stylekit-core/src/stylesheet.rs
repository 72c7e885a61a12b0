//! Element/state stylesheet generator.
//!
//! Turns `design.elements[element][state]` style bags into scoped CSS rules.
//! Rule order follows the module schema (elements in declaration order,
//! states in the element's declared order), never the order of the stored
//! map, so the output is stable across edits that only reorder keys.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::composite::{compose, ComposeOptions, Declaration};
use crate::merge::canonicalize;
use crate::schema::{ElementState, SchemaRegistry};
use crate::{Breakpoint, StyleBag};

/// Per-element, per-state style bags, keys canonicalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStyleMap {
    elements: BTreeMap<String, HashMap<ElementState, StyleBag>>,
}

impl ElementStyleMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `elements` object of a style bag.
    ///
    /// Unknown state names and entries that are not objects are skipped.
    #[must_use]
    pub fn from_bag(bag: &StyleBag) -> Self {
        let mut map = Self::new();
        let Some(elements) = bag.nested("elements") else {
            return map;
        };
        for (element, states) in elements.iter() {
            let Value::Object(states) = states else {
                tracing::warn!(element = %element, "element styles are not an object, skipping");
                continue;
            };
            for (state, styles) in states {
                let Ok(parsed) = state.parse::<ElementState>() else {
                    tracing::debug!(element = %element, state = %state, "unknown element state, skipping");
                    continue;
                };
                let Value::Object(styles) = styles else {
                    tracing::warn!(element = %element, state = %state, "state styles are not an object, skipping");
                    continue;
                };
                map.insert(element.clone(), parsed, StyleBag::from(styles.clone()));
            }
        }
        map
    }

    /// Store the styles of one element state, canonicalizing their keys.
    pub fn insert(&mut self, element: impl Into<String>, state: ElementState, styles: StyleBag) {
        self.elements
            .entry(element.into())
            .or_default()
            .insert(state, canonicalize(&styles));
    }

    /// Styles of one element state.
    #[must_use]
    pub fn get(&self, element: &str, state: ElementState) -> Option<&StyleBag> {
        self.elements.get(element)?.get(&state)
    }

    /// Element keys present in the map, sorted.
    pub fn element_keys(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// Whether the map holds no styles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn rule_body(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|d| format!("  {}: {} !important;\n", d.property, d.value))
        .collect()
}

fn selector(scope: &str, fragment: &str, suffix: &str) -> String {
    let scope = scope.trim();
    if scope.is_empty() {
        format!("{fragment}{suffix}")
    } else {
        format!("{scope} {fragment}{suffix}")
    }
}

/// Build the scoped stylesheet for a module's element styles.
///
/// Every declaration is forced `!important`. Each comma-separated selector
/// fragment gets its own rule, and `active` expands every fragment into three
/// rules. Unknown module types and element keys yield no rules.
///
/// ```
/// use stylekit_core::{build_stylesheet, Breakpoint, ElementState, ElementStyleMap, SchemaRegistry, StyleBag};
///
/// let mut styles = ElementStyleMap::new();
/// let mut hover = StyleBag::new();
/// hover.set("color", "#fff");
/// styles.insert("button", ElementState::Hover, hover);
///
/// let css = build_stylesheet(&SchemaRegistry::builtin(), &styles, "button", "#m1", Breakpoint::Desktop);
/// assert_eq!(
///     css,
///     "#m1 .tb-button:hover {\n  color: #fff !important;\n}\n\
///      #m1 .tb-btn:hover {\n  color: #fff !important;\n}\n"
/// );
/// ```
#[must_use]
pub fn build_stylesheet(
    registry: &SchemaRegistry,
    styles: &ElementStyleMap,
    module_type: &str,
    scope: &str,
    breakpoint: Breakpoint,
) -> String {
    if styles.is_empty() {
        return String::new();
    }
    let Some(schema) = registry.get(module_type) else {
        tracing::debug!(module_type = %module_type, "no element schema for module type");
        return String::new();
    };
    for key in styles.element_keys() {
        if schema.element(key).is_none() {
            tracing::debug!(module_type = %module_type, element = %key, "element not in schema, skipping");
        }
    }

    let options = ComposeOptions::element();
    let mut css = String::new();
    for element in &schema.elements {
        for state in ElementState::ALL {
            if styles.get(&element.key, state).is_some() && !element.supports(state) {
                tracing::debug!(element = %element.key, state = %state, "state not declared for element, skipping");
            }
        }
        for &state in &element.states {
            let Some(bag) = styles.get(&element.key, state) else {
                continue;
            };
            let declarations = compose(bag, breakpoint, &options);
            if declarations.is_empty() {
                continue;
            }
            let body = rule_body(&declarations);
            for fragment in element.fragments() {
                for suffix in state.suffixes() {
                    css.push_str(&selector(scope, fragment, suffix));
                    css.push_str(" {\n");
                    css.push_str(&body);
                    css.push_str("}\n");
                }
            }
        }
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ElementSpec, ModuleSchema};
    use serde_json::json;

    fn styles(value: Value) -> ElementStyleMap {
        let bag: StyleBag = serde_json::from_value(json!({ "elements": value })).expect("valid bag");
        ElementStyleMap::from_bag(&bag)
    }

    fn sheet(module_type: &str, value: Value) -> String {
        build_stylesheet(
            &SchemaRegistry::builtin(),
            &styles(value),
            module_type,
            "#preview-module",
            Breakpoint::Desktop,
        )
    }

    #[test]
    fn test_selector_fan_out() {
        let mut registry = SchemaRegistry::empty();
        registry.register(
            ModuleSchema::new("card").with_element(ElementSpec::new("link", "a, b")),
        );
        let css = build_stylesheet(
            &registry,
            &styles(json!({ "link": { "hover": { "color": "red" } } })),
            "card",
            "#s",
            Breakpoint::Desktop,
        );
        assert_eq!(
            css,
            "#s a:hover {\n  color: red !important;\n}\n#s b:hover {\n  color: red !important;\n}\n"
        );
    }

    #[test]
    fn test_active_expands_to_three_rules() {
        let css = sheet(
            "accordion",
            json!({ "header": { "active": { "background_color": "#eee" } } }),
        );
        let selectors: Vec<&str> = css.lines().filter(|l| l.ends_with('{')).collect();
        assert_eq!(
            selectors,
            vec![
                "#preview-module .tb-accordion-header.active {",
                "#preview-module .tb-accordion-header.is-active {",
                "#preview-module .tb-accordion-header[aria-expanded=\"true\"] {",
            ]
        );
        assert!(css.contains("background-color: #eee !important;"));
    }

    #[test]
    fn test_schema_order_not_storage_order() {
        let css = sheet(
            "hero",
            json!({
                "title": { "hover": { "color": "blue" }, "normal": { "color": "black" } },
                "container": { "normal": { "padding_top": "10px" } }
            }),
        );
        let selectors: Vec<&str> = css.lines().filter(|l| l.ends_with('{')).collect();
        assert_eq!(
            selectors,
            vec![
                "#preview-module .tb-hero-container {",
                "#preview-module .tb-hero-title {",
                "#preview-module .tb-hero-title:hover {",
            ]
        );
    }

    #[test]
    fn test_composites_inside_rules() {
        let css = sheet(
            "button",
            json!({ "button": { "normal": {
                "box_shadow_enabled": true,
                "borderRadiusTopLeft": 6,
                "font_size": "14px"
            } } }),
        );
        assert!(css.contains("  border-radius: 6px 0px 0px 0px !important;\n"));
        assert!(css.contains("  box-shadow: 0px 4px 10px 0px rgba(0,0,0,0.1) !important;\n"));
        assert!(css.contains("  font-size: 14px !important;\n"));
        assert!(!css.contains("transition"));
    }

    #[test]
    fn test_skips_unknown_and_empty() {
        assert_eq!(sheet("carousel", json!({ "slide": { "normal": { "color": "red" } } })), "");
        assert_eq!(sheet("button", json!({ "ghost": { "normal": { "color": "red" } } })), "");
        // Empty and neutral-only states produce no rule.
        assert_eq!(
            sheet("button", json!({ "button": { "normal": { "color": "", "filter_brightness": 100 } } })),
            ""
        );
        // Undeclared state for the element.
        assert_eq!(sheet("cta", json!({ "title": { "hover": { "color": "red" } } })), "");
        // Unknown state name and malformed entries.
        assert_eq!(sheet("button", json!({ "button": { "pressed": { "color": "red" } } })), "");
        assert_eq!(sheet("button", json!({ "button": "red" })), "");
    }

    #[test]
    fn test_breakpoint_inside_state_bags() {
        let map = styles(json!({ "paragraph": { "normal": { "font_size": "18px", "font_size_mobile": "15px" } } }));
        let css = build_stylesheet(&SchemaRegistry::builtin(), &map, "text", "", Breakpoint::Mobile);
        assert_eq!(css, "p {\n  font-size: 15px !important;\n}\n");
    }

    #[test]
    fn test_element_style_map_canonicalizes() {
        let map = styles(json!({ "button": { "hover": { "backgroundColor": "#000" } } }));
        let bag = map.get("button", ElementState::Hover).expect("hover styles");
        assert_eq!(bag.get("background_color"), Some(&json!("#000")));
        assert!(map.get("button", ElementState::Normal).is_none());
    }
}
