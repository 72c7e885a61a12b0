//! Node renderer: everything the preview surface needs to style one node.

use serde::{Deserialize, Serialize};

use crate::composite::{compose, inline_style, ComposeOptions, Declaration, ShadowFallback};
use crate::merge::effective;
use crate::schema::SchemaRegistry;
use crate::stylesheet::{build_stylesheet, ElementStyleMap};
use crate::{Breakpoint, Node, NodeId};

/// Scope selector used by the preview surface.
pub const DEFAULT_SCOPE: &str = "#preview-module";

/// Transition appended to inline styles so edits animate in the preview.
pub const DEFAULT_TRANSITION: &str = "all 0.3s ease";

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Selector prefixed to every element rule.
    pub scope: String,
    /// Trailing `transition` declaration; `None` disables it.
    pub transition: Option<String>,
    /// Disabled shadow convention for the inline style.
    pub shadow_fallback: ShadowFallback,
    /// Emit unrecognised scalar keys of the node bag as raw CSS.
    pub passthrough: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scope: DEFAULT_SCOPE.to_string(),
            transition: Some(DEFAULT_TRANSITION.to_string()),
            shadow_fallback: ShadowFallback::Omit,
            passthrough: false,
        }
    }
}

impl RenderConfig {
    fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            shadow_fallback: self.shadow_fallback,
            passthrough: self.passthrough,
            transition: self.transition.clone(),
        }
    }
}

/// Rendered output of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedNode {
    /// Node that was rendered.
    pub node_id: NodeId,
    /// Breakpoint the output applies to.
    pub breakpoint: Breakpoint,
    /// Wrapper declarations in emission order.
    pub declarations: Vec<Declaration>,
    /// `style` attribute value built from `declarations`.
    pub inline_style: String,
    /// Scoped element/state rules.
    pub stylesheet: String,
    /// Element id from the advanced settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_id: Option<String>,
    /// Extra classes from the advanced settings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub css_classes: Vec<String>,
    /// Custom CSS from the advanced settings, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
}

/// Render a node at a breakpoint.
#[must_use]
pub fn render_node(
    node: &Node,
    breakpoint: Breakpoint,
    registry: &SchemaRegistry,
    config: &RenderConfig,
) -> RenderedNode {
    let bag = effective(node);
    let declarations = compose(&bag, breakpoint, &config.compose_options());
    let elements = ElementStyleMap::from_bag(&bag);
    let stylesheet = build_stylesheet(
        registry,
        &elements,
        &node.module_type,
        &config.scope,
        breakpoint,
    );
    tracing::debug!(
        node = %node.id,
        module_type = %node.module_type,
        breakpoint = %breakpoint,
        declarations = declarations.len(),
        stylesheet_bytes = stylesheet.len(),
        "rendered node"
    );

    RenderedNode {
        node_id: node.id,
        breakpoint,
        inline_style: inline_style(&declarations),
        declarations,
        stylesheet,
        css_id: node.advanced.css_id.clone().filter(|id| !id.trim().is_empty()),
        css_classes: node.advanced.classes(),
        custom_css: node.advanced.custom_css.clone().filter(|css| !css.trim().is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> Node {
        serde_json::from_value(value).expect("valid node")
    }

    #[test]
    fn test_render_merges_bags() {
        let node = node(json!({
            "type": "button",
            "settings": { "backgroundColor": "#fff", "paddingTop": "4px" },
            "design": { "backgroundColor": "#123", "elements": {
                "button": { "hover": { "color": "#fff" } }
            } },
            "advanced": { "css_id": "cta", "css_class": "wide primary", "custom_css": "outline: 0;" }
        }));
        let out = render_node(&node, Breakpoint::Desktop, &SchemaRegistry::builtin(), &RenderConfig::default());

        assert_eq!(
            out.inline_style,
            "padding:4px 0px 0px 0px;background-color:#123;transition:all 0.3s ease"
        );
        assert!(out.stylesheet.starts_with("#preview-module .tb-button:hover {\n"));
        assert_eq!(out.css_id.as_deref(), Some("cta"));
        assert_eq!(out.css_classes, vec!["wide", "primary"]);
        assert_eq!(out.custom_css.as_deref(), Some("outline: 0;"));
    }

    #[test]
    fn test_render_config_from_json() {
        let config: RenderConfig =
            serde_json::from_str(r##"{ "scope": "#m", "transition": null, "shadow_fallback": "none_keyword" }"##)
                .expect("should parse");
        assert_eq!(config.scope, "#m");
        assert!(config.transition.is_none());
        assert!(!config.passthrough);

        let out = render_node(&Node::new("text"), Breakpoint::Mobile, &SchemaRegistry::builtin(), &config);
        assert_eq!(out.inline_style, "box-shadow:none");
        assert!(out.stylesheet.is_empty());
        assert!(out.css_id.is_none());
    }

    #[test]
    fn test_render_is_idempotent() {
        let node = node(json!({
            "type": "hero",
            "design": {
                "filter_blur": 2,
                "transform_scale_x": 110,
                "elements": { "title": { "normal": { "color": "red" } } }
            }
        }));
        let registry = SchemaRegistry::builtin();
        let config = RenderConfig::default();
        let first = render_node(&node, Breakpoint::Tablet, &registry, &config);
        let second = render_node(&node, Breakpoint::Tablet, &registry, &config);
        assert_eq!(first, second);
    }
}
