//! Document store: the nodes of one page and the edits applied to them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::intent::{apply_action, StyleIntent};
use crate::merge::{effective, EffectiveStyleBag};
use crate::render::{render_node, RenderConfig, RenderedNode};
use crate::schema::SchemaRegistry;
use crate::{Breakpoint, Node, NodeId, StyleError, StyleResult};

/// A page's nodes, indexed by ID and kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// All nodes, indexed by ID.
    nodes: HashMap<NodeId, Node>,
    /// Node IDs in page order.
    order: Vec<NodeId>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at the end of the page. A node with the same ID is replaced
    /// in place.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        if self.nodes.insert(id, node).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Remove a node.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::NodeNotFound`] if no node has this ID.
    pub fn remove_node(&mut self, id: &NodeId) -> StyleResult<Node> {
        self.order.retain(|nid| nid != id);
        self.nodes
            .remove(id)
            .ok_or_else(|| StyleError::NodeNotFound(id.to_string()))
    }

    /// Get a node by ID.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node by ID.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Nodes in page order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Apply an editing intent to its node's `design` bag.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::NodeNotFound`] if the target node does not exist.
    pub fn dispatch(&mut self, intent: &StyleIntent) -> StyleResult<()> {
        let node = self
            .nodes
            .get_mut(&intent.node_id)
            .ok_or_else(|| StyleError::NodeNotFound(intent.node_id.to_string()))?;
        tracing::debug!(
            node = %intent.node_id,
            breakpoint = %intent.breakpoint,
            action = ?intent.action,
            "dispatching style intent"
        );
        apply_action(&mut node.design, &intent.action, intent.breakpoint);
        Ok(())
    }

    /// Effective style bag of a node.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::NodeNotFound`] if the node does not exist.
    pub fn effective(&self, id: NodeId) -> StyleResult<EffectiveStyleBag> {
        self.nodes
            .get(&id)
            .map(effective)
            .ok_or_else(|| StyleError::NodeNotFound(id.to_string()))
    }

    /// Render one node.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::NodeNotFound`] if the node does not exist.
    pub fn render(
        &self,
        id: NodeId,
        breakpoint: Breakpoint,
        registry: &SchemaRegistry,
        config: &RenderConfig,
    ) -> StyleResult<RenderedNode> {
        self.nodes
            .get(&id)
            .map(|node| render_node(node, breakpoint, registry, config))
            .ok_or_else(|| StyleError::NodeNotFound(id.to_string()))
    }

    /// Render every node in page order.
    #[must_use]
    pub fn render_all(
        &self,
        breakpoint: Breakpoint,
        registry: &SchemaRegistry,
        config: &RenderConfig,
    ) -> Vec<RenderedNode> {
        self.nodes()
            .map(|node| render_node(node, breakpoint, registry, config))
            .collect()
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> StyleResult<String> {
        serde_json::to_string(self).map_err(StyleError::Serialization)
    }

    /// Deserialize a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> StyleResult<Self> {
        serde_json::from_str(json).map_err(StyleError::Serialization)
    }
}

impl FromIterator<Node> for Document {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut document = Self::new();
        for node in iter {
            document.add_node(node);
        }
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_model::{BoxGroup, Side};
    use crate::intent::StyleAction;
    use serde_json::json;

    #[test]
    fn test_document_add_remove() {
        let mut doc = Document::new();
        assert!(doc.is_empty());

        let first = doc.add_node(Node::new("button"));
        let second = doc.add_node(Node::new("text"));
        assert_eq!(doc.len(), 2);
        let types: Vec<&str> = doc.nodes().map(|n| n.module_type.as_str()).collect();
        assert_eq!(types, vec!["button", "text"]);

        let removed = doc.remove_node(&first).expect("should remove");
        assert_eq!(removed.module_type, "button");
        assert_eq!(doc.len(), 1);
        assert!(doc.node(first).is_none());
        assert!(doc.node(second).is_some());
        assert!(matches!(
            doc.remove_node(&first),
            Err(StyleError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_re_adding_keeps_position() {
        let mut doc = Document::new();
        let node = Node::new("hero");
        let id = doc.add_node(node.clone());
        doc.add_node(Node::new("text"));
        doc.add_node(node);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.nodes().next().map(|n| n.id), Some(id));
    }

    #[test]
    fn test_dispatch_edits_design() {
        let mut doc = Document::new();
        let id = doc.add_node(Node::new("button"));

        let intent = StyleIntent::new(
            id,
            Breakpoint::Tablet,
            StyleAction::SetSide {
                group: BoxGroup::Margin,
                side: Side::Top,
                value: json!(12),
            },
        );
        doc.dispatch(&intent).expect("should dispatch");

        let node = doc.node(id).expect("node exists");
        assert_eq!(node.design.get("margin_top_tablet"), Some(&json!("12px")));
        assert!(node.legacy_settings.is_empty());

        let missing = StyleIntent::new(NodeId::new(), Breakpoint::Desktop, StyleAction::Clear {
            key: "color".to_string(),
        });
        assert!(matches!(doc.dispatch(&missing), Err(StyleError::NodeNotFound(_))));
    }

    #[test]
    fn test_render_through_document() {
        let mut doc = Document::new();
        let id = doc.add_node(Node::new("text"));
        doc.dispatch(&StyleIntent::new(
            id,
            Breakpoint::Desktop,
            StyleAction::Set {
                key: "backgroundColor".to_string(),
                value: json!("#eee"),
            },
        ))
        .expect("should dispatch");

        let bag = doc.effective(id).expect("node exists");
        assert_eq!(bag.get("background_color"), Some(&json!("#eee")));

        let config = RenderConfig {
            transition: None,
            ..RenderConfig::default()
        };
        let out = doc
            .render(id, Breakpoint::Mobile, &SchemaRegistry::builtin(), &config)
            .expect("should render");
        assert_eq!(out.inline_style, "background-color:#eee");
        assert_eq!(doc.render_all(Breakpoint::Mobile, &SchemaRegistry::builtin(), &config).len(), 1);
        assert!(doc.render(NodeId::new(), Breakpoint::Desktop, &SchemaRegistry::builtin(), &config).is_err());
    }

    #[test]
    fn test_document_json_round_trip() {
        let mut design = crate::StyleBag::new();
        design.set("padding_top", "8px");
        let doc: Document = [Node::new("button").with_design(design), Node::new("hero")]
            .into_iter()
            .collect();

        let json = doc.to_json().expect("should serialize");
        let restored = Document::from_json(&json).expect("should deserialize");
        assert_eq!(doc, restored);
        assert!(Document::from_json("{ not json").is_err());
    }
}
