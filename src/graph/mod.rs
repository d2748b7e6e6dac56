//! Renderable graph types
//!
//! Builders accumulate nodes and edges into a [`NodeGraph`], which keeps both
//! unique by id. A node seen twice has its data merged; an edge seen twice
//! gathers the colour tags of both discoveries. [`NodeGraph::finish`] yields
//! the [`NodesAndEdges`] handed to the layout adapter and the UI.

mod ids;
pub mod labels;

pub use ids::{both_edge_id, edge_id, node_id, warning_edge_id, BOTH_SUFFIX, WARNING_SUFFIX};

use crate::resources::{CatalogResource, ResourceStub};
use crate::value_objects::{EdgeType, NodeType, Position2D, RenderMode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Directional display flags on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFlags {
    /// The node has outgoing edges
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_source: bool,
    /// The node has incoming edges
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_target: bool,
    /// The resource is not owned by the focus resource
    #[serde(default, skip_serializing_if = "is_false")]
    pub external: bool,
}

impl NodeFlags {
    fn merge(&mut self, other: NodeFlags) {
        self.show_source |= other.show_source;
        self.show_target |= other.show_target;
        self.external |= other.external;
    }
}

/// Payload of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub mode: RenderMode,
    pub resource: ResourceStub,
    #[serde(flatten)]
    pub flags: NodeFlags,
    /// Kind-specific display data (channel address, entity properties, ...)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl NodeData {
    pub fn new(mode: RenderMode, resource: ResourceStub) -> Self {
        Self {
            mode,
            resource,
            flags: NodeFlags::default(),
            extra: Map::new(),
        }
    }

    /// Merge a later discovery of the same node into this one
    ///
    /// Flags are OR-ed together. `mode` and `resource` take the most recently
    /// seen value. `extra` is merged key by key: arrays are unioned, objects
    /// merged recursively, any other value is replaced by the newer one.
    pub fn merge(&mut self, incoming: NodeData) {
        self.mode = incoming.mode;
        self.resource = incoming.resource;
        self.flags.merge(incoming.flags);
        for (key, value) in incoming.extra {
            match self.extra.get_mut(&key) {
                Some(existing) => merge_value(existing, value),
                None => {
                    self.extra.insert(key, value);
                }
            }
        }
    }
}

fn merge_value(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Array(base), Value::Array(incoming)) => {
            for item in incoming {
                if !base.contains(&item) {
                    base.push(item);
                }
            }
        }
        (Value::Object(base), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match base.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, incoming) => *base = incoming,
    }
}

/// A renderable node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub data: NodeData,
    /// Placeholder until a layout engine runs
    pub position: Position2D,
    /// Group node this node is drawn inside
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Node {
    /// Node for a catalog resource, typed by its collection
    pub fn for_resource<R: CatalogResource + ?Sized>(resource: &R, mode: RenderMode) -> Self {
        let stub = resource.stub();
        Self {
            id: stub.node_id(),
            node_type: resource.resource_kind().node_type(),
            data: NodeData::new(mode, stub),
            position: Position2D::default(),
            parent_id: None,
        }
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.data.flags.merge(flags);
        self
    }

    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.data.extra.insert(key.to_string(), value);
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>, position: Position2D) -> Self {
        self.parent_id = Some(parent_id.into());
        self.position = position;
        self
    }

    /// Merge a later discovery of the same node into this one
    pub fn merge(&mut self, incoming: Node) {
        self.data.merge(incoming.data);
        if incoming.parent_id.is_some() {
            self.parent_id = incoming.parent_id;
        }
        if self.position.is_origin() {
            self.position = incoming.position;
        }
    }
}

/// Auxiliary edge data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    /// The message this edge transports, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ResourceStub>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl EdgeData {
    fn merge(&mut self, incoming: EdgeData) {
        for color in incoming.custom_colors {
            if !self.custom_colors.contains(&color) {
                self.custom_colors.push(color);
            }
        }
        if self.message.is_none() {
            self.message = incoming.message;
        }
        if self.warning.is_none() {
            self.warning = incoming.warning;
        }
    }
}

/// A renderable edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeData>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: label.into(),
            edge_type: EdgeType::Default,
            animated: false,
            source_handle: None,
            target_handle: None,
            data: None,
        }
    }

    /// Edge with the standard `<source>-<target>` id
    pub fn between(source: &str, target: &str, label: impl Into<String>) -> Self {
        Self::new(edge_id(source, target), source, target, label)
    }

    pub fn with_type(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = edge_type;
        self.animated = edge_type == EdgeType::Animated;
        self
    }

    pub fn with_handles(mut self, source_handle: String, target_handle: String) -> Self {
        self.source_handle = Some(source_handle);
        self.target_handle = Some(target_handle);
        self
    }

    /// Tag the edge with the message it carries and a colour
    pub fn carrying(mut self, message: ResourceStub, color: &str) -> Self {
        let data = self.data.get_or_insert_with(EdgeData::default);
        data.message = Some(message);
        data.custom_colors.push(color.to_string());
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.data.get_or_insert_with(EdgeData::default).warning = Some(warning.into());
        self
    }

    /// Merge a second discovery of the same edge into this one
    pub fn merge(&mut self, incoming: Edge) {
        match (&mut self.data, incoming.data) {
            (Some(existing), Some(incoming)) => existing.merge(incoming),
            (slot @ None, incoming) => *slot = incoming,
            (Some(_), None) => {}
        }
    }

    pub fn custom_colors(&self) -> &[String] {
        self.data
            .as_ref()
            .map(|data| data.custom_colors.as_slice())
            .unwrap_or(&[])
    }
}

/// Output of every builder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodesAndEdges {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl NodesAndEdges {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    /// Edges from `source` to `target`
    pub fn edges_between<'s>(&'s self, source: &'s str, target: &'s str) -> impl Iterator<Item = &'s Edge> + 's {
        self.edges
            .iter()
            .filter(move |edge| edge.source == source && edge.target == target)
    }
}

/// Accumulator keeping nodes and edges unique by id, in discovery order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeGraph {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<String, Edge>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, merging into an existing node with the same id
    pub fn add_node(&mut self, node: Node) {
        match self.nodes.get_mut(&node.id) {
            Some(existing) => existing.merge(node),
            None => {
                self.nodes.insert(node.id.clone(), node);
            }
        }
    }

    /// Add an edge, merging into an existing edge with the same id
    pub fn add_edge(&mut self, edge: Edge) {
        match self.edges.get_mut(&edge.id) {
            Some(existing) => existing.merge(edge),
            None => {
                self.edges.insert(edge.id.clone(), edge);
            }
        }
    }

    /// Fold another partial graph into this one
    pub fn merge(&mut self, other: NodeGraph) {
        for (_, node) in other.nodes {
            self.add_node(node);
        }
        for (_, edge) in other.edges {
            self.add_edge(edge);
        }
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Produce the final lists, dropping edges with a missing endpoint
    ///
    /// Group nodes are moved ahead of the nodes placed inside them; renderers
    /// reject a child listed before its parent.
    pub fn finish(self) -> NodesAndEdges {
        let NodeGraph { nodes, edges } = self;
        let edges = edges
            .into_values()
            .filter(|edge| {
                let connected = nodes.contains_key(&edge.source) && nodes.contains_key(&edge.target);
                if !connected {
                    tracing::warn!(edge = %edge.id, "dropping edge with a missing endpoint");
                }
                connected
            })
            .collect();

        NodesAndEdges {
            nodes: parents_first(nodes),
            edges,
        }
    }
}

fn parents_first(mut nodes: IndexMap<String, Node>) -> Vec<Node> {
    let ids: Vec<String> = nodes.keys().cloned().collect();
    let mut ordered = Vec::with_capacity(nodes.len());
    for id in ids {
        // pending ancestors of this node, nearest first
        let mut chain: Vec<String> = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor.take() {
            if !nodes.contains_key(&current) || chain.contains(&current) {
                break;
            }
            cursor = nodes.get(&current).and_then(|node| node.parent_id.clone());
            chain.push(current);
        }
        for id in chain.into_iter().rev() {
            if let Some(node) = nodes.swap_remove(&id) {
                ordered.push(node);
            }
        }
    }
    ordered
}

impl From<NodeGraph> for NodesAndEdges {
    fn from(graph: NodeGraph) -> Self {
        graph.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Message, Service};
    use serde_json::json;

    fn message_node(flags: NodeFlags) -> Node {
        Node::for_resource(&Message::event("OrderPlaced", "1.0.0"), RenderMode::Simple).with_flags(flags)
    }

    #[test]
    fn test_finish_lists_parents_before_children() {
        let mut graph = NodeGraph::new();
        let child = Node::for_resource(&Service::new("Courier", "1.0.0"), RenderMode::Simple)
            .with_parent("Shipping-1.0.0", Position2D::new(50.0, 50.0));
        graph.add_node(Node::for_resource(&Message::event("OrderPlaced", "1.0.0"), RenderMode::Simple));
        graph.add_node(child);
        graph.add_node(
            Node::for_resource(&Service::new("Shipping", "1.0.0"), RenderMode::Simple)
                .with_parent("Logistics-1.0.0", Position2D::new(50.0, 50.0)),
        );
        graph.add_node(Node::for_resource(&Service::new("Logistics", "1.0.0"), RenderMode::Simple));

        let ids: Vec<String> = graph.finish().nodes.into_iter().map(|node| node.id).collect();
        assert_eq!(
            ids,
            vec!["OrderPlaced-1.0.0", "Logistics-1.0.0", "Shipping-1.0.0", "Courier-1.0.0"]
        );
    }

    #[test]
    fn test_finish_tolerates_parent_cycles() {
        let mut graph = NodeGraph::new();
        graph.add_node(
            Node::for_resource(&Service::new("A", "1.0.0"), RenderMode::Simple)
                .with_parent("B-1.0.0", Position2D::new(0.0, 0.0)),
        );
        graph.add_node(
            Node::for_resource(&Service::new("B", "1.0.0"), RenderMode::Simple)
                .with_parent("A-1.0.0", Position2D::new(0.0, 0.0)),
        );
        assert_eq!(graph.finish().nodes.len(), 2);
    }

    #[test]
    fn test_node_for_resource() {
        let node = Node::for_resource(&Service::new("Orders", "2.0.0"), RenderMode::Full);
        assert_eq!(node.id, "Orders-2.0.0");
        assert_eq!(node.node_type, NodeType::Service);
        assert_eq!(node.data.mode, RenderMode::Full);
        assert!(node.position.is_origin());
    }

    #[test]
    fn test_duplicate_nodes_merge_flags() {
        let mut graph = NodeGraph::new();
        graph.add_node(message_node(NodeFlags {
            show_source: true,
            ..NodeFlags::default()
        }));
        graph.add_node(message_node(NodeFlags {
            show_target: true,
            ..NodeFlags::default()
        }));

        assert_eq!(graph.node_count(), 1);
        let flags = graph.node("OrderPlaced-1.0.0").unwrap().data.flags;
        assert!(flags.show_source);
        assert!(flags.show_target);
        assert!(!flags.external);
    }

    #[test]
    fn test_extra_merge_policy() {
        let mut data = NodeData::new(RenderMode::Simple, Message::event("A", "1.0.0").stub());
        data.extra.insert("tags".to_string(), json!(["a"]));
        data.extra.insert("owner".to_string(), json!("team-a"));
        data.extra.insert("style".to_string(), json!({"icon": "bolt"}));

        let mut incoming = NodeData::new(RenderMode::Full, Message::event("A", "1.0.0").stub());
        incoming.extra.insert("tags".to_string(), json!(["a", "b"]));
        incoming.extra.insert("owner".to_string(), json!("team-b"));
        incoming.extra.insert("style".to_string(), json!({"color": "red"}));

        data.merge(incoming);
        assert_eq!(data.mode, RenderMode::Full);
        assert_eq!(data.extra["tags"], json!(["a", "b"]));
        assert_eq!(data.extra["owner"], json!("team-b"));
        assert_eq!(data.extra["style"], json!({"icon": "bolt", "color": "red"}));
    }

    #[test]
    fn test_duplicate_edges_concatenate_colors() {
        let message = Message::event("A", "1.0.0");
        let command = Message::command("B", "1.0.0");

        let mut graph = NodeGraph::new();
        graph.add_edge(Edge::between("x", "y", "routes to").carrying(message.stub(), "orange"));
        graph.add_edge(Edge::between("x", "y", "routes to").carrying(command.stub(), "blue"));
        graph.add_edge(Edge::between("x", "y", "routes to").carrying(command.stub(), "blue"));

        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edge("x-y").unwrap();
        assert_eq!(edge.custom_colors(), ["orange".to_string(), "blue".to_string()]);
        assert_eq!(edge.data.as_ref().unwrap().message.as_ref().unwrap().id, "A");
    }

    #[test]
    fn test_finish_drops_dangling_edges() {
        let mut graph = NodeGraph::new();
        graph.add_node(message_node(NodeFlags::default()));
        graph.add_edge(Edge::between("OrderPlaced-1.0.0", "Ghost-1.0.0", "routes to"));

        let result = graph.finish();
        assert_eq!(result.nodes.len(), 1);
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_merge_partial_graphs() {
        let mut left = NodeGraph::new();
        left.add_node(Node::for_resource(&Service::new("S", "1.0.0"), RenderMode::Simple));
        left.add_node(message_node(NodeFlags::default()));
        left.add_edge(Edge::between("S-1.0.0", "OrderPlaced-1.0.0", "publishes \nevent"));

        let mut right = NodeGraph::new();
        right.add_node(message_node(NodeFlags::default()));
        right.add_node(Node::for_resource(&Service::new("T", "1.0.0"), RenderMode::Simple));
        right.add_edge(Edge::between("OrderPlaced-1.0.0", "T-1.0.0", "subscribed by"));

        left.merge(right);
        let result = left.finish();
        assert_eq!(result.nodes.len(), 3);
        assert_eq!(result.edges.len(), 2);
        assert!(result.node("T-1.0.0").is_some());
        assert_eq!(result.edges_between("S-1.0.0", "OrderPlaced-1.0.0").count(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let node = message_node(NodeFlags {
            show_source: true,
            ..NodeFlags::default()
        });
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], json!("events"));
        assert_eq!(value["data"]["showSource"], json!(true));
        assert!(value["data"].get("external").is_none());
        assert_eq!(value["position"], json!({"x": 0.0, "y": 0.0}));

        let edge = Edge::between("a", "b", "routes to").with_type(EdgeType::Animated);
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["id"], json!("a-b"));
        assert_eq!(value["animated"], json!(true));
        assert!(value.get("data").is_none());
    }
}
