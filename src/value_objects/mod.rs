//! Graph value objects
//!
//! Value objects are immutable types shared by every node-graph builder. They are
//! compared by value and serialize to the strings the rendering layer expects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The visual kind of a rendered node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// A service that sends and receives messages
    #[serde(rename = "services")]
    Service,
    /// An event message
    #[serde(rename = "events")]
    Event,
    /// A command message
    #[serde(rename = "commands")]
    Command,
    /// A query message
    #[serde(rename = "queries")]
    Query,
    /// A channel messages are routed through
    #[serde(rename = "channels")]
    Channel,
    /// A data store (container)
    #[serde(rename = "data")]
    Container,
    /// A data product with inputs and outputs
    #[serde(rename = "data-products")]
    DataProduct,
    /// A domain entity
    #[serde(rename = "entities")]
    Entity,
    /// A domain rendered as a group container
    #[serde(rename = "group")]
    DomainGroup,
}

impl NodeType {
    /// Get the string representation of the node type
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Service => "services",
            NodeType::Event => "events",
            NodeType::Command => "commands",
            NodeType::Query => "queries",
            NodeType::Channel => "channels",
            NodeType::Container => "data",
            NodeType::DataProduct => "data-products",
            NodeType::Entity => "entities",
            NodeType::DomainGroup => "group",
        }
    }

    /// Whether this node represents a message
    pub fn is_message(&self) -> bool {
        matches!(self, NodeType::Event | NodeType::Command | NodeType::Query)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rendering style of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Plain connector
    #[default]
    Default,
    /// Animated connector used for message flow
    Animated,
    /// Connector whose label spans several lines
    Multiline,
}

impl EdgeType {
    /// Get the string representation of the edge type
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Default => "default",
            EdgeType::Animated => "animated",
            EdgeType::Multiline => "multiline",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much detail nodes carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Simple,
    Full,
}

/// Represents the position of a node in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Get the distance to another position
    pub fn distance_to(&self, other: &Position2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether this is still the placeholder origin
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}
