//! Node-graph derivation for EventCatalog
//!
//! Given a catalog of versioned services, messages, channels, domains,
//! containers, data products and entities, this crate computes the nodes and
//! edges to render around any focus resource. It resolves version ranges and
//! `latest` pointers, infers producers and consumers, and follows multi-hop
//! channel routes.

pub mod builders;
pub mod catalog;
pub mod channels;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod layout;
pub mod relationships;
pub mod resources;
pub mod value_objects;
pub mod version;

// Re-export catalog access
pub use catalog::{
    Catalog, CatalogIndexCache, CatalogSource, FileCatalog, InMemoryCatalog, QueryOptions,
};

// Re-export the engine and builder inputs
pub use builders::{EntityMapOwner, Focus};
pub use engine::{GraphEngine, GraphKind};

// Re-export graph output
pub use graph::{Edge, EdgeData, Node, NodeData, NodeFlags, NodeGraph, NodesAndEdges};

// Re-export resources
pub use resources::{
    CatalogResource, Channel, Container, DataProduct, Domain, Entity, EntityProperty, Message,
    MessageKind, ReceivesPointer, RelationType, Resource, ResourceKind, ResourceMeta, ResourceRef,
    ResourceStub, SendsPointer, Service,
};

// Re-export the resolvers
pub use channels::{get_channel_chain, ChannelRouter};
pub use relationships::{hydrate_producers_and_consumers, HydrateRequest, ProducersAndConsumers};
pub use version::{resolve, VersionRange, VersionToken};

// Re-export value objects and configuration
pub use config::{GraphConfig, LayoutConfig, RenderConfig};
pub use error::{CatalogError, CatalogResult};
pub use layout::{ForceDirectedLayout, HierarchicalLayout, LayoutEngine, LayoutKind};
pub use value_objects::{EdgeType, NodeType, Position2D, RenderMode};
