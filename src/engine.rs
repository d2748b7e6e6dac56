//! Async facade over the builders
//!
//! Each call takes a fresh snapshot from the source, runs one builder and
//! positions the result. Only accessor failures surface as errors.

use crate::builders::{self, EntityMapOwner, Focus};
use crate::catalog::{Catalog, CatalogSource};
use crate::config::GraphConfig;
use crate::error::CatalogResult;
use crate::graph::NodesAndEdges;
use crate::layout::LayoutKind;
use crate::resources::Entity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which builder to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphKind {
    Message,
    Service,
    Domain,
    Container,
    DataProduct,
    DomainEntities,
    ServiceEntities,
}

impl From<EntityMapOwner> for GraphKind {
    fn from(owner: EntityMapOwner) -> Self {
        match owner {
            EntityMapOwner::Domain => GraphKind::DomainEntities,
            EntityMapOwner::Service => GraphKind::ServiceEntities,
        }
    }
}

impl GraphKind {
    /// Layout that suits the graph
    pub fn layout(&self) -> LayoutKind {
        match self {
            GraphKind::DomainEntities | GraphKind::ServiceEntities => LayoutKind::ForceDirected,
            _ => LayoutKind::Hierarchical,
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphKind::Message => "message",
            GraphKind::Service => "service",
            GraphKind::Domain => "domain",
            GraphKind::Container => "container",
            GraphKind::DataProduct => "data-product",
            GraphKind::DomainEntities => "domain-entities",
            GraphKind::ServiceEntities => "service-entities",
        };
        f.write_str(name)
    }
}

/// Builds positioned graphs from a catalog source
pub struct GraphEngine<S> {
    source: S,
    config: GraphConfig,
    apply_layout: bool,
}

impl<S: CatalogSource> GraphEngine<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, GraphConfig::default())
    }

    pub fn with_config(source: S, config: GraphConfig) -> Self {
        Self {
            source,
            config,
            apply_layout: true,
        }
    }

    /// Leave nodes at their builder positions
    pub fn without_layout(mut self) -> Self {
        self.apply_layout = false;
        self
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// A fresh snapshot of every collection
    pub async fn snapshot(&self) -> CatalogResult<Catalog> {
        Catalog::load(&self.source).await
    }

    /// Run the builder for `kind` against a fresh snapshot
    pub async fn build(&self, kind: GraphKind, focus: &Focus) -> CatalogResult<NodesAndEdges> {
        let catalog = self.snapshot().await?;
        let config = &self.config;

        let graph = match kind {
            GraphKind::Message => builders::message::get_nodes_and_edges(&catalog, focus, config),
            GraphKind::Service => builders::service::get_nodes_and_edges(&catalog, focus, config),
            GraphKind::Domain => builders::domain::get_nodes_and_edges(&catalog, focus, config),
            GraphKind::Container => builders::container::get_nodes_and_edges(&catalog, focus, config),
            GraphKind::DataProduct => builders::data_product::get_nodes_and_edges(&catalog, focus, config),
            GraphKind::DomainEntities => {
                builders::entity_map::get_nodes_and_edges(&catalog, EntityMapOwner::Domain, focus, config)
            }
            GraphKind::ServiceEntities => {
                builders::entity_map::get_nodes_and_edges(&catalog, EntityMapOwner::Service, focus, config)
            }
        };

        Ok(self.positioned(kind, focus, graph))
    }

    fn positioned(&self, kind: GraphKind, focus: &Focus, mut graph: NodesAndEdges) -> NodesAndEdges {
        if self.apply_layout && !graph.is_empty() {
            kind.layout().engine(&self.config.layout).apply(&mut graph);
        }

        tracing::debug!(
            %kind,
            focus = %focus.id,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "graph ready"
        );
        graph
    }

    pub async fn message_graph(&self, focus: &Focus) -> CatalogResult<NodesAndEdges> {
        self.build(GraphKind::Message, focus).await
    }

    pub async fn service_graph(&self, focus: &Focus) -> CatalogResult<NodesAndEdges> {
        self.build(GraphKind::Service, focus).await
    }

    pub async fn domain_graph(&self, focus: &Focus) -> CatalogResult<NodesAndEdges> {
        self.build(GraphKind::Domain, focus).await
    }

    pub async fn container_graph(&self, focus: &Focus) -> CatalogResult<NodesAndEdges> {
        self.build(GraphKind::Container, focus).await
    }

    pub async fn data_product_graph(&self, focus: &Focus) -> CatalogResult<NodesAndEdges> {
        self.build(GraphKind::DataProduct, focus).await
    }

    pub async fn entity_map(&self, owner: EntityMapOwner, focus: &Focus) -> CatalogResult<NodesAndEdges> {
        self.build(GraphKind::from(owner), focus).await
    }

    /// Entity map of `entities` in place of the ones the owner declares
    pub async fn entity_map_with(
        &self,
        owner: EntityMapOwner,
        focus: &Focus,
        entities: &[Entity],
    ) -> CatalogResult<NodesAndEdges> {
        let catalog = self.snapshot().await?;
        let graph = builders::entity_map::get_nodes_and_edges_with(&catalog, owner, focus, entities, &self.config);
        Ok(self.positioned(GraphKind::from(owner), focus, graph))
    }
}
