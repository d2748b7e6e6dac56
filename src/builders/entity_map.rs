//! Entity map of a domain or service
//!
//! Nodes are the entities the owner declares plus every entity they reference
//! from outside, each exactly once. Edges run from a referencing property to
//! the referenced entity's identifying property.

use super::{find_focus, Focus};
use crate::catalog::Catalog;
use crate::config::GraphConfig;
use crate::graph::{Edge, Node, NodeFlags, NodeGraph, NodesAndEdges};
use crate::resources::{CatalogResource, Entity, EntityProperty, RelationType};
use crate::version::{resolve, resolve_first};
use serde_json::json;

/// Resource kinds that own entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityMapOwner {
    Domain,
    Service,
}

/// Nodes and edges of the entity map owned by the resource named by `focus`
pub fn get_nodes_and_edges(
    catalog: &Catalog,
    owner: EntityMapOwner,
    focus: &Focus,
    config: &GraphConfig,
) -> NodesAndEdges {
    build(catalog, owner, focus, None, config)
}

/// Like [`get_nodes_and_edges`], but maps the given entities instead of the
/// ones the owner declares
///
/// References from these entities still resolve against the catalog.
pub fn get_nodes_and_edges_with(
    catalog: &Catalog,
    owner: EntityMapOwner,
    focus: &Focus,
    entities: &[Entity],
    config: &GraphConfig,
) -> NodesAndEdges {
    build(catalog, owner, focus, Some(entities), config)
}

fn build(
    catalog: &Catalog,
    owner: EntityMapOwner,
    focus: &Focus,
    entities: Option<&[Entity]>,
    config: &GraphConfig,
) -> NodesAndEdges {
    let declared = match owner {
        EntityMapOwner::Domain => find_focus(&catalog.domains, focus).map(|domain| domain.entities.as_slice()),
        EntityMapOwner::Service => find_focus(&catalog.services, focus).map(|service| service.entities.as_slice()),
    };
    let Some(declared) = declared else {
        return NodesAndEdges::empty();
    };

    let owned: Vec<&Entity> = match entities {
        Some(entities) => entities.iter().collect(),
        None => declared
            .iter()
            .filter_map(|reference| {
                let entity = resolve_first(&catalog.entities, reference);
                if entity.is_none() {
                    tracing::warn!(owner = %focus.id, entity = %reference.id, "owned entity not found");
                }
                entity
            })
            .collect(),
    };

    let graph = entity_graph(&owned, &catalog.entities, config);
    tracing::debug!(
        owner = %focus.id,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built entity map"
    );
    graph.finish()
}

fn entity_node(entity: &Entity, config: &GraphConfig, external: bool) -> Node {
    Node::for_resource(entity, config.render.mode)
        .with_flags(NodeFlags {
            external,
            ..NodeFlags::default()
        })
        .with_extra("identifier", json!(entity.identifier))
        .with_extra("aggregateRoot", json!(entity.aggregate_root))
        .with_extra("properties", json!(entity.properties))
}

/// Partial graph over `owned` entities, pulling referenced ones from `all`
pub fn entity_graph(owned: &[&Entity], all: &[Entity], config: &GraphConfig) -> NodeGraph {
    let mut graph = NodeGraph::new();
    for entity in owned {
        graph.add_node(entity_node(entity, config, false));
    }

    for source in owned {
        let source_id = source.node_id();
        for property in source.references() {
            let Some(target_ref) = property.references.as_deref() else {
                continue;
            };

            let target = owned
                .iter()
                .copied()
                .find(|entity| entity.meta.id == target_ref)
                .or_else(|| resolve(all, target_ref, None).into_iter().next());
            let Some(target) = target else {
                tracing::warn!(
                    entity = %source_id,
                    property = %property.name,
                    references = %target_ref,
                    "referenced entity not found"
                );
                continue;
            };

            let Some(handle) = target_handle(property, target) else {
                tracing::warn!(
                    entity = %source_id,
                    property = %property.name,
                    references = %target.node_id(),
                    "referenced entity has no identifier or properties to connect to"
                );
                continue;
            };

            let target_id = target.node_id();
            if !graph.contains_node(&target_id) {
                graph.add_node(entity_node(target, config, true));
            }

            let relation = property.relation_type.unwrap_or(RelationType::HasOne);
            graph.add_edge(
                Edge::new(
                    format!("{source_id}-{}-{target_id}", property.name),
                    source_id.as_str(),
                    target_id.as_str(),
                    relation.as_str(),
                )
                .with_handles(format!("{}-source", property.name), format!("{handle}-target")),
            );
        }
    }

    graph
}

/// Property of `target` the edge attaches to
fn target_handle<'a>(property: &'a EntityProperty, target: &'a Entity) -> Option<&'a str> {
    property
        .references_identifier
        .as_deref()
        .or(target.identifier.as_deref())
        .or_else(|| target.properties.first().map(|p| p.name.as_str()))
}
