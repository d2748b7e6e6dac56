//! Domain-centric graph
//!
//! A domain renders as a group node with its services and data products
//! placed on a grid inside it. Each service contributes its own graph with
//! every edge drawn, so services of the domain connect through their messages.
//! Sub-domains are composed recursively as sibling groups.

use super::{data_product, find_focus, service, BuildContext, Focus};
use crate::catalog::Catalog;
use crate::config::{GraphConfig, LayoutConfig};
use crate::graph::{Node, NodeGraph, NodesAndEdges};
use crate::resources::{CatalogResource, Domain};
use crate::value_objects::Position2D;
use crate::version::resolve_first;
use serde_json::json;
use std::collections::HashSet;

const GROUP_PADDING: f64 = 50.0;

/// Nodes and edges for the domain named by `focus`
pub fn get_nodes_and_edges(catalog: &Catalog, focus: &Focus, config: &GraphConfig) -> NodesAndEdges {
    let Some(domain) = find_focus(&catalog.domains, focus) else {
        return NodesAndEdges::empty();
    };

    let ctx = BuildContext::new(catalog, config);
    let mut visited = HashSet::new();
    let graph = domain_graph(&ctx, domain, &mut visited);
    tracing::debug!(
        domain = %domain.node_id(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built domain graph"
    );
    graph.finish()
}

/// Partial graph of one domain and its sub-domains
pub fn domain_graph(ctx: &BuildContext<'_>, domain: &Domain, visited: &mut HashSet<String>) -> NodeGraph {
    let group_id = domain.node_id();
    if !visited.insert(group_id.clone()) {
        tracing::warn!(domain = %group_id, "domain already composed, skipping cyclic sub-domain");
        return NodeGraph::new();
    }

    let layout = &ctx.config.layout;
    let mut graph = NodeGraph::new();
    graph.add_node(Node::for_resource(domain, ctx.mode()));
    let mut slot = 0usize;

    for reference in &domain.services {
        let Some(found) = resolve_first(&ctx.catalog.services, reference) else {
            tracing::warn!(domain = %group_id, service = %reference.id, "service not found");
            continue;
        };
        graph.merge(service::service_graph(ctx, found, true));
        graph.add_node(Node::for_resource(found, ctx.mode()).with_parent(group_id.as_str(), grid_position(slot, layout)));
        slot += 1;
    }

    for reference in &domain.data_products {
        let Some(found) = resolve_first(&ctx.catalog.data_products, reference) else {
            tracing::warn!(domain = %group_id, data_product = %reference.id, "data product not found");
            continue;
        };
        graph.merge(data_product::data_product_graph(ctx, found));
        graph.add_node(Node::for_resource(found, ctx.mode()).with_parent(group_id.as_str(), grid_position(slot, layout)));
        slot += 1;
    }

    let (width, height) = group_size(slot, layout);
    if let Some(group) = graph.node_mut(&group_id) {
        group.data.extra.insert("width".to_string(), json!(width));
        group.data.extra.insert("height".to_string(), json!(height));
    }

    for reference in &domain.domains {
        let Some(subdomain) = resolve_first(&ctx.catalog.domains, reference) else {
            tracing::warn!(domain = %group_id, subdomain = %reference.id, "sub-domain not found");
            continue;
        };
        graph.merge(domain_graph(ctx, subdomain, visited));
    }

    graph
}

/// Position of the `index`-th child inside a group, relative to the group
pub fn grid_position(index: usize, layout: &LayoutConfig) -> Position2D {
    let columns = layout.group_columns.max(1);
    let column = (index % columns) as f64;
    let row = (index / columns) as f64;
    Position2D::new(
        GROUP_PADDING + column * (layout.node_width + layout.node_spacing),
        GROUP_PADDING + row * (layout.node_height + layout.node_spacing),
    )
}

fn group_size(children: usize, layout: &LayoutConfig) -> (f64, f64) {
    let columns = layout.group_columns.max(1);
    let used_columns = children.clamp(1, columns) as f64;
    let rows = children.div_ceil(columns).max(1) as f64;
    (
        2.0 * GROUP_PADDING + used_columns * layout.node_width + (used_columns - 1.0) * layout.node_spacing,
        2.0 * GROUP_PADDING + rows * layout.node_height + (rows - 1.0) * layout.node_spacing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Message, ReceivesPointer, ResourceRef, SendsPointer, Service};
    use crate::value_objects::NodeType;

    fn catalog() -> Catalog {
        Catalog {
            domains: vec![
                Domain::new("Orders", "1.0.0")
                    .with_service(ResourceRef::new("OrderService"))
                    .with_service(ResourceRef::new("Billing"))
                    .with_subdomain(ResourceRef::new("Shipping")),
                Domain::new("Shipping", "1.0.0")
                    .with_service(ResourceRef::new("Courier"))
                    .with_subdomain(ResourceRef::new("Orders")),
            ],
            services: vec![
                Service::new("OrderService", "1.0.0").with_sends(SendsPointer::new("OrderPlaced", None)),
                Service::new("Billing", "1.0.0").with_receives(ReceivesPointer::new("OrderPlaced", None)),
                Service::new("Courier", "1.0.0").with_receives(ReceivesPointer::new("OrderPlaced", None)),
            ],
            messages: vec![Message::event("OrderPlaced", "1.0.0")],
            ..Catalog::default()
        }
        .normalize()
    }

    #[test]
    fn test_domain_groups_services() {
        let result = get_nodes_and_edges(&catalog(), &Focus::new("Orders"), &GraphConfig::default());

        let group = result.node("Orders-1.0.0").unwrap();
        assert_eq!(group.node_type, NodeType::DomainGroup);
        assert_eq!(result.node("OrderService-1.0.0").unwrap().parent_id.as_deref(), Some("Orders-1.0.0"));
        assert_eq!(result.node("Billing-1.0.0").unwrap().parent_id.as_deref(), Some("Orders-1.0.0"));
        assert_eq!(result.node("Courier-1.0.0").unwrap().parent_id.as_deref(), Some("Shipping-1.0.0"));
        assert!(result.node("Shipping-1.0.0").is_some());

        let position = |id: &str| result.nodes.iter().position(|n| n.id == id).unwrap();
        for child in result.nodes.iter().filter(|n| n.parent_id.is_some()) {
            let parent = child.parent_id.as_deref().unwrap();
            assert!(position(parent) < position(&child.id), "{} listed before {parent}", child.id);
        }
        assert_eq!(group.data.extra["width"], json!(550.0));

        let message = result.node("OrderPlaced-1.0.0").unwrap();
        assert!(message.data.flags.show_source && message.data.flags.show_target);
        assert_eq!(result.nodes.iter().filter(|n| n.id == "OrderPlaced-1.0.0").count(), 1);
    }

    #[test]
    fn test_cyclic_subdomains_terminate() {
        let result = get_nodes_and_edges(&catalog(), &Focus::new("Shipping"), &GraphConfig::default());
        assert!(result.node("Orders-1.0.0").is_some());
        assert!(result.node("Shipping-1.0.0").is_some());
    }

    #[test]
    fn test_grid_positions() {
        let layout = LayoutConfig::default();
        assert_eq!(grid_position(0, &layout), Position2D::new(50.0, 50.0));
        assert_eq!(grid_position(3, &layout), Position2D::new(50.0, 300.0));
        assert_eq!(grid_position(1, &layout).x, 350.0);
        assert_eq!(group_size(1, &layout), (250.0, 200.0));
    }

    #[test]
    fn test_unknown_domain_is_empty() {
        let result = get_nodes_and_edges(&catalog(), &Focus::versioned("UnknownX", "1.0.0"), &GraphConfig::default());
        assert!(result.is_empty());
    }
}
