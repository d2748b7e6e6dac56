//! Container-centric graph: the services and data products that write to or
//! read from a data store.

use super::flows::container_edge;
use super::{find_focus, BuildContext, Focus};
use crate::catalog::Catalog;
use crate::config::GraphConfig;
use crate::graph::{Node, NodeGraph, NodesAndEdges};
use crate::relationships::{pointer_matches, services_that_read_from_container, services_that_write_to_container};
use crate::resources::{CatalogResource, Container};

/// Nodes and edges for the container named by `focus`
pub fn get_nodes_and_edges(catalog: &Catalog, focus: &Focus, config: &GraphConfig) -> NodesAndEdges {
    let Some(container) = find_focus(&catalog.containers, focus) else {
        return NodesAndEdges::empty();
    };

    let ctx = BuildContext::new(catalog, config);
    let graph = container_graph(&ctx, container);
    tracing::debug!(
        container = %container.node_id(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built container graph"
    );
    graph.finish()
}

/// Partial graph of one container
///
/// A participant that both reads and writes collapses to a single edge.
pub fn container_graph(ctx: &BuildContext<'_>, container: &Container) -> NodeGraph {
    let mode = ctx.mode();
    let container_id = container.node_id();
    let mut graph = NodeGraph::new();
    graph.add_node(Node::for_resource(container, mode));

    let writers = services_that_write_to_container(container, &ctx.catalog.services);
    let readers = services_that_read_from_container(container, &ctx.catalog.services);

    let mut services = writers.clone();
    for reader in &readers {
        if !services.iter().any(|known| std::ptr::eq(*known, *reader)) {
            services.push(*reader);
        }
    }

    for service in services {
        let writes = writers.iter().any(|w| std::ptr::eq(*w, service));
        let reads = readers.iter().any(|r| std::ptr::eq(*r, service));
        if let Some(edge) = container_edge(&service.node_id(), &container_id, reads, writes) {
            graph.add_node(Node::for_resource(service, mode));
            graph.add_edge(edge);
        }
    }

    for product in &ctx.catalog.data_products {
        let reads = product.inputs.iter().any(|r| pointer_matches(r, container));
        let writes = product.outputs.iter().any(|r| pointer_matches(r, container));
        if let Some(edge) = container_edge(&product.node_id(), &container_id, reads, writes) {
            graph.add_node(Node::for_resource(product, mode));
            graph.add_edge(edge);
        }
    }

    graph
}
