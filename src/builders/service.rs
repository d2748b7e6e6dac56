//! Service-centric graph: the messages a service sends and receives, the
//! channels they travel on and the containers it reads and writes.

use super::flows::{both_edge, consumed_message_flow, container_edge, produced_message_flow};
use super::{find_focus, BuildContext, Focus};
use crate::catalog::Catalog;
use crate::config::GraphConfig;
use crate::graph::{Node, NodeGraph, NodesAndEdges};
use crate::relationships::{pointer_matches, ParticipantRef};
use crate::resources::{CatalogResource, Container, Service};
use crate::version::{resolve, resolve_first};

/// Nodes and edges for the service named by `focus`
pub fn get_nodes_and_edges(catalog: &Catalog, focus: &Focus, config: &GraphConfig) -> NodesAndEdges {
    let Some(service) = find_focus(&catalog.services, focus) else {
        return NodesAndEdges::empty();
    };

    let ctx = BuildContext::new(catalog, config);
    let graph = service_graph(&ctx, service, config.render.render_all_edges);
    tracing::debug!(
        service = %service.node_id(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built service graph"
    );
    graph.finish()
}

/// Partial graph of one service
///
/// With `render_all_edges` the other producers of received messages and the
/// other consumers of sent messages are drawn too, which lets a domain view
/// connect its services.
pub fn service_graph(ctx: &BuildContext<'_>, service: &Service, render_all_edges: bool) -> NodeGraph {
    let mut graph = NodeGraph::new();
    let this = ParticipantRef::Service(service);
    graph.add_node(Node::for_resource(service, ctx.mode()));

    if ctx.config.render.render_messages {
        for pointer in &service.receives {
            for message in resolve(&ctx.catalog.messages, &pointer.id, pointer.version.as_deref()) {
                let relations = ctx.relations(message);
                let producer_channels = ctx.producer_channels(message, &relations.producers);
                graph.merge(consumed_message_flow(ctx, this, message, &producer_channels));

                if render_all_edges {
                    for producer in &relations.producers {
                        graph.merge(produced_message_flow(ctx, *producer, message));
                    }
                }
                if this.produces(message) {
                    graph.add_edge(both_edge(&service.node_id(), message));
                }
            }
        }

        for pointer in &service.sends {
            for message in resolve(&ctx.catalog.messages, &pointer.id, pointer.version.as_deref()) {
                graph.merge(produced_message_flow(ctx, this, message));

                if render_all_edges {
                    let relations = ctx.relations(message);
                    let producer_channels = ctx.producer_channels(message, &relations.producers);
                    for consumer in &relations.consumers {
                        graph.merge(consumed_message_flow(ctx, *consumer, message, &producer_channels));
                    }
                }
            }
        }
    }

    graph.merge(container_graph(ctx, service));
    graph
}

fn container_graph(ctx: &BuildContext<'_>, service: &Service) -> NodeGraph {
    let mut graph = NodeGraph::new();
    let service_id = service.node_id();

    let mut containers: Vec<&Container> = Vec::new();
    for reference in service.writes_to.iter().chain(&service.reads_from) {
        match resolve_first(&ctx.catalog.containers, reference) {
            Some(container) => {
                if !containers.iter().any(|known| std::ptr::eq(*known, container)) {
                    containers.push(container);
                }
            }
            None => tracing::warn!(
                service = %service_id,
                container = %reference.id,
                "container not found"
            ),
        }
    }

    for container in containers {
        let container_id = container.node_id();
        let writes = service.writes_to.iter().any(|r| pointer_matches(r, container));
        let reads = service.reads_from.iter().any(|r| pointer_matches(r, container));
        if let Some(edge) = container_edge(&service_id, &container_id, reads, writes) {
            graph.add_node(Node::for_resource(container, ctx.mode()));
            graph.add_edge(edge);
        }
    }

    graph
}
