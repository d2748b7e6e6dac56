//! Data-product-centric graph
//!
//! Inputs and outputs are the consumer and producer duals of a service's
//! receives and sends. A reference that names a message reuses the message
//! flows; one that names a container becomes a read or write edge.

use super::flows::{both_edge, consumed_message_flow, container_edge, produced_message_flow};
use super::{find_focus, BuildContext, Focus};
use crate::catalog::Catalog;
use crate::config::GraphConfig;
use crate::graph::{Node, NodeGraph, NodesAndEdges};
use crate::relationships::ParticipantRef;
use crate::resources::{CatalogResource, Container, DataProduct, ResourceRef};
use crate::version::{resolve, resolve_first};

/// Nodes and edges for the data product named by `focus`
pub fn get_nodes_and_edges(catalog: &Catalog, focus: &Focus, config: &GraphConfig) -> NodesAndEdges {
    let Some(product) = find_focus(&catalog.data_products, focus) else {
        return NodesAndEdges::empty();
    };

    let ctx = BuildContext::new(catalog, config);
    let graph = data_product_graph(&ctx, product);
    tracing::debug!(
        data_product = %product.node_id(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built data product graph"
    );
    graph.finish()
}

#[derive(Default)]
struct ContainerUse<'a> {
    containers: Vec<(&'a Container, bool, bool)>,
}

impl<'a> ContainerUse<'a> {
    fn record(&mut self, container: &'a Container, reads: bool, writes: bool) {
        match self.containers.iter_mut().find(|(known, _, _)| std::ptr::eq(*known, container)) {
            Some((_, r, w)) => {
                *r |= reads;
                *w |= writes;
            }
            None => self.containers.push((container, reads, writes)),
        }
    }
}

/// Partial graph of one data product
pub fn data_product_graph(ctx: &BuildContext<'_>, product: &DataProduct) -> NodeGraph {
    let mut graph = NodeGraph::new();
    let this = ParticipantRef::DataProduct(product);
    let product_id = product.node_id();
    let mut containers = ContainerUse::default();
    graph.add_node(Node::for_resource(product, ctx.mode()));

    for input in &product.inputs {
        let messages = resolve(&ctx.catalog.messages, &input.id, input.version.as_deref());
        if messages.is_empty() {
            match find_container(ctx, &product_id, input) {
                Some(container) => containers.record(container, true, false),
                None => continue,
            }
        }
        for message in messages {
            let relations = ctx.relations(message);
            let producer_channels = ctx.producer_channels(message, &relations.producers);
            graph.merge(consumed_message_flow(ctx, this, message, &producer_channels));
            for producer in &relations.producers {
                graph.merge(produced_message_flow(ctx, *producer, message));
            }
            if this.produces(message) {
                graph.add_edge(both_edge(&product_id, message));
            }
        }
    }

    for output in &product.outputs {
        let messages = resolve(&ctx.catalog.messages, &output.id, output.version.as_deref());
        if messages.is_empty() {
            match find_container(ctx, &product_id, output) {
                Some(container) => containers.record(container, false, true),
                None => continue,
            }
        }
        for message in messages {
            graph.merge(produced_message_flow(ctx, this, message));
            let relations = ctx.relations(message);
            let producer_channels = ctx.producer_channels(message, &relations.producers);
            for consumer in &relations.consumers {
                graph.merge(consumed_message_flow(ctx, *consumer, message, &producer_channels));
            }
        }
    }

    for (container, reads, writes) in containers.containers {
        let container_id = container.node_id();
        if let Some(edge) = container_edge(&product_id, &container_id, reads, writes) {
            graph.add_node(Node::for_resource(container, ctx.mode()));
            graph.add_edge(edge);
        }
    }

    graph
}

fn find_container<'a>(ctx: &BuildContext<'a>, product_id: &str, reference: &ResourceRef) -> Option<&'a Container> {
    let container = resolve_first(&ctx.catalog.containers, reference);
    if container.is_none() {
        tracing::warn!(
            data_product = %product_id,
            reference = %reference.id,
            "data product input or output matches no message or container"
        );
    }
    container
}
