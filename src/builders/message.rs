//! Message-centric graph: an event, command or query with its producers,
//! consumers and the channels between them.

use super::flows::{both_edge, consumed_message_flow, produced_message_flow};
use super::{find_focus, BuildContext, Focus};
use crate::catalog::Catalog;
use crate::config::GraphConfig;
use crate::graph::{Node, NodeGraph, NodesAndEdges};
use crate::resources::{CatalogResource, Message};
use crate::version::Versioned;

/// Nodes and edges for the message named by `focus`
pub fn get_nodes_and_edges(catalog: &Catalog, focus: &Focus, config: &GraphConfig) -> NodesAndEdges {
    let Some(message) = find_message(catalog, focus) else {
        return NodesAndEdges::empty();
    };

    let ctx = BuildContext::new(catalog, config);
    let graph = message_graph(&ctx, message);
    tracing::debug!(
        message = %message.node_id(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built message graph"
    );
    graph.finish()
}

/// Messages of one kind, resolved on their own
struct OfKind<'a>(&'a Message);

impl Versioned for OfKind<'_> {
    fn resource_id(&self) -> &str {
        &self.0.meta.id
    }
    fn resource_version(&self) -> &str {
        &self.0.meta.version
    }
    fn is_archived(&self) -> bool {
        self.0.meta.archived
    }
}

/// Resolve the focus message, within `focus.kind` when one is given
fn find_message<'c>(catalog: &'c Catalog, focus: &Focus) -> Option<&'c Message> {
    let Some(kind) = focus.kind else {
        return find_focus(&catalog.messages, focus);
    };
    let of_kind: Vec<OfKind<'c>> = catalog.messages_of(kind).map(OfKind).collect();
    find_focus(&of_kind, focus).map(|found| found.0)
}

/// Partial graph of one message and every participant
pub fn message_graph(ctx: &BuildContext<'_>, message: &Message) -> NodeGraph {
    let mut graph = NodeGraph::new();
    graph.add_node(Node::for_resource(message, ctx.mode()));

    let relations = ctx.relations(message);
    for producer in &relations.producers {
        graph.merge(produced_message_flow(ctx, *producer, message));
    }

    let producer_channels = ctx.producer_channels(message, &relations.producers);
    for consumer in &relations.consumers {
        graph.merge(consumed_message_flow(ctx, *consumer, message, &producer_channels));
    }

    for participant in relations.both_sent_and_received() {
        graph.add_edge(both_edge(&participant.node_id(), message));
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{
        DataProduct, Entity, MessageKind, ReceivesPointer, ResourceRef, SendsPointer, Service,
    };

    fn build(catalog: Catalog, focus: Focus) -> NodesAndEdges {
        get_nodes_and_edges(&catalog.normalize(), &focus, &GraphConfig::default())
    }

    #[test]
    fn test_isolated_message() {
        let catalog = Catalog {
            messages: vec![Message::event("OrderPlaced", "1.0.0")],
            ..Catalog::default()
        };
        let result = build(catalog, Focus::new("OrderPlaced"));
        assert_eq!(result.nodes.len(), 1);
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_producer_and_consumer_labels() {
        let catalog = Catalog {
            messages: vec![Message::command("PlaceOrder", "1.0.0")],
            services: vec![
                Service::new("Web", "1.0.0").with_sends(SendsPointer::new("PlaceOrder", None)),
                Service::new("Orders", "1.0.0").with_receives(ReceivesPointer::new("PlaceOrder", Some("1.0.0"))),
            ],
            ..Catalog::default()
        };

        let result = build(catalog, Focus::versioned("PlaceOrder", "1.0.0"));
        assert_eq!(result.nodes.len(), 3);
        assert_eq!(result.edge("Web-1.0.0-PlaceOrder-1.0.0").unwrap().label, "invokes");
        assert_eq!(result.edge("PlaceOrder-1.0.0-Orders-1.0.0").unwrap().label, "accepts");
    }

    #[test]
    fn test_self_loop_adds_single_both_edge() {
        let catalog = Catalog {
            messages: vec![Message::event("OrderPlaced", "1.0.0")],
            services: vec![Service::new("Loop", "1.0.0")
                .with_sends(SendsPointer::new("OrderPlaced", None))
                .with_receives(ReceivesPointer::new("OrderPlaced", None))],
            ..Catalog::default()
        };

        let result = build(catalog, Focus::new("OrderPlaced"));
        let both: Vec<_> = result.edges.iter().filter(|e| e.id.ends_with("-both")).collect();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].label, "publishes and subscribes");
        assert_eq!(result.nodes.iter().filter(|n| n.id == "Loop-1.0.0").count(), 1);
        assert_eq!(result.edges.len(), 3);
    }

    #[test]
    fn test_entity_and_data_product_participants() {
        let catalog = Catalog {
            messages: vec![Message::event("OrderPlaced", "1.0.0")],
            entities: vec![Entity::new("Order", "1.0.0").with_sends(SendsPointer::new("OrderPlaced", None))],
            data_products: vec![DataProduct::new("Sales", "1.0.0").with_input(ResourceRef::new("OrderPlaced"))],
            ..Catalog::default()
        };

        let result = build(catalog, Focus::new("OrderPlaced"));
        assert!(result.edge("Order-1.0.0-OrderPlaced-1.0.0").is_some());
        assert!(result.edge("OrderPlaced-1.0.0-Sales-1.0.0").is_some());
    }

    #[test]
    fn test_kind_disambiguates_shared_id() {
        let catalog = Catalog {
            messages: vec![Message::event("Order", "2.0.0"), Message::command("Order", "1.0.0")],
            ..Catalog::default()
        };
        let catalog = catalog.normalize();
        let config = GraphConfig::default();

        let any = get_nodes_and_edges(&catalog, &Focus::new("Order"), &config);
        assert!(any.node("Order-2.0.0").is_some());

        let command = get_nodes_and_edges(&catalog, &Focus::new("Order").with_kind(MessageKind::Command), &config);
        assert!(command.node("Order-1.0.0").is_some());
        assert!(command.node("Order-2.0.0").is_none());

        let query = get_nodes_and_edges(&catalog, &Focus::new("Order").with_kind(MessageKind::Query), &config);
        assert!(query.is_empty());
    }

    #[test]
    fn test_unknown_message_is_empty() {
        let result = build(Catalog::default(), Focus::versioned("UnknownX", "1.0.0"));
        assert!(result.is_empty());
    }
}
