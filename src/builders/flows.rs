//! Per-message flow helpers
//!
//! The produced flow renders one producer publishing one message; the consumed
//! flow renders one consumer receiving it, walking channel chains from the
//! producers' channels to the consumer's channels. Every builder that shows
//! messages is assembled from these two.

use super::BuildContext;
use crate::graph::labels::{
    consumer_label, message_color, producer_label, PUBLISHES_AND_SUBSCRIBES, READS_AND_WRITES, READS_FROM,
    ROUTES_TO, WRITES_TO,
};
use crate::graph::{both_edge_id, edge_id, warning_edge_id, Edge, Node, NodeFlags, NodeGraph};
use crate::relationships::ParticipantRef;
use crate::resources::{CatalogResource, Channel, Message, ResourceRef};
use crate::value_objects::{EdgeType, RenderMode};
use crate::version::resolve_first;
use serde_json::json;

const SOURCE: NodeFlags = NodeFlags {
    show_source: true,
    show_target: false,
    external: false,
};

const TARGET: NodeFlags = NodeFlags {
    show_source: false,
    show_target: true,
    external: false,
};

const THROUGH: NodeFlags = NodeFlags {
    show_source: true,
    show_target: true,
    external: false,
};

pub fn channel_node(channel: &Channel, mode: RenderMode) -> Node {
    let mut node = Node::for_resource(channel, mode).with_flags(THROUGH);
    if let Some(address) = &channel.address {
        node = node.with_extra("address", json!(address));
    }
    if !channel.protocols.is_empty() {
        node = node.with_extra("protocols", json!(channel.protocols));
    }
    node
}

/// Animated edge tagged with the message it carries
pub fn message_edge(source: &str, target: &str, label: &str, message: &Message) -> Edge {
    Edge::between(source, target, label)
        .with_type(EdgeType::Animated)
        .carrying(message.stub(), message_color(message.kind))
}

fn resolve_channels<'a>(ctx: &BuildContext<'a>, owner: &str, references: &[ResourceRef]) -> Vec<&'a Channel> {
    references
        .iter()
        .filter_map(|reference| {
            let channel = resolve_first(&ctx.catalog.channels, reference);
            if channel.is_none() {
                tracing::warn!(
                    resource = %owner,
                    channel = %reference.id,
                    version = ?reference.version,
                    "channel not found, connecting without it"
                );
            }
            channel
        })
        .collect()
}

/// A producer publishing `message`, optionally onto channels
pub fn produced_message_flow(ctx: &BuildContext<'_>, producer: ParticipantRef<'_>, message: &Message) -> NodeGraph {
    let mode = ctx.mode();
    let mut graph = NodeGraph::new();
    let producer_id = producer.node_id();
    let message_id = message.node_id();

    graph.add_node(Node::for_resource(&producer, mode).with_flags(SOURCE));
    graph.add_node(Node::for_resource(message, mode).with_flags(TARGET));
    graph.add_edge(message_edge(&producer_id, &message_id, producer_label(message.kind), message));

    for channel in resolve_channels(ctx, &producer_id, producer.channels_to(message)) {
        let channel_id = channel.node_id();
        graph.add_node(Node::for_resource(message, mode).with_flags(SOURCE));
        graph.add_node(channel_node(channel, mode));
        graph.add_edge(message_edge(&message_id, &channel_id, ROUTES_TO, message));
    }

    graph
}

/// A consumer receiving `message`
///
/// `producer_channels` are the channels the message's producers publish to.
/// When one of them routes to a channel the consumer listens on, every hop of
/// the chain is drawn. Without any consumer channel the message connects to
/// the consumer directly.
pub fn consumed_message_flow(
    ctx: &BuildContext<'_>,
    consumer: ParticipantRef<'_>,
    message: &Message,
    producer_channels: &[&Channel],
) -> NodeGraph {
    let mode = ctx.mode();
    let mut graph = NodeGraph::new();
    let consumer_id = consumer.node_id();
    let message_id = message.node_id();
    let label = consumer_label(message.kind);

    graph.add_node(Node::for_resource(&consumer, mode).with_flags(TARGET));
    graph.add_node(Node::for_resource(message, mode).with_flags(SOURCE));

    let target_channels = resolve_channels(ctx, &consumer_id, consumer.channels_from(message));
    if target_channels.is_empty() {
        graph.add_edge(message_edge(&message_id, &consumer_id, label, message));
        return graph;
    }

    for target in target_channels {
        let target_id = target.node_id();
        graph.add_node(channel_node(target, mode));
        graph.add_edge(message_edge(&target_id, &consumer_id, label, message));

        let chains: Vec<Vec<&Channel>> = producer_channels
            .iter()
            .map(|source| ctx.router.chain(source, target))
            .filter(|chain| !chain.is_empty())
            .collect();

        if !chains.is_empty() {
            for chain in chains {
                for channel in &chain {
                    graph.add_node(channel_node(channel, mode));
                }
                graph.add_edge(message_edge(&message_id, &chain[0].node_id(), ROUTES_TO, message));
                for hop in chain.windows(2) {
                    graph.add_edge(message_edge(&hop[0].node_id(), &hop[1].node_id(), ROUTES_TO, message));
                }
            }
        } else if producer_channels.is_empty() {
            graph.add_edge(message_edge(&message_id, &target_id, ROUTES_TO, message));
        } else {
            tracing::warn!(
                message = %message_id,
                channel = %target_id,
                "no producer channel routes to the consumer channel"
            );
            let edge = message_edge(&message_id, &target_id, ROUTES_TO, message);
            graph.add_edge(Edge {
                id: warning_edge_id(&message_id, &target_id),
                ..edge
            }
            .with_warning(format!(
                "{} is not routed from any channel its producers publish to",
                target.meta.display_name()
            )));
        }
    }

    graph
}

/// Extra edge for a participant that both sends and receives `message`
pub fn both_edge(participant: &str, message: &Message) -> Edge {
    let message_id = message.node_id();
    Edge::new(
        both_edge_id(participant, &message_id),
        participant,
        message_id.as_str(),
        PUBLISHES_AND_SUBSCRIBES,
    )
    .with_type(EdgeType::Animated)
    .carrying(message.stub(), message_color(message.kind))
}

/// Edge between a participant and a container it reads and/or writes
///
/// Reading alone points from the container to the participant. Writing, or
/// both, points from the participant to the container.
pub fn container_edge(participant: &str, container: &str, reads: bool, writes: bool) -> Option<Edge> {
    match (reads, writes) {
        (true, true) => Some(Edge::between(participant, container, READS_AND_WRITES).with_type(EdgeType::Multiline)),
        (false, true) => Some(Edge::between(participant, container, WRITES_TO)),
        (true, false) => Some(Edge::between(container, participant, READS_FROM)),
        (false, false) => None,
    }
}

/// Id of the edge [`container_edge`] produces
pub fn container_edge_id(participant: &str, container: &str, reads: bool, writes: bool) -> String {
    if reads && !writes {
        edge_id(container, participant)
    } else {
        edge_id(participant, container)
    }
}
