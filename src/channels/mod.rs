//! Channel chain resolution
//!
//! A channel may declare `routes` to further channels. The router turns those
//! declarations into a directed graph and finds the ordered chain of channels
//! from a producer-side channel to a consumer-side channel. Route cycles are
//! allowed in the data; the search keeps a closed set and always terminates.

use crate::resources::{CatalogResource, Channel};
use crate::version::resolve;
use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Route graph over one channel collection
#[derive(Debug)]
pub struct ChannelRouter<'a> {
    channels: &'a [Channel],
    graph: DiGraph<usize, ()>,
    index_by_node_id: HashMap<String, NodeIndex>,
}

impl<'a> ChannelRouter<'a> {
    /// Build the route graph; routes that resolve to nothing are ignored
    pub fn new(channels: &'a [Channel]) -> Self {
        let mut graph = DiGraph::with_capacity(channels.len(), channels.len());
        let mut index_by_node_id = HashMap::with_capacity(channels.len());

        for (position, channel) in channels.iter().enumerate() {
            let index = graph.add_node(position);
            index_by_node_id.entry(channel.node_id()).or_insert(index);
        }

        for channel in channels {
            let from = index_by_node_id[&channel.node_id()];
            for route in &channel.routes {
                let targets = resolve(channels, &route.id, route.version.as_deref());
                if targets.is_empty() {
                    tracing::debug!(
                        channel = %channel.node_id(),
                        route = %route.id,
                        "channel route does not resolve to a known channel"
                    );
                }
                for target in targets {
                    let to = index_by_node_id[&target.node_id()];
                    graph.update_edge(from, to, ());
                }
            }
        }

        Self {
            channels,
            graph,
            index_by_node_id,
        }
    }

    /// Ordered chain `source ..= target`, or empty when unreachable
    ///
    /// A channel routed to itself yields a one-element chain.
    pub fn chain(&self, source: &Channel, target: &Channel) -> Vec<&'a Channel> {
        let (Some(&start), Some(&goal)) = (
            self.index_by_node_id.get(&source.node_id()),
            self.index_by_node_id.get(&target.node_id()),
        ) else {
            return Vec::new();
        };

        astar(&self.graph, start, |node| node == goal, |_| 1usize, |_| 0)
            .map(|(_, path)| {
                path.into_iter()
                    .map(|index| &self.channels[self.graph[index]])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether content on `source` can reach `target`
    pub fn is_routable(&self, source: &Channel, target: &Channel) -> bool {
        !self.chain(source, target).is_empty()
    }

    /// Channels directly routed from `channel`
    pub fn routes_from(&self, channel: &Channel) -> Vec<&'a Channel> {
        self.index_by_node_id
            .get(&channel.node_id())
            .map(|&index| {
                self.graph
                    .neighbors(index)
                    .map(|next| &self.channels[self.graph[next]])
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Chain of channels from `source` to `target` through declared routes
pub fn get_channel_chain<'a>(source: &Channel, target: &Channel, all_channels: &'a [Channel]) -> Vec<&'a Channel> {
    ChannelRouter::new(all_channels).chain(source, target)
}
