//! Graph builders
//!
//! One builder per focus resource type. Every builder is a pure function of a
//! [`Catalog`] snapshot and returns [`NodesAndEdges`]; an unknown focus yields
//! an empty result. Builders compose by merging the partial [`NodeGraph`]s
//! returned by the flow helpers in [`flows`].
//!
//! [`NodeGraph`]: crate::graph::NodeGraph

pub mod container;
pub mod data_product;
pub mod domain;
pub mod entity_map;
pub mod flows;
pub mod message;
pub mod service;

pub use entity_map::EntityMapOwner;

use crate::catalog::Catalog;
use crate::channels::ChannelRouter;
use crate::config::GraphConfig;
use crate::relationships::{ParticipantRef, Relations};
use crate::resources::{Channel, Message, MessageKind};
use crate::value_objects::RenderMode;
use crate::version::{resolve, resolve_first, Versioned};

/// The resource a render is centered on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus {
    pub id: String,
    /// Version token; absent means the latest version
    pub version: Option<String>,
    /// Restricts a message focus to one collection when an id is shared
    /// across events, commands and queries
    pub kind: Option<MessageKind>,
}

impl Focus {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            kind: None,
        }
    }

    pub fn versioned(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: Some(version.into()),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Shared state of one render
pub struct BuildContext<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a GraphConfig,
    pub router: ChannelRouter<'a>,
}

impl<'a> BuildContext<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a GraphConfig) -> Self {
        Self {
            catalog,
            config,
            router: ChannelRouter::new(&catalog.channels),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.config.render.mode
    }

    /// Producers and consumers of a message across the whole catalog
    pub fn relations(&self, message: &Message) -> Relations<'a> {
        Relations::of(
            message,
            &self.catalog.services,
            &self.catalog.data_products,
            &self.catalog.entities,
        )
    }

    /// Every channel the given producers publish this message to
    pub fn producer_channels(&self, message: &Message, producers: &[ParticipantRef<'a>]) -> Vec<&'a Channel> {
        let mut channels: Vec<&'a Channel> = Vec::new();
        for producer in producers {
            for reference in producer.channels_to(message) {
                let Some(channel) = resolve_first(&self.catalog.channels, reference) else {
                    continue;
                };
                if !channels.iter().any(|known| std::ptr::eq(*known, channel)) {
                    channels.push(channel);
                }
            }
        }
        channels
    }
}

/// Resolve the focus resource, taking the first match in collection order
pub fn find_focus<'c, R: Versioned>(collection: &'c [R], focus: &Focus) -> Option<&'c R> {
    let found = resolve(collection, &focus.id, focus.version.as_deref()).into_iter().next();
    if found.is_none() {
        tracing::debug!(id = %focus.id, version = ?focus.version, "focus resource not found");
    }
    found
}
