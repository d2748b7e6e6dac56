//! Resource accessors
//!
//! A [`CatalogSource`] returns every collection the graph builders read. The
//! engine loads a fresh [`Catalog`] snapshot per render; sources are never
//! written to.

mod file;
mod memory;

pub use file::{CatalogIndex, CatalogIndexCache, FileCatalog};
pub use memory::InMemoryCatalog;

use crate::error::CatalogResult;
use crate::resources::{
    CatalogResource, Channel, Container, DataProduct, Domain, Entity, Message, MessageKind,
    ResourceMeta, Service,
};
use crate::version::latest_version;
use async_trait::async_trait;

/// Options accepted by every accessor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Return only the newest version of each resource id
    pub latest_only: bool,
}

impl QueryOptions {
    pub fn latest_only() -> Self {
        Self { latest_only: true }
    }
}

/// Read access to a catalog of versioned resources
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn services(&self, options: &QueryOptions) -> CatalogResult<Vec<Service>>;

    async fn messages(&self, kind: MessageKind, options: &QueryOptions) -> CatalogResult<Vec<Message>>;

    async fn channels(&self, options: &QueryOptions) -> CatalogResult<Vec<Channel>>;

    async fn containers(&self, options: &QueryOptions) -> CatalogResult<Vec<Container>>;

    async fn domains(&self, options: &QueryOptions) -> CatalogResult<Vec<Domain>>;

    async fn data_products(&self, options: &QueryOptions) -> CatalogResult<Vec<DataProduct>>;

    async fn entities(&self, options: &QueryOptions) -> CatalogResult<Vec<Entity>>;
}

/// Apply [`QueryOptions`] to a full collection
pub fn apply_options<R: CatalogResource>(resources: Vec<R>, options: &QueryOptions) -> Vec<R> {
    if !options.latest_only {
        return resources;
    }
    let keep: Vec<bool> = resources
        .iter()
        .map(|r| latest_version(&resources, &r.meta().id) == Some(r.meta().version.as_str()))
        .collect();
    resources
        .into_iter()
        .zip(keep)
        .filter_map(|(resource, keep)| keep.then_some(resource))
        .collect()
}

/// Read-only snapshot of every collection, taken once per render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub services: Vec<Service>,
    /// Events, commands and queries, in that order
    pub messages: Vec<Message>,
    pub channels: Vec<Channel>,
    pub containers: Vec<Container>,
    pub domains: Vec<Domain>,
    pub data_products: Vec<DataProduct>,
    pub entities: Vec<Entity>,
}

impl Catalog {
    /// Read every collection concurrently and normalise the result
    pub async fn load<S: CatalogSource + ?Sized>(source: &S) -> CatalogResult<Self> {
        let options = QueryOptions::default();
        let (services, events, commands, queries, channels, containers, domains, data_products, entities) = tokio::try_join!(
            source.services(&options),
            source.messages(MessageKind::Event, &options),
            source.messages(MessageKind::Command, &options),
            source.messages(MessageKind::Query, &options),
            source.channels(&options),
            source.containers(&options),
            source.domains(&options),
            source.data_products(&options),
            source.entities(&options),
        )?;

        let mut messages = events;
        messages.extend(commands);
        messages.extend(queries);

        let catalog = Catalog {
            services,
            messages,
            channels,
            containers,
            domains,
            data_products,
            entities,
        }
        .normalize();

        tracing::debug!(
            services = catalog.services.len(),
            messages = catalog.messages.len(),
            channels = catalog.channels.len(),
            domains = catalog.domains.len(),
            "loaded catalog snapshot"
        );
        Ok(catalog)
    }

    /// Fill each resource's latest-version pointer where the source left it empty
    pub fn normalize(mut self) -> Self {
        fill_latest(&mut self.services, |r| &mut r.meta);
        fill_latest(&mut self.messages, |r| &mut r.meta);
        fill_latest(&mut self.channels, |r| &mut r.meta);
        fill_latest(&mut self.containers, |r| &mut r.meta);
        fill_latest(&mut self.domains, |r| &mut r.meta);
        fill_latest(&mut self.data_products, |r| &mut r.meta);
        fill_latest(&mut self.entities, |r| &mut r.meta);
        self
    }

    pub fn messages_of(&self, kind: MessageKind) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |message| message.kind == kind)
    }
}

fn fill_latest<R: CatalogResource>(resources: &mut [R], meta: fn(&mut R) -> &mut ResourceMeta) {
    let snapshot: &[R] = resources;
    let latest: Vec<Option<String>> = snapshot
        .iter()
        .map(|r| latest_version(snapshot, &r.meta().id).map(str::to_string))
        .collect();

    for (resource, latest) in resources.iter_mut().zip(latest) {
        let meta = meta(resource);
        if meta.latest_version.is_none() {
            meta.latest_version = latest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fills_latest_pointer() {
        let mut archived = Message::event("OrderPlaced", "0.0.1");
        archived.meta.archived = true;
        let catalog = Catalog {
            messages: vec![
                archived,
                Message::event("OrderPlaced", "1.5.1"),
                Message::command("PlaceOrder", "2.0.0").with_latest_version("3.0.0"),
            ],
            ..Catalog::default()
        }
        .normalize();

        assert_eq!(catalog.messages[0].meta.latest_version.as_deref(), Some("1.5.1"));
        assert!(!catalog.messages[0].meta.is_latest());
        assert!(catalog.messages[1].meta.is_latest());
        assert_eq!(catalog.messages[2].meta.latest_version.as_deref(), Some("3.0.0"));
        assert_eq!(catalog.messages_of(MessageKind::Command).count(), 1);
    }

    #[test]
    fn test_apply_latest_only() {
        let services = vec![
            Service::new("Orders", "1.0.0"),
            Service::new("Orders", "1.2.0"),
            Service::new("Billing", "0.1.0"),
        ];

        let all = apply_options(services.clone(), &QueryOptions::default());
        assert_eq!(all.len(), 3);

        let latest = apply_options(services, &QueryOptions::latest_only());
        let ids: Vec<_> = latest.iter().map(|s| s.node_id()).collect();
        assert_eq!(ids, vec!["Orders-1.2.0", "Billing-0.1.0"]);
    }
}
