//! In-memory catalog source

use super::{apply_options, CatalogSource, QueryOptions};
use crate::error::CatalogResult;
use crate::resources::{
    Channel, Container, DataProduct, Domain, Entity, Message, MessageKind, Resource, Service,
};
use async_trait::async_trait;

/// Catalog held in plain vectors
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    services: Vec<Service>,
    messages: Vec<Message>,
    channels: Vec<Channel>,
    containers: Vec<Container>,
    domains: Vec<Domain>,
    data_products: Vec<DataProduct>,
    entities: Vec<Entity>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_resources(resources: impl IntoIterator<Item = Resource>) -> Self {
        let mut catalog = Self::new();
        for resource in resources {
            catalog.insert(resource);
        }
        catalog
    }

    /// Add a resource to the collection its kind belongs to
    pub fn insert(&mut self, resource: impl Into<Resource>) {
        match resource.into() {
            Resource::Service(r) => self.services.push(r),
            Resource::Message(r) => self.messages.push(r),
            Resource::Channel(r) => self.channels.push(r),
            Resource::Container(r) => self.containers.push(r),
            Resource::DataProduct(r) => self.data_products.push(r),
            Resource::Entity(r) => self.entities.push(r),
            Resource::Domain(r) => self.domains.push(r),
        }
    }

    pub fn with(mut self, resource: impl Into<Resource>) -> Self {
        self.insert(resource);
        self
    }

    pub fn len(&self) -> usize {
        self.services.len()
            + self.messages.len()
            + self.channels.len()
            + self.containers.len()
            + self.domains.len()
            + self.data_products.len()
            + self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn services(&self, options: &QueryOptions) -> CatalogResult<Vec<Service>> {
        Ok(apply_options(self.services.clone(), options))
    }

    async fn messages(&self, kind: MessageKind, options: &QueryOptions) -> CatalogResult<Vec<Message>> {
        let messages = self
            .messages
            .iter()
            .filter(|message| message.kind == kind)
            .cloned()
            .collect();
        Ok(apply_options(messages, options))
    }

    async fn channels(&self, options: &QueryOptions) -> CatalogResult<Vec<Channel>> {
        Ok(apply_options(self.channels.clone(), options))
    }

    async fn containers(&self, options: &QueryOptions) -> CatalogResult<Vec<Container>> {
        Ok(apply_options(self.containers.clone(), options))
    }

    async fn domains(&self, options: &QueryOptions) -> CatalogResult<Vec<Domain>> {
        Ok(apply_options(self.domains.clone(), options))
    }

    async fn data_products(&self, options: &QueryOptions) -> CatalogResult<Vec<DataProduct>> {
        Ok(apply_options(self.data_products.clone(), options))
    }

    async fn entities(&self, options: &QueryOptions) -> CatalogResult<Vec<Entity>> {
        Ok(apply_options(self.entities.clone(), options))
    }
}
