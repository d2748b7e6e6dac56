//! Catalog resources
//!
//! Every resource is versioned and identified by `(id, version)`. The shapes
//! mirror the frontmatter authors write, so field names deserialize from
//! camelCase and versions may be written as bare YAML integers. A bare decimal
//! such as `1.10` is rejected: YAML reads it as the float `1.1`.

mod entity;

pub use entity::{Entity, EntityProperty, RelationType};

use crate::graph::node_id;
use crate::value_objects::NodeType;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Discriminant of every resource collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "services")]
    Service,
    #[serde(rename = "events")]
    Event,
    #[serde(rename = "commands")]
    Command,
    #[serde(rename = "queries")]
    Query,
    #[serde(rename = "channels")]
    Channel,
    #[serde(rename = "containers")]
    Container,
    #[serde(rename = "data-products")]
    DataProduct,
    #[serde(rename = "entities")]
    Entity,
    #[serde(rename = "domains")]
    Domain,
}

impl ResourceKind {
    /// Collection directory name for this kind
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Service => "services",
            ResourceKind::Event => "events",
            ResourceKind::Command => "commands",
            ResourceKind::Query => "queries",
            ResourceKind::Channel => "channels",
            ResourceKind::Container => "containers",
            ResourceKind::DataProduct => "data-products",
            ResourceKind::Entity => "entities",
            ResourceKind::Domain => "domains",
        }
    }

    /// Parse a collection directory name
    pub fn from_collection(collection: &str) -> Option<Self> {
        match collection {
            "services" => Some(ResourceKind::Service),
            "events" => Some(ResourceKind::Event),
            "commands" => Some(ResourceKind::Command),
            "queries" => Some(ResourceKind::Query),
            "channels" => Some(ResourceKind::Channel),
            "containers" => Some(ResourceKind::Container),
            "data-products" => Some(ResourceKind::DataProduct),
            "entities" => Some(ResourceKind::Entity),
            "domains" => Some(ResourceKind::Domain),
            _ => None,
        }
    }

    /// Node type used when this kind is rendered
    pub fn node_type(&self) -> NodeType {
        match self {
            ResourceKind::Service => NodeType::Service,
            ResourceKind::Event => NodeType::Event,
            ResourceKind::Command => NodeType::Command,
            ResourceKind::Query => NodeType::Query,
            ResourceKind::Channel => NodeType::Channel,
            ResourceKind::Container => NodeType::Container,
            ResourceKind::DataProduct => NodeType::DataProduct,
            ResourceKind::Entity => NodeType::Entity,
            ResourceKind::Domain => NodeType::DomainGroup,
        }
    }

    /// The message kind, if this is a message collection
    pub fn message_kind(&self) -> Option<MessageKind> {
        match self {
            ResourceKind::Event => Some(MessageKind::Event),
            ResourceKind::Command => Some(MessageKind::Command),
            ResourceKind::Query => Some(MessageKind::Query),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// The three message collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Event,
    Command,
    Query,
}

impl MessageKind {
    pub const ALL: [MessageKind; 3] = [MessageKind::Event, MessageKind::Command, MessageKind::Query];
}

impl From<MessageKind> for ResourceKind {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Event => ResourceKind::Event,
            MessageKind::Command => ResourceKind::Command,
            MessageKind::Query => ResourceKind::Query,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionScalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl VersionScalar {
    fn into_string<E: serde::de::Error>(self) -> Result<String, E> {
        match self {
            VersionScalar::Text(s) => Ok(s),
            VersionScalar::Integer(n) => Ok(n.to_string()),
            // the written digits are gone by now: 1.10 and 1.1 parse the same
            VersionScalar::Float(n) => Err(E::custom(format!(
                "version `{n}` was read as a decimal number and may have lost digits; quote it, e.g. version: \"{n}\""
            ))),
        }
    }
}

fn version_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    VersionScalar::deserialize(deserializer)?.into_string()
}

fn optional_version_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<VersionScalar>::deserialize(deserializer)?
        .map(VersionScalar::into_string)
        .transpose()
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Identity and descriptive fields shared by every resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    pub id: String,
    #[serde(deserialize_with = "version_string")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Pointer to the newest version of this id; filled in by the catalog
    /// snapshot when the source does not provide it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    /// Set for instances stored under a `versioned/` archive directory
    #[serde(default, skip_serializing_if = "is_false")]
    pub archived: bool,
}

impl ResourceMeta {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            name: None,
            summary: None,
            latest_version: None,
            archived: false,
        }
    }

    /// Display name, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Whether this instance is the one its latest-version pointer names
    pub fn is_latest(&self) -> bool {
        match &self.latest_version {
            Some(latest) => latest == &self.version,
            None => !self.archived,
        }
    }
}

/// A reference to another resource, optionally pinned to a version,
/// an npm-style range, or `latest`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "optional_version_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

impl ResourceRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
        }
    }

    pub fn versioned(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: Some(version.into()),
        }
    }
}

/// A service or entity declaring it sends a message, optionally through channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendsPointer {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "optional_version_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<ResourceRef>,
}

impl SendsPointer {
    pub fn new(id: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            id: id.into(),
            version: version.map(str::to_string),
            to: Vec::new(),
        }
    }

    pub fn to_channel(mut self, channel: ResourceRef) -> Self {
        self.to.push(channel);
        self
    }
}

/// A service or entity declaring it receives a message, optionally from channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivesPointer {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "optional_version_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<ResourceRef>,
}

impl ReceivesPointer {
    pub fn new(id: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            id: id.into(),
            version: version.map(str::to_string),
            from: Vec::new(),
        }
    }

    pub fn from_channel(mut self, channel: ResourceRef) -> Self {
        self.from.push(channel);
        self
    }
}

/// Anything that points at a resource by id and optional version token
pub trait Pointer {
    fn pointer_id(&self) -> &str;
    fn pointer_version(&self) -> Option<&str>;
}

impl Pointer for ResourceRef {
    fn pointer_id(&self) -> &str {
        &self.id
    }
    fn pointer_version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl Pointer for SendsPointer {
    fn pointer_id(&self) -> &str {
        &self.id
    }
    fn pointer_version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl Pointer for ReceivesPointer {
    fn pointer_id(&self) -> &str {
        &self.id
    }
    fn pointer_version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Common accessors for every resource struct
pub trait CatalogResource {
    fn meta(&self) -> &ResourceMeta;
    fn resource_kind(&self) -> ResourceKind;

    /// Graph node id, `<id>-<version>`
    fn node_id(&self) -> String {
        let meta = self.meta();
        node_id(&meta.id, &meta.version)
    }

    /// Minimal `{id, version}` record for this resource
    fn stub(&self) -> ResourceStub {
        ResourceStub::from_meta(self.meta(), self.resource_kind())
    }
}

/// Lightweight stand-in for a resource, used in node/edge payloads and
/// non-hydrated relationship lists
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStub {
    pub id: String,
    pub version: String,
    pub collection: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ResourceStub {
    pub fn from_meta(meta: &ResourceMeta, kind: ResourceKind) -> Self {
        Self {
            id: meta.id.clone(),
            version: meta.version.clone(),
            collection: kind,
            name: meta.name.clone(),
            summary: meta.summary.clone(),
        }
    }

    pub fn node_id(&self) -> String {
        node_id(&self.id, &self.version)
    }
}

/// A service: sends and receives messages, reads and writes containers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(default)]
    pub sends: Vec<SendsPointer>,
    #[serde(default)]
    pub receives: Vec<ReceivesPointer>,
    #[serde(default)]
    pub writes_to: Vec<ResourceRef>,
    #[serde(default)]
    pub reads_from: Vec<ResourceRef>,
    #[serde(default)]
    pub entities: Vec<ResourceRef>,
}

impl Service {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            meta: ResourceMeta::new(id, version),
            sends: Vec::new(),
            receives: Vec::new(),
            writes_to: Vec::new(),
            reads_from: Vec::new(),
            entities: Vec::new(),
        }
    }

    pub fn with_sends(mut self, pointer: SendsPointer) -> Self {
        self.sends.push(pointer);
        self
    }

    pub fn with_receives(mut self, pointer: ReceivesPointer) -> Self {
        self.receives.push(pointer);
        self
    }

    pub fn with_writes_to(mut self, container: ResourceRef) -> Self {
        self.writes_to.push(container);
        self
    }

    pub fn with_reads_from(mut self, container: ResourceRef) -> Self {
        self.reads_from.push(container);
        self
    }

    pub fn with_entity(mut self, entity: ResourceRef) -> Self {
        self.entities.push(entity);
        self
    }
}

impl CatalogResource for Service {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Service
    }
}

/// An event, command or query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    /// Set from the collection the message was read from
    #[serde(skip)]
    pub kind: MessageKind,
    #[serde(default)]
    pub channels: Vec<ResourceRef>,
}

impl Message {
    pub fn new(kind: MessageKind, id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            meta: ResourceMeta::new(id, version),
            kind,
            channels: Vec::new(),
        }
    }

    pub fn event(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(MessageKind::Event, id, version)
    }

    pub fn command(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(MessageKind::Command, id, version)
    }

    pub fn query(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(MessageKind::Query, id, version)
    }

    pub fn with_latest_version(mut self, latest: impl Into<String>) -> Self {
        self.meta.latest_version = Some(latest.into());
        self
    }
}

impl CatalogResource for Message {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
    fn resource_kind(&self) -> ResourceKind {
        self.kind.into()
    }
}

/// A transport channel; `routes` forwards its content to further channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(default)]
    pub routes: Vec<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub protocols: Vec<String>,
}

impl Channel {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            meta: ResourceMeta::new(id, version),
            routes: Vec::new(),
            address: None,
            protocols: Vec::new(),
        }
    }

    pub fn with_route(mut self, channel: ResourceRef) -> Self {
        self.routes.push(channel);
        self
    }
}

impl CatalogResource for Channel {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Channel
    }
}

/// A data store services read from and write to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    /// Pre-hydrated writers; computed from services when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services_that_write_to_container: Option<Vec<ResourceRef>>,
    /// Pre-hydrated readers; computed from services when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services_that_read_from_container: Option<Vec<ResourceRef>>,
}

impl Container {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            meta: ResourceMeta::new(id, version),
            container_type: None,
            technology: None,
            services_that_write_to_container: None,
            services_that_read_from_container: None,
        }
    }
}

impl CatalogResource for Container {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Container
    }
}

/// A batch or pipeline resource consuming `inputs` and producing `outputs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProduct {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(default)]
    pub inputs: Vec<ResourceRef>,
    #[serde(default)]
    pub outputs: Vec<ResourceRef>,
}

impl DataProduct {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            meta: ResourceMeta::new(id, version),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: ResourceRef) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_output(mut self, output: ResourceRef) -> Self {
        self.outputs.push(output);
        self
    }
}

impl CatalogResource for DataProduct {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::DataProduct
    }
}

/// A bounded context grouping services, sub-domains and entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(default)]
    pub services: Vec<ResourceRef>,
    #[serde(default)]
    pub domains: Vec<ResourceRef>,
    #[serde(default)]
    pub entities: Vec<ResourceRef>,
    #[serde(default)]
    pub data_products: Vec<ResourceRef>,
}

impl Domain {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            meta: ResourceMeta::new(id, version),
            services: Vec::new(),
            domains: Vec::new(),
            entities: Vec::new(),
            data_products: Vec::new(),
        }
    }

    pub fn with_service(mut self, service: ResourceRef) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_subdomain(mut self, domain: ResourceRef) -> Self {
        self.domains.push(domain);
        self
    }

    pub fn with_entity(mut self, entity: ResourceRef) -> Self {
        self.entities.push(entity);
        self
    }
}

impl CatalogResource for Domain {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Domain
    }
}

/// Any catalog resource, discriminated by its collection
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Service(Service),
    Message(Message),
    Channel(Channel),
    Container(Container),
    DataProduct(DataProduct),
    Entity(Entity),
    Domain(Domain),
}

macro_rules! impl_from_resource {
    ($($variant:ident),*) => {
        $(impl From<$variant> for Resource {
            fn from(resource: $variant) -> Self {
                Resource::$variant(resource)
            }
        })*
    };
}

impl_from_resource!(Service, Message, Channel, Container, DataProduct, Entity, Domain);

impl Resource {
    /// Deserialize frontmatter for the given collection
    pub fn from_frontmatter(kind: ResourceKind, value: serde_yaml::Value) -> Result<Self, serde_yaml::Error> {
        Ok(match kind {
            ResourceKind::Service => Resource::Service(serde_yaml::from_value(value)?),
            ResourceKind::Event | ResourceKind::Command | ResourceKind::Query => {
                let mut message: Message = serde_yaml::from_value(value)?;
                message.kind = kind.message_kind().unwrap_or_default();
                Resource::Message(message)
            }
            ResourceKind::Channel => Resource::Channel(serde_yaml::from_value(value)?),
            ResourceKind::Container => Resource::Container(serde_yaml::from_value(value)?),
            ResourceKind::DataProduct => Resource::DataProduct(serde_yaml::from_value(value)?),
            ResourceKind::Entity => Resource::Entity(serde_yaml::from_value(value)?),
            ResourceKind::Domain => Resource::Domain(serde_yaml::from_value(value)?),
        })
    }

    pub fn meta_mut(&mut self) -> &mut ResourceMeta {
        match self {
            Resource::Service(r) => &mut r.meta,
            Resource::Message(r) => &mut r.meta,
            Resource::Channel(r) => &mut r.meta,
            Resource::Container(r) => &mut r.meta,
            Resource::DataProduct(r) => &mut r.meta,
            Resource::Entity(r) => &mut r.meta,
            Resource::Domain(r) => &mut r.meta,
        }
    }
}

impl CatalogResource for Resource {
    fn meta(&self) -> &ResourceMeta {
        match self {
            Resource::Service(r) => &r.meta,
            Resource::Message(r) => &r.meta,
            Resource::Channel(r) => &r.meta,
            Resource::Container(r) => &r.meta,
            Resource::DataProduct(r) => &r.meta,
            Resource::Entity(r) => &r.meta,
            Resource::Domain(r) => &r.meta,
        }
    }

    fn resource_kind(&self) -> ResourceKind {
        match self {
            Resource::Service(r) => r.resource_kind(),
            Resource::Message(r) => r.resource_kind(),
            Resource::Channel(r) => r.resource_kind(),
            Resource::Container(r) => r.resource_kind(),
            Resource::DataProduct(r) => r.resource_kind(),
            Resource::Entity(r) => r.resource_kind(),
            Resource::Domain(r) => r.resource_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_frontmatter() {
        let yaml = r#"
id: OrderService
version: 1
name: Orders
sends:
  - id: OrderPlaced
    version: ^1.0.0
    to:
      - id: orders.topic
receives:
  - id: PlaceOrder
writesTo:
  - id: orders-db
"#;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let resource = Resource::from_frontmatter(ResourceKind::Service, value).unwrap();
        let Resource::Service(service) = resource else {
            panic!("expected a service");
        };

        assert_eq!(service.meta.version, "1");
        assert_eq!(service.meta.display_name(), "Orders");
        assert_eq!(service.sends[0].version.as_deref(), Some("^1.0.0"));
        assert_eq!(service.sends[0].to, vec![ResourceRef::new("orders.topic")]);
        assert_eq!(service.receives[0].version, None);
        assert_eq!(service.writes_to[0].id, "orders-db");
        assert!(service.reads_from.is_empty());
    }

    #[test]
    fn test_message_kind_follows_collection() {
        let value: serde_yaml::Value = serde_yaml::from_str("id: PlaceOrder\nversion: 0.0.1\n").unwrap();
        let resource = Resource::from_frontmatter(ResourceKind::Command, value).unwrap();

        assert_eq!(resource.resource_kind(), ResourceKind::Command);
        assert_eq!(resource.node_id(), "PlaceOrder-0.0.1");
        assert_eq!(resource.stub().collection, ResourceKind::Command);
    }

    #[test]
    fn test_missing_version_is_rejected() {
        let value: serde_yaml::Value = serde_yaml::from_str("id: Orders\n").unwrap();
        assert!(Resource::from_frontmatter(ResourceKind::Domain, value).is_err());
    }

    #[test]
    fn test_decimal_versions_must_be_quoted() {
        let value: serde_yaml::Value = serde_yaml::from_str("id: Orders\nversion: 1.10\n").unwrap();
        let err = Resource::from_frontmatter(ResourceKind::Service, value).unwrap_err();
        assert!(err.to_string().contains("quote it"), "{err}");

        let pointer = "id: Orders\nversion: 2\nsends:\n  - id: OrderPlaced\n    version: 1.10\n";
        let value: serde_yaml::Value = serde_yaml::from_str(pointer).unwrap();
        assert!(Resource::from_frontmatter(ResourceKind::Service, value).is_err());

        let quoted: serde_yaml::Value = serde_yaml::from_str("id: Orders\nversion: \"1.10\"\n").unwrap();
        let resource = Resource::from_frontmatter(ResourceKind::Service, quoted).unwrap();
        assert_eq!(resource.node_id(), "Orders-1.10");
    }

    #[test]
    fn test_is_latest_uses_pointer() {
        let mut meta = ResourceMeta::new("A", "1.0.0");
        assert!(meta.is_latest());

        meta.latest_version = Some("2.0.0".to_string());
        assert!(!meta.is_latest());

        meta.version = "2.0.0".to_string();
        assert!(meta.is_latest());
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            ResourceKind::Service,
            ResourceKind::DataProduct,
            ResourceKind::Entity,
            ResourceKind::Domain,
        ] {
            assert_eq!(ResourceKind::from_collection(kind.collection()), Some(kind));
        }
        assert_eq!(ResourceKind::Domain.node_type(), NodeType::DomainGroup);
        assert_eq!(ResourceKind::Query.message_kind(), Some(MessageKind::Query));
    }

    #[test]
    fn test_collection_to_node_type() {
        let node_type = |collection: &str| ResourceKind::from_collection(collection).map(|kind| kind.node_type());
        assert_eq!(node_type("services"), Some(NodeType::Service));
        assert_eq!(node_type("containers"), Some(NodeType::Container));
        assert_eq!(node_type("domains"), Some(NodeType::DomainGroup));
        assert_eq!(node_type("flows"), None);
    }
}
