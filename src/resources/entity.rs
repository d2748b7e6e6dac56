//! Domain entities and their property-level references

use super::{CatalogResource, ReceivesPointer, ResourceKind, ResourceMeta, SendsPointer};
use serde::{Deserialize, Serialize};

/// Cardinality of an entity reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationType {
    HasOne,
    HasMany,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::HasOne => "hasOne",
            RelationType::HasMany => "hasMany",
        }
    }
}

/// One property of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProperty {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Id of the entity this property points at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    /// Property of the referenced entity that is pointed at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<RelationType>,
}

impl EntityProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: None,
            required: false,
            description: None,
            references: None,
            references_identifier: None,
            relation_type: None,
        }
    }

    pub fn referencing(mut self, entity_id: impl Into<String>, relation: RelationType) -> Self {
        self.references = Some(entity_id.into());
        self.relation_type = Some(relation);
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.references_identifier = Some(identifier.into());
        self
    }
}

/// A domain object; aggregates may also send and receive messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub aggregate_root: bool,
    #[serde(default)]
    pub properties: Vec<EntityProperty>,
    #[serde(default)]
    pub sends: Vec<SendsPointer>,
    #[serde(default)]
    pub receives: Vec<ReceivesPointer>,
}

impl Entity {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            meta: ResourceMeta::new(id, version),
            identifier: None,
            aggregate_root: false,
            properties: Vec::new(),
            sends: Vec::new(),
            receives: Vec::new(),
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_property(mut self, property: EntityProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_sends(mut self, pointer: SendsPointer) -> Self {
        self.sends.push(pointer);
        self
    }

    pub fn with_receives(mut self, pointer: ReceivesPointer) -> Self {
        self.receives.push(pointer);
        self
    }

    /// Properties that point at another entity
    pub fn references(&self) -> impl Iterator<Item = &EntityProperty> {
        self.properties.iter().filter(|p| p.references.is_some())
    }
}

impl CatalogResource for Entity {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Entity
    }
}
