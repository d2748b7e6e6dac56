//! Relationship hydration
//!
//! Producers and consumers are never authored on a message. They are derived by
//! scanning every service, data product and entity for `sends`/`receives`
//! (or `outputs`/`inputs`) pointers that match the message.

use crate::resources::{
    CatalogResource, Container, DataProduct, Entity, Message, Pointer, ResourceKind,
    ResourceMeta, ResourceRef, ResourceStub, Service,
};
use crate::version::{resolve_first, satisfies, LATEST};

/// Whether a pointer selects the given resource instance
///
/// An unversioned pointer matches every version. `latest` matches only the
/// instance named by the target's own latest-version pointer. Anything else is
/// an exact version or a semver range.
pub fn pointer_matches<P, R>(pointer: &P, target: &R) -> bool
where
    P: Pointer + ?Sized,
    R: CatalogResource + ?Sized,
{
    let meta = target.meta();
    if pointer.pointer_id() != meta.id {
        return false;
    }
    match pointer.pointer_version() {
        None => true,
        Some(LATEST) => meta.is_latest(),
        Some(token) => satisfies(&meta.version, token),
    }
}

/// A resource that can send or receive messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticipantRef<'a> {
    Service(&'a Service),
    DataProduct(&'a DataProduct),
    Entity(&'a Entity),
}

impl<'a> ParticipantRef<'a> {
    /// Channels this participant sends `message` to
    pub fn channels_to(&self, message: &Message) -> &'a [ResourceRef] {
        let sends = match *self {
            ParticipantRef::Service(service) => &service.sends,
            ParticipantRef::Entity(entity) => &entity.sends,
            ParticipantRef::DataProduct(_) => return &[],
        };
        sends
            .iter()
            .find(|pointer| pointer_matches(*pointer, message))
            .map(|pointer| pointer.to.as_slice())
            .unwrap_or(&[])
    }

    /// Channels this participant receives `message` from
    pub fn channels_from(&self, message: &Message) -> &'a [ResourceRef] {
        let receives = match *self {
            ParticipantRef::Service(service) => &service.receives,
            ParticipantRef::Entity(entity) => &entity.receives,
            ParticipantRef::DataProduct(_) => return &[],
        };
        receives
            .iter()
            .find(|pointer| pointer_matches(*pointer, message))
            .map(|pointer| pointer.from.as_slice())
            .unwrap_or(&[])
    }

    pub fn produces(&self, message: &Message) -> bool {
        match self {
            ParticipantRef::Service(service) => service.sends.iter().any(|p| pointer_matches(p, message)),
            ParticipantRef::DataProduct(product) => product.outputs.iter().any(|p| pointer_matches(p, message)),
            ParticipantRef::Entity(entity) => entity.sends.iter().any(|p| pointer_matches(p, message)),
        }
    }

    pub fn consumes(&self, message: &Message) -> bool {
        match self {
            ParticipantRef::Service(service) => service.receives.iter().any(|p| pointer_matches(p, message)),
            ParticipantRef::DataProduct(product) => product.inputs.iter().any(|p| pointer_matches(p, message)),
            ParticipantRef::Entity(entity) => entity.receives.iter().any(|p| pointer_matches(p, message)),
        }
    }
}

impl CatalogResource for ParticipantRef<'_> {
    fn meta(&self) -> &ResourceMeta {
        match self {
            ParticipantRef::Service(service) => &service.meta,
            ParticipantRef::DataProduct(product) => &product.meta,
            ParticipantRef::Entity(entity) => &entity.meta,
        }
    }

    fn resource_kind(&self) -> ResourceKind {
        match self {
            ParticipantRef::Service(_) => ResourceKind::Service,
            ParticipantRef::DataProduct(_) => ResourceKind::DataProduct,
            ParticipantRef::Entity(_) => ResourceKind::Entity,
        }
    }
}

/// A producer or consumer, either the full record or a minimal stub
#[derive(Debug, Clone, PartialEq)]
pub enum Participant<'a> {
    Hydrated(ParticipantRef<'a>),
    Stub(ResourceStub),
}

impl Participant<'_> {
    pub fn stub(&self) -> ResourceStub {
        match self {
            Participant::Hydrated(participant) => participant.stub(),
            Participant::Stub(stub) => stub.clone(),
        }
    }
}

/// Input to [`hydrate_producers_and_consumers`]
#[derive(Debug, Clone, Copy)]
pub struct HydrateRequest<'a> {
    pub message: &'a Message,
    pub services: &'a [Service],
    pub data_products: &'a [DataProduct],
    pub entities: Option<&'a [Entity]>,
    /// When false, participants are returned as `{id, version}` stubs
    pub hydrate: bool,
}

/// Producers and consumers of one message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProducersAndConsumers<'a> {
    pub producers: Vec<Participant<'a>>,
    pub consumers: Vec<Participant<'a>>,
}

/// Borrowed producers and consumers, as the graph builders use them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relations<'a> {
    pub producers: Vec<ParticipantRef<'a>>,
    pub consumers: Vec<ParticipantRef<'a>>,
}

impl<'a> Relations<'a> {
    /// Scan every candidate once, in services, data products, entities order
    pub fn of(
        message: &Message,
        services: &'a [Service],
        data_products: &'a [DataProduct],
        entities: &'a [Entity],
    ) -> Self {
        let candidates = services
            .iter()
            .map(ParticipantRef::Service)
            .chain(data_products.iter().map(ParticipantRef::DataProduct))
            .chain(entities.iter().map(ParticipantRef::Entity));

        let mut relations = Relations::default();
        for candidate in candidates {
            if candidate.produces(message) {
                relations.producers.push(candidate);
            }
            if candidate.consumes(message) {
                relations.consumers.push(candidate);
            }
        }
        relations
    }

    /// Node ids present on both sides
    pub fn both_sent_and_received(&self) -> Vec<ParticipantRef<'a>> {
        self.producers
            .iter()
            .filter(|producer| {
                let id = producer.node_id();
                self.consumers.iter().any(|consumer| consumer.node_id() == id)
            })
            .copied()
            .collect()
    }
}

/// Compute the producers and consumers of a message
pub fn hydrate_producers_and_consumers<'a>(request: HydrateRequest<'a>) -> ProducersAndConsumers<'a> {
    let relations = Relations::of(
        request.message,
        request.services,
        request.data_products,
        request.entities.unwrap_or(&[]),
    );

    let wrap = |participant: ParticipantRef<'a>| {
        if request.hydrate {
            Participant::Hydrated(participant)
        } else {
            Participant::Stub(ResourceStub {
                id: participant.meta().id.clone(),
                version: participant.meta().version.clone(),
                collection: participant.resource_kind(),
                name: None,
                summary: None,
            })
        }
    };

    ProducersAndConsumers {
        producers: relations.producers.into_iter().map(wrap).collect(),
        consumers: relations.consumers.into_iter().map(wrap).collect(),
    }
}

fn services_for_container<'a>(
    container: &Container,
    services: &'a [Service],
    declared: Option<&[ResourceRef]>,
    pointers: impl Fn(&Service) -> &[ResourceRef],
) -> Vec<&'a Service> {
    match declared {
        Some(refs) => refs.iter().filter_map(|r| resolve_first(services, r)).collect(),
        None => services
            .iter()
            .filter(|service| pointers(service).iter().any(|p| pointer_matches(p, container)))
            .collect(),
    }
}

/// Services writing to a container, pre-hydrated or inferred from `writesTo`
pub fn services_that_write_to_container<'a>(container: &Container, services: &'a [Service]) -> Vec<&'a Service> {
    services_for_container(
        container,
        services,
        container.services_that_write_to_container.as_deref(),
        |service| service.writes_to.as_slice(),
    )
}

/// Services reading from a container, pre-hydrated or inferred from `readsFrom`
pub fn services_that_read_from_container<'a>(container: &Container, services: &'a [Service]) -> Vec<&'a Service> {
    services_for_container(
        container,
        services,
        container.services_that_read_from_container.as_deref(),
        |service| service.reads_from.as_slice(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{ReceivesPointer, SendsPointer};

    fn order_placed(version: &str) -> Message {
        Message::event("OrderPlaced", version).with_latest_version("2.0.0")
    }

    #[test]
    fn test_unversioned_pointer_matches_any_version() {
        let services = vec![Service::new("Orders", "1.0.0").with_sends(SendsPointer::new("OrderPlaced", None))];
        let old = order_placed("0.0.1");

        let hydrated = hydrate_producers_and_consumers(HydrateRequest {
            message: &old,
            services: &services,
            data_products: &[],
            entities: None,
            hydrate: true,
        });
        assert_eq!(hydrated.producers.len(), 1);
        assert!(hydrated.consumers.is_empty());
    }

    #[test]
    fn test_latest_pointer_requires_latest_instance() {
        let products = vec![DataProduct::new("Analytics", "1.0.0")
            .with_input(ResourceRef::versioned("OrderPlaced", "latest"))];

        let old = order_placed("1.0.0");
        let current = order_placed("2.0.0");

        let for_old = Relations::of(&old, &[], &products, &[]);
        let for_current = Relations::of(&current, &[], &products, &[]);
        assert!(for_old.consumers.is_empty());
        assert_eq!(for_current.consumers.len(), 1);
    }

    #[test]
    fn test_range_pointer() {
        let services = vec![Service::new("Billing", "1.0.0")
            .with_receives(ReceivesPointer::new("OrderPlaced", Some("^1.0.0")))];

        assert!(Relations::of(&order_placed("0.0.1"), &services, &[], &[]).consumers.is_empty());
        assert_eq!(Relations::of(&order_placed("1.5.1"), &services, &[], &[]).consumers.len(), 1);
    }

    #[test]
    fn test_npm_range_pointers() {
        let services = vec![
            Service::new("Billing", "1.0.0")
                .with_receives(ReceivesPointer::new("OrderPlaced", Some(">=1.0.0 <2.0.0"))),
            Service::new("Audit", "1.0.0")
                .with_receives(ReceivesPointer::new("OrderPlaced", Some("1.0.0 - 1.9.9 || ^2.0.0"))),
        ];
        let consumers = |version: &str| -> Vec<String> {
            Relations::of(&order_placed(version), &services, &[], &[])
                .consumers
                .iter()
                .map(|participant| participant.meta().id.clone())
                .collect()
        };

        assert_eq!(consumers("1.5.1"), vec!["Billing", "Audit"]);
        assert_eq!(consumers("2.0.0"), vec!["Audit"]);
        assert!(consumers("0.9.0").is_empty());
    }

    #[test]
    fn test_entities_only_when_supplied() {
        let entities = vec![Entity::new("Order", "1.0.0").with_sends(SendsPointer::new("OrderPlaced", None))];
        let message = order_placed("2.0.0");

        let without = hydrate_producers_and_consumers(HydrateRequest {
            message: &message,
            services: &[],
            data_products: &[],
            entities: None,
            hydrate: true,
        });
        let with = hydrate_producers_and_consumers(HydrateRequest {
            message: &message,
            services: &[],
            data_products: &[],
            entities: Some(entities.as_slice()),
            hydrate: false,
        });

        assert!(without.producers.is_empty());
        assert_eq!(
            with.producers,
            vec![Participant::Stub(ResourceStub {
                id: "Order".to_string(),
                version: "1.0.0".to_string(),
                collection: ResourceKind::Entity,
                name: None,
                summary: None,
            })]
        );
    }

    #[test]
    fn test_channels_for_matching_pointer() {
        let service = Service::new("Orders", "1.0.0")
            .with_sends(SendsPointer::new("OrderPlaced", Some("1.0.0")))
            .with_sends(SendsPointer::new("OrderPlaced", Some("2.0.0")).to_channel(ResourceRef::new("orders")));
        let participant = ParticipantRef::Service(&service);

        assert!(participant.channels_to(&order_placed("1.0.0")).is_empty());
        assert_eq!(participant.channels_to(&order_placed("2.0.0"))[0].id, "orders");
        assert!(participant.channels_from(&order_placed("2.0.0")).is_empty());
    }

    #[test]
    fn test_both_sent_and_received() {
        let services = vec![
            Service::new("Loop", "1.0.0")
                .with_sends(SendsPointer::new("OrderPlaced", None))
                .with_receives(ReceivesPointer::new("OrderPlaced", None)),
            Service::new("Sender", "1.0.0").with_sends(SendsPointer::new("OrderPlaced", None)),
        ];
        let relations = Relations::of(&order_placed("2.0.0"), &services, &[], &[]);

        let both = relations.both_sent_and_received();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].node_id(), "Loop-1.0.0");
    }

    #[test]
    fn test_container_inference() {
        let container = Container::new("orders-db", "1.0.0");
        let services = vec![
            Service::new("Writer", "1.0.0").with_writes_to(ResourceRef::new("orders-db")),
            Service::new("Reader", "1.0.0").with_reads_from(ResourceRef::versioned("orders-db", "^1")),
            Service::new("Other", "1.0.0").with_reads_from(ResourceRef::versioned("orders-db", "2.0.0")),
        ];

        let writers = services_that_write_to_container(&container, &services);
        let readers = services_that_read_from_container(&container, &services);
        assert_eq!(writers.len(), 1);
        assert_eq!(writers[0].meta.id, "Writer");
        assert_eq!(readers.len(), 1);
        assert_eq!(readers[0].meta.id, "Reader");

        let mut declared = container.clone();
        declared.services_that_read_from_container = Some(vec![ResourceRef::new("Other")]);
        let readers = services_that_read_from_container(&declared, &services);
        assert_eq!(readers[0].meta.id, "Other");
    }
}
