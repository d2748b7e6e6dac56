//! End-to-end tests: catalog directory on disk through the engine

use eventcatalog_graph::{
    CatalogError, CatalogIndexCache, EntityMapOwner, FileCatalog, Focus, GraphConfig, GraphEngine, GraphKind,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, frontmatter: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("---\n{frontmatter}---\n\n# Notes\n")).unwrap();
}

fn sample_catalog() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "events/OrderPlaced/index.md", "id: OrderPlaced\nversion: 1.0.0\n");
    write(root, "events/OrderPlaced/versioned/0.0.1/index.md", "id: OrderPlaced\nversion: 0.0.1\n");
    write(
        root,
        "channels/orders/index.mdx",
        "id: orders\nversion: 1.0.0\naddress: orders.events\nprotocols:\n  - kafka\n",
    );
    write(
        root,
        "domains/Sales/index.md",
        "id: Sales\nversion: 1.0.0\nservices:\n  - id: Orders\n  - id: Billing\nentities:\n  - id: Order\n",
    );
    write(
        root,
        "domains/Sales/services/Orders/index.md",
        "id: Orders\nversion: 1.0.0\nsends:\n  - id: OrderPlaced\n    to:\n      - id: orders\nwritesTo:\n  - id: OrdersDb\n",
    );
    write(
        root,
        "domains/Sales/services/Billing/index.md",
        "id: Billing\nversion: 1.0.0\nreceives:\n  - id: OrderPlaced\n    version: ^1.0.0\n    from:\n      - id: orders\n",
    );
    write(root, "containers/OrdersDb/index.md", "id: OrdersDb\nversion: 1.0.0\ntechnology: postgres\n");
    write(
        root,
        "entities/Order/index.md",
        "id: Order\nversion: 1.0.0\nidentifier: orderId\naggregateRoot: true\nproperties:\n  - name: orderId\n    type: string\n  - name: customerId\n    type: string\n    references: Customer\n    relationType: hasOne\n",
    );
    write(
        root,
        "entities/Customer/index.md",
        "id: Customer\nversion: 1.0.0\nidentifier: customerId\nproperties:\n  - name: customerId\n    type: string\n",
    );

    dir
}

#[tokio::test]
async fn test_message_graph_from_disk() {
    let dir = sample_catalog();
    let engine = GraphEngine::new(FileCatalog::new(dir.path()));

    let graph = engine.message_graph(&Focus::new("OrderPlaced")).await.unwrap();
    let mut edges: Vec<&str> = graph.edges.iter().map(|edge| edge.id.as_str()).collect();
    edges.sort_unstable();
    assert_eq!(
        edges,
        vec![
            "OrderPlaced-1.0.0-orders-1.0.0",
            "Orders-1.0.0-OrderPlaced-1.0.0",
            "orders-1.0.0-Billing-1.0.0",
        ]
    );

    let x = |id: &str| graph.node(id).unwrap().position.x;
    assert!(x("Orders-1.0.0") < x("OrderPlaced-1.0.0"));
    assert!(x("OrderPlaced-1.0.0") < x("orders-1.0.0"));
    assert!(x("orders-1.0.0") < x("Billing-1.0.0"));

    let channel = graph.node("orders-1.0.0").unwrap();
    assert_eq!(channel.data.extra["address"], "orders.events");
}

#[tokio::test]
async fn test_archived_version_stays_addressable() {
    let dir = sample_catalog();
    let engine = GraphEngine::new(FileCatalog::new(dir.path()));

    let archived = engine
        .message_graph(&Focus::versioned("OrderPlaced", "0.0.1"))
        .await
        .unwrap();
    assert!(archived.node("OrderPlaced-0.0.1").is_some());
    // Billing only accepts ^1.0.0
    assert!(archived.node("Billing-1.0.0").is_none());
}

#[tokio::test]
async fn test_every_kind_builds_from_disk() {
    let dir = sample_catalog();
    let engine = GraphEngine::new(FileCatalog::new(dir.path()));

    let cases = [
        (GraphKind::Service, "Orders"),
        (GraphKind::Domain, "Sales"),
        (GraphKind::Container, "OrdersDb"),
        (GraphKind::DomainEntities, "Sales"),
    ];
    for (kind, id) in cases {
        let graph = engine.build(kind, &Focus::new(id)).await.unwrap();
        assert!(!graph.is_empty(), "{kind} graph for {id} is empty");
        for edge in &graph.edges {
            assert!(graph.node(&edge.source).is_some());
            assert!(graph.node(&edge.target).is_some());
        }
        for (index, node) in graph.nodes.iter().enumerate() {
            if let Some(parent) = &node.parent_id {
                let parent_index = graph.nodes.iter().position(|n| &n.id == parent).unwrap();
                assert!(parent_index < index, "{} listed before its group {parent}", node.id);
            }
        }
    }

    let unknown = engine.build(GraphKind::DataProduct, &Focus::new("Nothing")).await.unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn test_entity_map_from_disk() {
    let dir = sample_catalog();
    let engine = GraphEngine::new(FileCatalog::new(dir.path()));

    let graph = engine.entity_map(EntityMapOwner::Domain, &Focus::new("Sales")).await.unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].target_handle.as_deref(), Some("customerId-target"));

    let order = graph.node("Order-1.0.0").unwrap();
    let customer = graph.node("Customer-1.0.0").unwrap();
    assert_eq!(order.data.extra["aggregateRoot"], true);
    assert!(order.position.distance_to(&customer.position) > 1.0);
}

#[tokio::test]
async fn test_config_and_layout_toggle() {
    let dir = sample_catalog();
    let config_path = dir.path().join("graph.yaml");
    fs::write(&config_path, "layout:\n  rankSpacing: 500\n  nodeWidth: 100\n").unwrap();
    let config = GraphConfig::load(&config_path).unwrap();

    let engine = GraphEngine::with_config(FileCatalog::new(dir.path()), config);
    let graph = engine.message_graph(&Focus::new("OrderPlaced")).await.unwrap();
    assert_eq!(graph.node("OrderPlaced-1.0.0").unwrap().position.x, 600.0);

    let raw = GraphEngine::new(FileCatalog::new(dir.path())).without_layout();
    let graph = raw.message_graph(&Focus::new("OrderPlaced")).await.unwrap();
    assert!(graph.nodes.iter().all(|node| node.position.is_origin()));
}

#[tokio::test]
async fn test_shared_cache_scans_once() {
    let dir = sample_catalog();
    let cache = Arc::new(CatalogIndexCache::new());
    let first = GraphEngine::new(FileCatalog::with_cache(dir.path(), Arc::clone(&cache)));
    let second = GraphEngine::new(FileCatalog::with_cache(dir.path(), Arc::clone(&cache)));

    let focus_a = Focus::new("Orders");
    let focus_b = Focus::new("Orders");
    let (a, b) = tokio::join!(
        first.service_graph(&focus_a),
        second.service_graph(&focus_b),
    );
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(cache.len(), 1);

    write(dir.path(), "services/Audit/index.md", "id: Audit\nversion: 1.0.0\n");
    assert!(first.service_graph(&Focus::new("Audit")).await.unwrap().is_empty());
    cache.invalidate_root(dir.path());
    assert!(!first.service_graph(&Focus::new("Audit")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_broken_catalog_surfaces_error() {
    let dir = sample_catalog();
    write(dir.path(), "services/Broken/index.md", "id: [unclosed\n");

    let engine = GraphEngine::new(FileCatalog::new(dir.path()));
    let result = engine.message_graph(&Focus::new("OrderPlaced")).await;
    assert!(matches!(result, Err(CatalogError::Frontmatter { .. })));

    let missing = GraphEngine::new(FileCatalog::new(dir.path().join("nowhere")));
    assert!(matches!(
        missing.service_graph(&Focus::new("Orders")).await,
        Err(CatalogError::Io { .. })
    ));
}

#[tokio::test]
async fn test_unquoted_decimal_version_is_reported() {
    let dir = sample_catalog();
    write(dir.path(), "services/Legacy/index.md", "id: Legacy\nversion: 1.10\n");

    let engine = GraphEngine::new(FileCatalog::new(dir.path()));
    match engine.service_graph(&Focus::new("Legacy")).await {
        Err(CatalogError::Frontmatter { path, source }) => {
            assert!(path.ends_with("services/Legacy/index.md"));
            assert!(source.to_string().contains("quote it"));
        }
        other => panic!("expected a frontmatter error, got {other:?}"),
    }
}
