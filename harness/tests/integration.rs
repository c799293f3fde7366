//! End-to-end harness scenarios
//!
//! These tests exercise the full lifecycle: start an embedded graph
//! resource, discover it through published properties, wire consumers
//! through the startup graph, query it through a consumer client, degrade
//! its network path, and tear everything down.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    bind_listener, duration_of, graph_db_config, permissive_launcher, FakeGraphNetwork,
    GraphClient, GraphStore, TestFixtures,
};
use harness::{
    ConsumerDeclaration, FaultInjector, HarnessError, ResourceManager, StartupGraph,
};
use shared::ResourceState;

#[tokio::test]
async fn test_graph_round_trip_through_started_resource() {
    let (_bolt_listener, bolt_port) = bind_listener().await;
    let (_https_listener, https_port) = bind_listener().await;

    let manager = ResourceManager::new(Arc::new(permissive_launcher()));
    let resource = manager
        .start(graph_db_config(bolt_port, https_port))
        .await
        .unwrap()
        .expect("resource is enabled");
    assert_eq!(resource.state, ResourceState::Running);

    // Every discoverable entry must be present and non-empty once Running
    let properties = manager.properties();
    for key in [
        "graph-db.host",
        "graph-db.boltPort",
        "graph-db.httpsPort",
        "graph-db.user",
        "graph-db.password",
    ] {
        let value = properties.get(key).unwrap();
        assert!(!value.is_empty(), "{key} should be non-empty");
    }

    // Wire consumers: both graph clients must declare the startup edge
    let mut graph = StartupGraph::new();
    graph.add_resource(&resource.name).unwrap();
    graph
        .require_capability(TestFixtures::BOLT_CAPABILITY, &resource.name)
        .unwrap();
    graph
        .register_consumer(
            ConsumerDeclaration::new(TestFixtures::GRAPH_CLIENT)
                .capability(TestFixtures::BOLT_CAPABILITY)
                .depends_on(&resource.name),
        )
        .unwrap();
    graph
        .register_consumer(
            ConsumerDeclaration::new(TestFixtures::SESSION_FACTORY)
                .capability(TestFixtures::BOLT_CAPABILITY)
                .depends_on(&resource.name),
        )
        .unwrap();
    graph.verify().unwrap();

    let order = graph.initialization_order().unwrap();
    assert_eq!(order[0], TestFixtures::GRAPH_DB);

    // Consumers initialize only now, strictly after the resource is Running
    let store = GraphStore::new();
    let client = GraphClient::connect(&properties, TestFixtures::GRAPH_DB, store).unwrap();
    assert_eq!(client.user, TestFixtures::USER);
    assert_eq!(client.address, format!("127.0.0.1:{bolt_port}"));

    let person_id = client
        .create_person_with_teammate(
            TestFixtures::FOUNDER,
            TestFixtures::TEAMMATE,
            TestFixtures::TEAMMATE_SINCE,
        )
        .await;

    let person = client.find_by_id(person_id).await.unwrap();
    assert_eq!(person.id, person_id);
    assert_eq!(person.name, TestFixtures::FOUNDER);
    assert!(!person.teammates.is_empty());
    for relationship in &person.teammates {
        assert_eq!(relationship.since, TestFixtures::TEAMMATE_SINCE);
        assert_eq!(relationship.name, TestFixtures::TEAMMATE);
    }

    manager.stop_all().await.unwrap();
    assert!(manager.properties().snapshot().is_empty());
    assert_eq!(manager.state(&resource.name), Some(ResourceState::Stopped));
}

#[tokio::test]
async fn test_latency_injection_round_trip() {
    let (_bolt_listener, bolt_port) = bind_listener().await;
    let (_https_listener, https_port) = bind_listener().await;

    let manager = ResourceManager::new(Arc::new(permissive_launcher()));
    let resource = manager
        .start(graph_db_config(bolt_port, https_port))
        .await
        .unwrap()
        .expect("resource is enabled");

    let store = GraphStore::new();
    let network = FakeGraphNetwork::for_store(&store);
    let client = GraphClient::connect(
        &manager.properties(),
        TestFixtures::GRAPH_DB,
        store,
    )
    .unwrap();

    let injector = FaultInjector::new(Arc::new(network));
    let injected = Duration::from_millis(TestFixtures::INJECTED_LATENCY_MS);

    // Under the session every operation takes at least the injected latency
    let elapsed_under_fault = injector
        .with_network_latency(&resource, injected, || async {
            let (elapsed, _) = duration_of(client.find_by_name("any")).await;
            Ok(elapsed)
        })
        .await
        .unwrap();
    assert!(
        elapsed_under_fault >= injected,
        "operation under fault took {elapsed_under_fault:?}, expected >= {injected:?}"
    );

    // After reversion the same operation drops back under the baseline
    let (elapsed_after, _) = duration_of(client.find_by_name("any")).await;
    assert!(
        elapsed_after < Duration::from_millis(TestFixtures::BASELINE_MS),
        "operation after reversion took {elapsed_after:?}"
    );

    let log = injector.injection_log();
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|event| event.success));

    manager.stop_all().await.unwrap();
}

#[tokio::test]
async fn test_every_client_must_declare_the_startup_dependency() {
    let graph_db = TestFixtures::graph_db();

    let mut graph = StartupGraph::new();
    graph.add_resource(&graph_db).unwrap();
    graph
        .require_capability(TestFixtures::BOLT_CAPABILITY, &graph_db)
        .unwrap();

    graph
        .register_consumer(
            ConsumerDeclaration::new(TestFixtures::GRAPH_CLIENT)
                .capability(TestFixtures::BOLT_CAPABILITY)
                .depends_on(&graph_db),
        )
        .unwrap();
    graph
        .register_consumer(
            ConsumerDeclaration::new(TestFixtures::SESSION_FACTORY)
                .capability(TestFixtures::BOLT_CAPABILITY),
        )
        .unwrap();

    // Partial registration is a defect: one compliant client is not enough
    let err = graph.verify().unwrap_err();
    assert!(matches!(err, HarnessError::OrderingViolation { .. }));

    graph
        .register_dependency(TestFixtures::SESSION_FACTORY, &graph_db)
        .unwrap();
    graph.verify().unwrap();

    // With the graph verified, all clients of the resource are accounted for
    assert_eq!(graph.consumers_of(&graph_db).len(), 2);
}

#[tokio::test]
async fn test_client_connection_fails_before_resource_starts() {
    let manager = ResourceManager::new(Arc::new(permissive_launcher()));

    let err = GraphClient::connect(
        &manager.properties(),
        TestFixtures::GRAPH_DB,
        GraphStore::new(),
    )
    .unwrap_err();

    assert!(matches!(err, HarnessError::ConfigurationMissing { .. }));
}

#[tokio::test]
async fn test_disabled_resource_leaves_nothing_discoverable() {
    let manager = ResourceManager::new(Arc::new(permissive_launcher()));
    let config = harness::ResourceConfig::builder(TestFixtures::GRAPH_DB)
        .enabled(false)
        .build()
        .unwrap();

    let started = manager.start(config).await.unwrap();
    assert!(started.is_none());
    assert!(manager.properties().snapshot().is_empty());
    assert_eq!(manager.state(&TestFixtures::graph_db()), None);
}
