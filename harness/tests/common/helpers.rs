//! Test helpers: launcher doubles and an in-memory graph collaborator
//!
//! The graph store stands in for the external database the harness manages;
//! its "network" honors whatever latency the fake shaper currently injects,
//! so fault-injection scenarios observe real wall-clock effects without a
//! real packet-shaping facility.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::{sleep, Instant};

use harness::error::{HarnessError, HarnessResult};
use harness::registry::PropertyStore;
use harness::traits::{LaunchedResource, MockResourceLauncher, NetworkShaper};
use harness::ResourceConfig;
use shared::Endpoint;

use super::fixtures::TestFixtures;

/// Bind a loopback listener so readiness probes succeed
pub async fn bind_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// Launcher double that never spawns a process
pub fn permissive_launcher() -> MockResourceLauncher {
    let mut launcher = MockResourceLauncher::new();
    launcher
        .expect_launch()
        .returning(|_, endpoint| Ok(LaunchedResource::detached(endpoint.clone())));
    launcher.expect_terminate().returning(|_, _| Ok(()));
    launcher
}

/// Standard graph-db configuration with bolt probed, https published
pub fn graph_db_config(bolt_port: u16, https_port: u16) -> ResourceConfig {
    ResourceConfig::builder(TestFixtures::GRAPH_DB)
        .program("neo4j-server")
        .port("bolt", Some(bolt_port))
        .port("https", Some(https_port))
        .credentials(TestFixtures::USER, TestFixtures::PASSWORD)
        .startup_timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

/// Wall-clock duration of an async operation
pub async fn duration_of<F, T>(op: F) -> (Duration, T)
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let value = op.await;
    (start.elapsed(), value)
}

#[derive(Clone, Debug)]
struct StoredNode {
    name: String,
}

#[derive(Clone, Debug)]
struct StoredRelationship {
    from: i64,
    to: i64,
    since: i64,
}

#[derive(Debug, Default)]
struct GraphData {
    next_id: i64,
    nodes: HashMap<i64, StoredNode>,
    relationships: Vec<StoredRelationship>,
}

/// In-memory stand-in for the external graph database
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    data: Arc<Mutex<GraphData>>,
    latency: Arc<Mutex<Duration>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_latency(&self) -> Duration {
        *self.latency.lock().unwrap()
    }
}

/// Shaper double wired to the store's simulated network path
pub struct FakeGraphNetwork {
    latency: Arc<Mutex<Duration>>,
}

impl FakeGraphNetwork {
    pub fn for_store(store: &GraphStore) -> Self {
        Self {
            latency: Arc::clone(&store.latency),
        }
    }
}

#[async_trait::async_trait]
impl NetworkShaper for FakeGraphNetwork {
    async fn apply_latency(&self, _endpoint: &Endpoint, latency: Duration) -> HarnessResult<()> {
        *self.latency.lock().unwrap() = latency;
        Ok(())
    }

    async fn clear_latency(&self, _endpoint: &Endpoint) -> HarnessResult<()> {
        *self.latency.lock().unwrap() = Duration::ZERO;
        Ok(())
    }
}

/// A person record read back from the store
#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub teammates: Vec<Teammate>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Teammate {
    pub name: String,
    pub since: i64,
}

/// Consumer-side client; resolves its connection from published properties
#[derive(Debug)]
pub struct GraphClient {
    store: GraphStore,
    pub address: String,
    pub user: String,
}

impl GraphClient {
    /// Connect using the discoverable configuration for `resource_name`
    ///
    /// Fails with `ConfigurationMissing` when called before the resource
    /// reached Running.
    pub fn connect(
        properties: &PropertyStore,
        resource_name: &str,
        store: GraphStore,
    ) -> HarnessResult<Self> {
        let host = properties.get(&format!("{resource_name}.host"))?;
        let bolt_port = properties.get(&format!("{resource_name}.boltPort"))?;
        let user = properties.get(&format!("{resource_name}.user"))?;
        let password = properties.get(&format!("{resource_name}.password"))?;

        if password.is_empty() {
            return Err(HarnessError::Configuration {
                field: format!("{resource_name}.password"),
            });
        }

        Ok(Self {
            store,
            address: format!("{host}:{bolt_port}"),
            user,
        })
    }

    /// Create a person with one teammate relationship; returns the
    /// generated id of the created person
    pub async fn create_person_with_teammate(
        &self,
        name: &str,
        teammate: &str,
        since: i64,
    ) -> i64 {
        sleep(self.store.current_latency()).await;

        let mut data = self.store.data.lock().unwrap();
        let person_id = data.next_id;
        let teammate_id = data.next_id + 1;
        data.next_id += 2;

        data.nodes.insert(
            person_id,
            StoredNode {
                name: name.to_string(),
            },
        );
        data.nodes.insert(
            teammate_id,
            StoredNode {
                name: teammate.to_string(),
            },
        );
        data.relationships.push(StoredRelationship {
            from: person_id,
            to: teammate_id,
            since,
        });

        person_id
    }

    /// Read a person back by generated id, including teammate relationships
    pub async fn find_by_id(&self, id: i64) -> Option<Person> {
        sleep(self.store.current_latency()).await;

        let data = self.store.data.lock().unwrap();
        let node = data.nodes.get(&id)?;

        let teammates = data
            .relationships
            .iter()
            .filter(|rel| rel.from == id)
            .filter_map(|rel| {
                data.nodes.get(&rel.to).map(|teammate| Teammate {
                    name: teammate.name.clone(),
                    since: rel.since,
                })
            })
            .collect();

        Some(Person {
            id,
            name: node.name.clone(),
            teammates,
        })
    }

    /// Name lookup; used as the timed operation in latency scenarios
    pub async fn find_by_name(&self, name: &str) -> Option<Person> {
        sleep(self.store.current_latency()).await;

        let data = self.store.data.lock().unwrap();
        let (&id, node) = data.nodes.iter().find(|(_, node)| node.name == name)?;
        let teammates = data
            .relationships
            .iter()
            .filter(|rel| rel.from == id)
            .filter_map(|rel| {
                data.nodes.get(&rel.to).map(|teammate| Teammate {
                    name: teammate.name.clone(),
                    since: rel.since,
                })
            })
            .collect();

        Some(Person {
            id,
            name: node.name.clone(),
            teammates,
        })
    }
}
