//! Shared test infrastructure for harness integration tests

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{
    bind_listener, duration_of, graph_db_config, permissive_launcher, FakeGraphNetwork,
    GraphClient, GraphStore,
};
