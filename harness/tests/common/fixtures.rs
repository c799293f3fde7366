//! Test fixtures and data for harness tests

use shared::ResourceName;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Resource and consumer names
    pub const GRAPH_DB: &'static str = "graph-db";
    pub const GRAPH_CLIENT: &'static str = "graph-client";
    pub const SESSION_FACTORY: &'static str = "session-factory";
    pub const BOLT_CAPABILITY: &'static str = "bolt-client";

    /// Standard credentials
    pub const USER: &'static str = "neo4j";
    pub const PASSWORD: &'static str = "letmein";

    /// Reference graph scenario values
    pub const FOUNDER: &'static str = "Freddie";
    pub const TEAMMATE: &'static str = "Frank";
    pub const TEAMMATE_SINCE: i64 = 1995;

    /// Latency scenario bounds (milliseconds)
    pub const INJECTED_LATENCY_MS: u64 = 1000;
    pub const BASELINE_MS: u64 = 100;

    pub fn graph_db() -> ResourceName {
        ResourceName::new(Self::GRAPH_DB).unwrap()
    }
}
