//! Resource Runtime
//!
//! Process launching, readiness probing, lifecycle management and fault
//! injection for embedded resources.

pub mod fault;
pub mod manager;
pub mod process;
pub mod readiness;

pub use fault::{FaultInjector, InjectionEvent, TcNetworkShaper};
pub use manager::ResourceManager;
pub use process::ProcessLauncher;
