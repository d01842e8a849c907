//! Startup Simulator
//!
//! Role-based scenario questionnaire engine:
//! - Static scenario and archetype catalogs per role (bundled or from a data dir)
//! - Linear progression with derived completion
//! - Trait aggregation and archetype ranking
//! - Pluggable session storage (memory or JSON files)

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod service;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use config::SimulatorConfig;
pub use error::{Error, Result};
pub use service::SimulatorService;
pub use types::{ArchetypeMatch, Role, Scenario, SessionId};
