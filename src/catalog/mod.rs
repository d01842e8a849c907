//! Static catalogs: scenarios and archetypes per role.
//!
//! Both catalogs load lazily per role from a [`CatalogSource`] and are
//! immutable afterwards, so one instance can be shared across requests.

mod cache;
pub mod archetypes;
pub mod scenarios;
pub mod source;

pub use archetypes::ArchetypeCatalog;
pub use cache::RoleCache;
pub use scenarios::ScenarioCatalog;
pub use source::{CatalogKind, CatalogSource};
