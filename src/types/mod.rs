//! Shared data model: roles, scenarios, archetypes and sessions.

mod archetype;
mod role;
mod scenario;
mod session;

pub use archetype::{Archetype, ArchetypeMatch};
pub use role::{Role, RoleInfo};
pub use scenario::{Choice, Scenario};
pub use session::{
    CreatedSession, Response, SessionId, SessionRecord, SessionState, SubmitOutcome,
};
