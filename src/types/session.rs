//! Session records and the responses they own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ArchetypeMatch, Role, Scenario};

/// Opaque session identifier.
pub type SessionId = Uuid;

/// A recorded answer to one scenario.
///
/// Immutable once created. `traits` is a snapshot of the choice's tags at
/// submission time, so later catalog edits never change past scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub scenario_id: String,
    pub choice_id: String,
    pub traits: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Response {
    pub fn new(
        scenario_id: impl Into<String>,
        choice_id: impl Into<String>,
        traits: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            scenario_id: scenario_id.into(),
            choice_id: choice_id.into(),
            traits,
            submitted_at: Utc::now(),
        }
    }
}

/// Persisted state of one participant's run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,

    /// Fixed at creation.
    pub role: Role,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Ordered by submission time. Only ever appended to.
    #[serde(default)]
    pub responses: Vec<Response>,

    /// Stored profile, once computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ArchetypeMatch>,
}

impl SessionRecord {
    pub fn new(role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            role,
            created_at: now,
            updated_at: now,
            responses: Vec::new(),
            profile: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Operation Results
// ─────────────────────────────────────────────────────────────────

/// Returned when a session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedSession {
    pub session_id: SessionId,
    pub role: Role,
    pub first_scenario: Option<Scenario>,
    pub total_scenarios: usize,
}

/// Returned after an accepted submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub next_scenario: Option<Scenario>,
    pub scenarios_completed: usize,
    pub total_scenarios: usize,
    pub is_complete: bool,
}

/// Snapshot of a session's progression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: SessionId,
    pub role: Role,
    pub current_scenario: Option<Scenario>,
    pub scenarios_completed: usize,
    pub total_scenarios: usize,
    pub is_complete: bool,
}
