//! In-memory session store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{ArchetypeMatch, Response, Role, SessionId, SessionRecord};

use super::SessionStore;

/// Sessions held in a process-local map.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create_session(&self, role: Role) -> Result<SessionRecord> {
        let record = SessionRecord::new(role);
        self.sessions.write().insert(record.id, record.clone());
        debug!(session_id = %record.id, role = %role, "Session stored");
        Ok(record)
    }

    async fn get_session(&self, session_id: SessionId) -> Result<SessionRecord> {
        self.sessions
            .read()
            .get(&session_id)
            .cloned()
            .ok_or_else(|| Error::session_not_found(session_id))
    }

    async fn append_response(
        &self,
        session_id: SessionId,
        scenario_id: &str,
        choice_id: &str,
        traits: Vec<String>,
    ) -> Result<Response> {
        let mut sessions = self.sessions.write();
        let record = sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::session_not_found(session_id))?;

        let response = Response::new(scenario_id, choice_id, traits);
        record.responses.push(response.clone());
        record.updated_at = Utc::now();
        Ok(response)
    }

    async fn set_profile(&self, session_id: SessionId, profile: ArchetypeMatch) -> Result<()> {
        let mut sessions = self.sessions.write();
        let record = sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::session_not_found(session_id))?;

        record.profile = Some(profile);
        record.updated_at = Utc::now();
        Ok(())
    }
}
