//! Session persistence.
//!
//! The engine never owns session state; it reads and appends through a
//! [`SessionStore`]. Implementations must make each call atomic for its
//! session id. Serializing a whole submit (read, validate, append) is the
//! service's job.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ArchetypeMatch, Response, Role, SessionId, SessionRecord};

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

/// Storage operations the engine needs from its persistence layer.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    async fn create_session(&self, role: Role) -> Result<SessionRecord>;

    /// Fails with `SessionNotFound` for unknown ids.
    async fn get_session(&self, session_id: SessionId) -> Result<SessionRecord>;

    /// Append a response. Responses are never removed or reordered.
    async fn append_response(
        &self,
        session_id: SessionId,
        scenario_id: &str,
        choice_id: &str,
        traits: Vec<String>,
    ) -> Result<Response>;

    async fn list_responses(&self, session_id: SessionId) -> Result<Vec<Response>> {
        Ok(self.get_session(session_id).await?.responses)
    }

    async fn get_profile(&self, session_id: SessionId) -> Result<Option<ArchetypeMatch>> {
        Ok(self.get_session(session_id).await?.profile)
    }

    async fn set_profile(&self, session_id: SessionId, profile: ArchetypeMatch) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────
// Backend Selection
// ─────────────────────────────────────────────────────────────────

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    /// One JSON file per session
    File,
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File => "file",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "file" | "json" => Ok(StorageBackend::File),
            _ => Err(format!("Unknown storage backend '{}'. Valid: memory, file", s)),
        }
    }
}

/// Open a store for the given backend.
pub fn open(backend: StorageBackend, session_dir: impl Into<PathBuf>) -> Arc<dyn SessionStore> {
    match backend {
        StorageBackend::Memory => Arc::new(MemorySessionStore::new()),
        StorageBackend::File => Arc::new(FileSessionStore::new(session_dir)),
    }
}
