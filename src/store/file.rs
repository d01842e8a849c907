//! File-backed session store: one pretty-printed JSON file per session.
//!
//! Writes go to a temp file first and are renamed into place, so a reader
//! never sees a half-written record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{ArchetypeMatch, Response, Role, SessionId, SessionRecord};

use super::SessionStore;

/// Sessions persisted under a directory as `<session-id>.json`.
pub struct FileSessionStore {
    session_dir: PathBuf,

    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(session_dir: impl Into<PathBuf>) -> Self {
        Self {
            session_dir: session_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    fn session_path(&self, session_id: SessionId) -> PathBuf {
        self.session_dir.join(format!("{}.json", session_id))
    }

    async fn ensure_dir(&self) -> Result<()> {
        if fs::metadata(&self.session_dir).await.is_err() {
            fs::create_dir_all(&self.session_dir)
                .await
                .map_err(|source| Error::IoWrite {
                    path: self.session_dir.clone(),
                    source,
                })?;
            info!(path = %self.session_dir.display(), "Created session directory");
        }
        Ok(())
    }

    async fn read(&self, session_id: SessionId) -> Result<SessionRecord> {
        let path = self.session_path(session_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::session_not_found(session_id))
            }
            Err(source) => return Err(Error::IoRead { path, source }),
        };
        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self, record: &SessionRecord) -> Result<()> {
        self.ensure_dir().await?;

        let path = self.session_path(record.id);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(record)?;

        fs::write(&tmp, content)
            .await
            .map_err(|source| Error::IoWrite {
                path: tmp.clone(),
                source,
            })?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|source| Error::IoWrite {
                path: path.clone(),
                source,
            })?;

        debug!(session_id = %record.id, path = %path.display(), "Session written");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn create_session(&self, role: Role) -> Result<SessionRecord> {
        let record = SessionRecord::new(role);
        let _guard = self.write_lock.lock().await;
        self.write(&record).await?;
        Ok(record)
    }

    async fn get_session(&self, session_id: SessionId) -> Result<SessionRecord> {
        self.read(session_id).await
    }

    async fn append_response(
        &self,
        session_id: SessionId,
        scenario_id: &str,
        choice_id: &str,
        traits: Vec<String>,
    ) -> Result<Response> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read(session_id).await?;

        let response = Response::new(scenario_id, choice_id, traits);
        record.responses.push(response.clone());
        record.updated_at = Utc::now();

        self.write(&record).await?;
        Ok(response)
    }

    async fn set_profile(&self, session_id: SessionId, profile: ArchetypeMatch) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read(session_id).await?;

        record.profile = Some(profile);
        record.updated_at = Utc::now();

        self.write(&record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Archetype;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn sample_match() -> ArchetypeMatch {
        ArchetypeMatch {
            archetype: Archetype {
                id: "engineer_craftsman".into(),
                role: Role::Engineer,
                name: "The Craftsman".into(),
                key_traits: vec!["long_term".into()],
                message: "m".into(),
            },
            score: 1,
            matched_traits: vec!["long_term".into()],
            missing_traits: vec![],
            coverage: 1.0,
        }
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("sessions");

        let id = {
            let store = FileSessionStore::new(&dir);
            let id = store.create_session(Role::Engineer).await.unwrap().id;
            store
                .append_response(id, "engineer_scenario_1", "engineer_1_choice_1", vec!["long_term".into()])
                .await
                .unwrap();
            store.set_profile(id, sample_match()).await.unwrap();
            id
        };

        let reopened = FileSessionStore::new(&dir);
        let record = reopened.get_session(id).await.unwrap();
        assert_eq!(record.role, Role::Engineer);
        assert_eq!(record.responses.len(), 1);
        assert_eq!(record.responses[0].traits, vec!["long_term"]);
        assert_eq!(reopened.get_profile(id).await.unwrap(), Some(sample_match()));
        assert!(!dir.join(format!("{}.json.tmp", id)).exists());
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::new(tmp.path());

        let err = store.get_session(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::SessionNotFound { .. }));

        let err = store.set_profile(Uuid::new_v4(), sample_match()).await.unwrap_err();
        assert!(matches!(err, Error::SessionNotFound { .. }));
    }

    #[test]
    fn test_corrupt_record_is_internal_error() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::new(tmp.path());
        let id = Uuid::new_v4();
        std::fs::write(tmp.path().join(format!("{}.json", id)), "{ nope").unwrap();

        let err = tokio_test::block_on(store.get_session(id)).unwrap_err();
        assert!(!err.is_client_error());
    }
}
