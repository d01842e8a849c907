//! Simulator service: the operations exposed to callers.
//!
//! Wires catalogs, the progression engine, the ranker and a session store
//! together. Submissions for one session are serialized with a per-session
//! async lock held across validate, append and profile refresh, so two
//! concurrent submits never observe the same "last response".

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{ArchetypeCatalog, CatalogSource, ScenarioCatalog};
use crate::config::SimulatorConfig;
use crate::engine::{aggregate, ArchetypeRanker, ProgressionEngine, TraitCounts};
use crate::error::{Error, Result};
use crate::store::{self, SessionStore};
use crate::types::{
    Archetype, ArchetypeMatch, CreatedSession, Role, RoleInfo, Scenario, SessionId,
    SessionRecord, SessionState, SubmitOutcome,
};

type SessionLock = Arc<tokio::sync::Mutex<()>>;
type LockMap = Mutex<HashMap<SessionId, SessionLock>>;

/// Shared handle on one session's lock. The map entry is removed when the
/// last lease for that session is dropped.
struct SessionLease<'a> {
    locks: &'a LockMap,
    session_id: SessionId,
    lock: Option<SessionLock>,
}

impl<'a> SessionLease<'a> {
    fn new(locks: &'a LockMap, session_id: SessionId) -> Self {
        let lock = Arc::clone(locks.lock().entry(session_id).or_default());
        Self {
            locks,
            session_id,
            lock: Some(lock),
        }
    }

    async fn acquire(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match &self.lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock();
        self.lock = None;
        let unused = locks
            .get(&self.session_id)
            .map_or(false, |lock| Arc::strong_count(lock) == 1);
        if unused {
            locks.remove(&self.session_id);
        }
    }
}

/// Entry point for session operations.
pub struct SimulatorService {
    scenarios: Arc<ScenarioCatalog>,
    archetypes: Arc<ArchetypeCatalog>,
    progression: ProgressionEngine,
    ranker: ArchetypeRanker,
    store: Arc<dyn SessionStore>,
    enabled_roles: Vec<Role>,
    session_locks: LockMap,
}

impl SimulatorService {
    pub fn new(source: CatalogSource, store: Arc<dyn SessionStore>, enabled_roles: Vec<Role>) -> Self {
        let scenarios = Arc::new(ScenarioCatalog::new(source.clone()));
        let archetypes = Arc::new(ArchetypeCatalog::new(source));

        Self {
            progression: ProgressionEngine::new(Arc::clone(&scenarios)),
            ranker: ArchetypeRanker::new(Arc::clone(&archetypes)),
            scenarios,
            archetypes,
            store,
            enabled_roles,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Build the catalogs and the configured session store.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self> {
        let backend = config.storage_backend()?;
        let store = store::open(backend, config.session_dir());
        let enabled_roles = config.enabled_roles()?;

        info!(
            backend = %backend,
            catalog = ?config.catalog_source(),
            enabled_roles = ?enabled_roles,
            "Simulator service ready"
        );

        Ok(Self::new(config.catalog_source(), store, enabled_roles))
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn is_enabled(&self, role: Role) -> bool {
        self.enabled_roles.contains(&role)
    }

    // ─────────────────────────────────────────────────────────────
    // Catalog queries
    // ─────────────────────────────────────────────────────────────

    pub fn list_roles(&self, include_details: bool) -> Vec<RoleInfo> {
        Role::all()
            .iter()
            .map(|role| RoleInfo::new(*role, include_details))
            .collect()
    }

    pub fn scenarios(&self, role: Role) -> Result<Arc<[Scenario]>> {
        self.scenarios.scenarios(role)
    }

    pub fn archetypes(&self, role: Role) -> Result<Arc<[Archetype]>> {
        self.archetypes.archetypes(role)
    }

    // ─────────────────────────────────────────────────────────────
    // Session operations
    // ─────────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn create_session(&self, role: Role) -> Result<CreatedSession> {
        if !self.is_enabled(role) {
            return Err(Error::UnsupportedRole { role });
        }

        let first_scenario = self.progression.current(role, &[])?;
        let total_scenarios = self.scenarios.total(role)?;
        let record = self.store.create_session(role).await?;

        info!(
            session_id = %record.id,
            total_scenarios,
            store = self.store.name(),
            "Session created"
        );

        Ok(CreatedSession {
            session_id: record.id,
            role,
            first_scenario,
            total_scenarios,
        })
    }

    /// Record one answer.
    ///
    /// Rejected submissions leave the session untouched. When the answer
    /// completes the session the profile is refreshed, but a failure there
    /// is only logged.
    #[instrument(skip(self))]
    pub async fn submit_response(
        &self,
        session_id: SessionId,
        scenario_id: &str,
        choice_id: &str,
    ) -> Result<SubmitOutcome> {
        let lease = self.lease(session_id);
        let _guard = lease.acquire().await;

        let record = self.store.get_session(session_id).await?;
        let role = record.role;

        let traits = self
            .progression
            .submit(role, &record.responses, scenario_id, choice_id)?;
        let next_scenario = self.progression.next_after(role, scenario_id)?;
        let total_scenarios = self.scenarios.total(role)?;

        self.store
            .append_response(session_id, scenario_id, choice_id, traits)
            .await?;

        let scenarios_completed = record.responses.len() + 1;
        let is_complete = scenarios_completed >= total_scenarios;

        info!(
            scenario_id,
            choice_id,
            scenarios_completed,
            total_scenarios,
            is_complete,
            "Response recorded"
        );

        if is_complete {
            if let Err(e) = self.refresh_profile(session_id).await {
                warn!(error = %e.format_for_log(), "Profile refresh after completion failed");
            }
        }

        Ok(SubmitOutcome {
            next_scenario,
            scenarios_completed,
            total_scenarios,
            is_complete,
        })
    }

    pub async fn get_session_state(&self, session_id: SessionId) -> Result<SessionState> {
        let record = self.store.get_session(session_id).await?;
        let current_scenario = self.progression.current(record.role, &record.responses)?;
        let progress = self.progression.progress(record.role, &record.responses)?;

        Ok(SessionState {
            session_id,
            role: record.role,
            current_scenario,
            scenarios_completed: progress.completed,
            total_scenarios: progress.total,
            is_complete: progress.is_complete(),
        })
    }

    /// Best archetype for the session so far. The result is also stored.
    #[instrument(skip(self))]
    pub async fn compute_profile(&self, session_id: SessionId) -> Result<ArchetypeMatch> {
        let lease = self.lease(session_id);
        let _guard = lease.acquire().await;
        self.refresh_profile(session_id).await
    }

    pub async fn get_stored_profile(&self, session_id: SessionId) -> Result<ArchetypeMatch> {
        self.store
            .get_profile(session_id)
            .await?
            .ok_or_else(|| Error::no_profile("profile not generated yet"))
    }

    /// Every archetype of the session's role, best match first.
    pub async fn profile_report(&self, session_id: SessionId) -> Result<Vec<ArchetypeMatch>> {
        let record = self.store.get_session(session_id).await?;
        self.ranker.rank(record.role, &aggregate(&record.responses))
    }

    pub async fn trait_scores(&self, session_id: SessionId) -> Result<TraitCounts> {
        let responses = self.store.list_responses(session_id).await?;
        Ok(aggregate(&responses))
    }

    // ─────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────

    fn lease(&self, session_id: SessionId) -> SessionLease<'_> {
        SessionLease::new(&self.session_locks, session_id)
    }

    /// Caller must hold the session lock.
    async fn refresh_profile(&self, session_id: SessionId) -> Result<ArchetypeMatch> {
        let record = self.store.get_session(session_id).await?;
        let profile = self.top_match(&record)?;

        self.store.set_profile(session_id, profile.clone()).await?;
        info!(
            archetype = %profile.archetype.id,
            score = profile.score,
            coverage = profile.coverage,
            "Profile stored"
        );
        Ok(profile)
    }

    fn top_match(&self, record: &SessionRecord) -> Result<ArchetypeMatch> {
        if record.responses.is_empty() {
            return Err(Error::no_profile("no responses submitted yet"));
        }

        let counts = aggregate(&record.responses);
        debug!(traits = counts.len(), "Aggregated traits");

        self.ranker
            .top(record.role, &counts)?
            .ok_or_else(|| Error::no_profile("no archetype matched the submitted responses"))
    }
}
