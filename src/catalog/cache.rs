//! Read-through per-role cache.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::types::Role;

/// Loads each role's entries at most once and serves them read-only afterwards.
///
/// Population happens under the write lock with a re-check, so concurrent
/// first accesses for one role run the loader exactly once. Failed loads are
/// not cached.
pub struct RoleCache<T> {
    entries: RwLock<HashMap<Role, Arc<[T]>>>,
}

impl<T> RoleCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the cached entries for `role`, running `load` on first access.
    pub fn get_or_load<F>(&self, role: Role, load: F) -> Result<Arc<[T]>>
    where
        F: FnOnce() -> Result<Vec<T>>,
    {
        if let Some(entries) = self.entries.read().get(&role) {
            return Ok(Arc::clone(entries));
        }

        let mut guard = self.entries.write();
        if let Some(entries) = guard.get(&role) {
            return Ok(Arc::clone(entries));
        }

        let loaded: Arc<[T]> = load()?.into();
        guard.insert(role, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Whether `role` has been populated.
    pub fn is_loaded(&self, role: Role) -> bool {
        self.entries.read().contains_key(&role)
    }
}

impl<T> Default for RoleCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
