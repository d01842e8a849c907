//! Archetype catalog: cached archetype definitions per role.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::{Archetype, Role};

use super::cache::RoleCache;
use super::source::{CatalogKind, CatalogSource};

/// Per-role archetype lists in definition order. Read-only once loaded.
pub struct ArchetypeCatalog {
    source: CatalogSource,
    cache: RoleCache<Archetype>,
}

impl ArchetypeCatalog {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            cache: RoleCache::new(),
        }
    }

    pub fn bundled() -> Self {
        Self::new(CatalogSource::Bundled)
    }

    pub fn archetypes(&self, role: Role) -> Result<Arc<[Archetype]>> {
        self.cache.get_or_load(role, || self.load(role))
    }

    /// Look up by id (e.g. "engineer_craftsman").
    pub fn by_id(&self, role: Role, archetype_id: &str) -> Result<Archetype> {
        self.archetypes(role)?
            .iter()
            .find(|a| a.id == archetype_id)
            .cloned()
            .ok_or_else(|| Error::archetype_not_found(role, archetype_id))
    }

    /// Look up by display name, case-insensitive and ignoring surrounding whitespace.
    pub fn by_name(&self, role: Role, name: &str) -> Result<Archetype> {
        let wanted = name.trim().to_lowercase();
        self.archetypes(role)?
            .iter()
            .find(|a| a.name.trim().to_lowercase() == wanted)
            .cloned()
            .ok_or_else(|| Error::archetype_not_found(role, name))
    }

    fn load(&self, role: Role) -> Result<Vec<Archetype>> {
        let definitions: Vec<Archetype> = self.source.load(CatalogKind::Archetypes, role)?;

        let mut seen = HashSet::new();
        let archetypes: Vec<Archetype> = definitions
            .into_iter()
            .filter(|a| {
                if a.role != role {
                    warn!(archetype = %a.id, declared = %a.role, expected = %role, "Skipping archetype with mismatched role");
                    return false;
                }
                if !seen.insert(a.id.clone()) {
                    warn!(archetype = %a.id, role = %role, "Skipping duplicate archetype id");
                    return false;
                }
                true
            })
            .collect();

        info!(role = %role, count = archetypes.len(), "Archetype catalog loaded");
        Ok(archetypes)
    }
}
