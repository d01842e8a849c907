//! Scenario catalog: ordered, cached scenario sequences per role.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::{Choice, Role, Scenario};

use super::cache::RoleCache;
use super::source::{CatalogKind, CatalogSource};

// ─────────────────────────────────────────────────────────────────
// Definitions (on-disk shape)
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ScenarioDefinition {
    id: String,
    role: Role,
    title: String,
    description: String,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    order: i64,
    choices: Vec<ChoiceDefinition>,
}

#[derive(Debug, Deserialize)]
struct ChoiceDefinition {
    id: String,
    text: String,
    #[serde(default)]
    traits: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────
// Scenario Catalog
// ─────────────────────────────────────────────────────────────────

/// Per-role ordered scenario sequences. Read-only once loaded.
///
/// Progression through a role is strictly linear in catalog order.
pub struct ScenarioCatalog {
    source: CatalogSource,
    cache: RoleCache<Scenario>,
}

impl ScenarioCatalog {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            cache: RoleCache::new(),
        }
    }

    /// Catalog backed by the bundled definitions.
    pub fn bundled() -> Self {
        Self::new(CatalogSource::Bundled)
    }

    /// All scenarios for `role`, in order. Empty when the role has no data.
    pub fn scenarios(&self, role: Role) -> Result<Arc<[Scenario]>> {
        self.cache.get_or_load(role, || self.load(role))
    }

    /// Number of scenarios for `role`.
    pub fn total(&self, role: Role) -> Result<usize> {
        Ok(self.scenarios(role)?.len())
    }

    /// The first scenario, if the role has any.
    pub fn first(&self, role: Role) -> Result<Option<Scenario>> {
        Ok(self.scenarios(role)?.first().cloned())
    }

    /// Look up a scenario by id.
    pub fn by_id(&self, role: Role, scenario_id: &str) -> Result<Scenario> {
        self.scenarios(role)?
            .iter()
            .find(|s| s.id == scenario_id)
            .cloned()
            .ok_or_else(|| Error::scenario_not_found(role, scenario_id))
    }

    /// The scenario following `scenario_id`, or `None` if it is the last one.
    pub fn after(&self, role: Role, scenario_id: &str) -> Result<Option<Scenario>> {
        let scenarios = self.scenarios(role)?;
        let index = scenarios
            .iter()
            .position(|s| s.id == scenario_id)
            .ok_or_else(|| Error::scenario_not_found(role, scenario_id))?;
        Ok(scenarios.get(index + 1).cloned())
    }

    /// Trait tags of one choice.
    pub fn choice_traits(&self, role: Role, scenario_id: &str, choice_id: &str) -> Result<Vec<String>> {
        let scenario = self.by_id(role, scenario_id)?;
        scenario
            .choice(choice_id)
            .map(|c| c.traits.clone())
            .ok_or_else(|| Error::invalid_choice(scenario_id, choice_id))
    }

    fn load(&self, role: Role) -> Result<Vec<Scenario>> {
        let mut definitions: Vec<ScenarioDefinition> =
            self.source.load(CatalogKind::Scenarios, role)?;

        // Stable: equal order values keep definition order.
        definitions.sort_by_key(|d| d.order);

        let mut seen = HashSet::new();
        let mut scenarios = Vec::with_capacity(definitions.len());

        for def in definitions {
            if def.role != role {
                warn!(scenario = %def.id, declared = %def.role, expected = %role, "Skipping scenario with mismatched role");
                continue;
            }
            if !seen.insert(def.id.clone()) {
                warn!(scenario = %def.id, role = %role, "Skipping duplicate scenario id");
                continue;
            }

            let mut choice_ids = HashSet::new();
            let choices: Vec<Choice> = def
                .choices
                .into_iter()
                .filter(|c| {
                    let fresh = choice_ids.insert(c.id.clone());
                    if !fresh {
                        warn!(scenario = %def.id, choice = %c.id, "Skipping duplicate choice id");
                    }
                    fresh
                })
                .map(|c| Choice {
                    id: c.id,
                    scenario_id: def.id.clone(),
                    choice_text: c.text,
                    traits: c.traits,
                })
                .collect();

            if choices.is_empty() {
                warn!(scenario = %def.id, role = %role, "Skipping scenario without choices");
                continue;
            }

            scenarios.push(Scenario {
                id: def.id,
                role: def.role,
                title: def.title,
                description: def.description,
                prompt: def.prompt,
                choices,
            });
        }

        info!(role = %role, count = scenarios.len(), "Scenario catalog loaded");
        Ok(scenarios)
    }
}
