//! Scenario progression for a session.
//!
//! Progress is always derived from the response history: nothing about
//! completion is stored on its own.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::ScenarioCatalog;
use crate::error::{Error, Result};
use crate::types::{Response, Role, Scenario};

/// Derived progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// A role with zero scenarios is complete from the start.
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Computes current scenario, validates submissions and reports progress.
pub struct ProgressionEngine {
    scenarios: Arc<ScenarioCatalog>,
}

impl ProgressionEngine {
    pub fn new(scenarios: Arc<ScenarioCatalog>) -> Self {
        Self { scenarios }
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.scenarios
    }

    /// The scenario to answer next, or `None` once the sequence is exhausted.
    pub fn current(&self, role: Role, responses: &[Response]) -> Result<Option<Scenario>> {
        match responses.last() {
            None => self.scenarios.first(role),
            Some(last) => self.scenarios.after(role, &last.scenario_id),
        }
    }

    /// Validate a submission and return the trait snapshot to record.
    ///
    /// Rejects unknown scenarios and choices, scenarios that already have a
    /// response, and any scenario other than the current one. Never mutates
    /// anything.
    pub fn submit(
        &self,
        role: Role,
        responses: &[Response],
        scenario_id: &str,
        choice_id: &str,
    ) -> Result<Vec<String>> {
        let traits = self.scenarios.choice_traits(role, scenario_id, choice_id)?;

        if responses.iter().any(|r| r.scenario_id == scenario_id) {
            return Err(Error::AlreadyAnswered {
                scenario_id: scenario_id.to_string(),
            });
        }

        let expected = self.current(role, responses)?.map(|s| s.id);
        if expected.as_deref() != Some(scenario_id) {
            return Err(Error::OutOfOrder {
                scenario_id: scenario_id.to_string(),
                expected,
            });
        }

        Ok(traits)
    }

    /// The scenario following one that was just answered.
    pub fn next_after(&self, role: Role, scenario_id: &str) -> Result<Option<Scenario>> {
        self.scenarios.after(role, scenario_id)
    }

    pub fn progress(&self, role: Role, responses: &[Response]) -> Result<Progress> {
        Ok(Progress {
            completed: responses.len(),
            total: self.scenarios.total(role)?,
        })
    }
}
