//! Scenarios and their choices.

use serde::{Deserialize, Serialize};

use super::Role;

/// One selectable option within a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Unique within the owning scenario.
    pub id: String,

    /// Id of the owning scenario.
    pub scenario_id: String,

    pub choice_text: String,

    /// Trait signals accumulated when this choice is picked.
    pub traits: Vec<String>,
}

/// One step of the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique within the role's catalog.
    pub id: String,
    pub role: Role,
    pub title: String,
    pub description: String,

    /// The question put to the participant, when the definition has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Non-empty, in definition order.
    pub choices: Vec<Choice>,
}

impl Scenario {
    /// Look up a choice by id.
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}
