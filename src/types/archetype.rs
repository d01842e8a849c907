//! Archetypes and computed archetype matches.

use serde::{Deserialize, Serialize};

use super::Role;

/// A named profile defined by a set of key traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    /// Unique within the role (e.g. "engineer_craftsman").
    pub id: String,
    pub role: Role,
    pub name: String,
    pub key_traits: Vec<String>,
    pub message: String,
}

/// How well one archetype fits a session's aggregated traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeMatch {
    pub archetype: Archetype,

    /// Sum of trait counts over the matched key traits.
    pub score: u32,

    /// Key traits with a non-zero count, in key-trait order.
    pub matched_traits: Vec<String>,

    /// Key traits with no count, in key-trait order.
    pub missing_traits: Vec<String>,

    /// `matched / key_traits`, 0.0 when the archetype has no key traits.
    pub coverage: f64,
}
