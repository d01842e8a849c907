//! Questionnaire engine: progression, trait aggregation and archetype ranking.

pub mod aggregate;
pub mod progression;
pub mod ranking;

pub use aggregate::{aggregate, TraitCounts};
pub use progression::{Progress, ProgressionEngine};
pub use ranking::{compare_matches, score_archetype, ArchetypeRanker};
