//! Archetype ranking against aggregated trait counts.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::ArchetypeCatalog;
use crate::error::Result;
use crate::types::{Archetype, ArchetypeMatch, Role};

use super::aggregate::TraitCounts;

/// Score one archetype against trait counts.
pub fn score_archetype(archetype: &Archetype, counts: &TraitCounts) -> ArchetypeMatch {
    let (matched, missing): (Vec<String>, Vec<String>) = archetype
        .key_traits
        .iter()
        .cloned()
        .partition(|t| counts.get(t).copied().unwrap_or(0) > 0);

    let score = matched.iter().map(|t| counts[t]).sum();
    let coverage = if archetype.key_traits.is_empty() {
        0.0
    } else {
        matched.len() as f64 / archetype.key_traits.len() as f64
    };

    ArchetypeMatch {
        archetype: archetype.clone(),
        score,
        matched_traits: matched,
        missing_traits: missing,
        coverage,
    }
}

/// Total order over matches: score desc, coverage desc, then name asc.
pub fn compare_matches(lhs: &ArchetypeMatch, rhs: &ArchetypeMatch) -> Ordering {
    rhs.score
        .cmp(&lhs.score)
        .then_with(|| rhs.coverage.total_cmp(&lhs.coverage))
        .then_with(|| lhs.archetype.name.cmp(&rhs.archetype.name))
        .then_with(|| lhs.archetype.id.cmp(&rhs.archetype.id))
}

/// Ranks a role's archetypes against aggregated traits.
pub struct ArchetypeRanker {
    catalog: Arc<ArchetypeCatalog>,
}

impl ArchetypeRanker {
    pub fn new(catalog: Arc<ArchetypeCatalog>) -> Self {
        Self { catalog }
    }

    /// Every archetype of `role`, best match first.
    ///
    /// Empty counts mean nothing matched, so the result is empty rather
    /// than a list of zero scores.
    pub fn rank(&self, role: Role, counts: &TraitCounts) -> Result<Vec<ArchetypeMatch>> {
        if counts.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches: Vec<ArchetypeMatch> = self
            .catalog
            .archetypes(role)?
            .iter()
            .map(|a| score_archetype(a, counts))
            .collect();
        matches.sort_by(compare_matches);

        debug!(
            role = %role,
            candidates = matches.len(),
            top = matches.first().map(|m| m.archetype.id.as_str()).unwrap_or("-"),
            "Ranked archetypes"
        );
        Ok(matches)
    }

    /// The best match, if any.
    pub fn top(&self, role: Role, counts: &TraitCounts) -> Result<Option<ArchetypeMatch>> {
        Ok(self.rank(role, counts)?.into_iter().next())
    }
}
