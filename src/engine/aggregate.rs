//! Trait aggregation over a session's responses.

use std::collections::BTreeMap;

use crate::types::Response;

/// Occurrence count per trait name.
pub type TraitCounts = BTreeMap<String, u32>;

/// Sum trait occurrences over every response's trait snapshot.
///
/// A trait listed twice on one response counts twice, and repeated
/// selection across responses adds up. Empty input yields an empty map.
pub fn aggregate(responses: &[Response]) -> TraitCounts {
    let mut counts = TraitCounts::new();
    for trait_name in responses.iter().flat_map(|r| r.traits.iter()) {
        *counts.entry(trait_name.clone()).or_insert(0) += 1;
    }
    counts
}
