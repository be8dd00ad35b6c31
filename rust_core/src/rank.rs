//! Deduplication and recency ranking of validated matches.

use std::collections::BTreeMap;

use crate::types::{IdentityKey, ValidatedMatch};

/// Collapse duplicate identity keys, order by recency, and cap the result.
///
/// Grouping upstream already prevents duplicates within one call; this
/// collapse covers call sites that merge independently validated sets, and
/// unions their source sets when it fires. Sorting is stable (ties keep
/// insertion order) and descending by date; the list is then truncated to
/// `max_results`. Idempotent: ranking its own output changes nothing.
pub fn rank(matches: Vec<ValidatedMatch>, max_results: usize) -> Vec<ValidatedMatch> {
    let mut seen: BTreeMap<IdentityKey, usize> = BTreeMap::new();
    let mut deduped: Vec<ValidatedMatch> = Vec::with_capacity(matches.len());

    for m in matches {
        let key = m.identity_key();
        match seen.get(&key) {
            Some(&index) => {
                let kept = &mut deduped[index];
                kept.sources.extend(m.sources);
            }
            None => {
                seen.insert(key, deduped.len());
                deduped.push(m);
            }
        }
    }

    deduped.sort_by(|a, b| b.date.cmp(&a.date));
    deduped.truncate(max_results);
    deduped
}
