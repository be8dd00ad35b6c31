//! Cross-source consensus validation.
//!
//! A single source's claim about a match is unverified scraped text; a match
//! is trusted only once a minimum number of distinct sources report the same
//! identity key. The two-player mode substitutes fuzzy string-pair
//! corroboration for identity-key corroboration when checking that two named
//! players actually share a match history.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{CanonicalMatch, IdentityKey, Source, ValidatedMatch};
use crate::utils::matching::similar;

/// All records reporting one identity key, with the set of distinct sources
/// that corroborate it.
#[derive(Debug, Clone)]
pub struct ConsensusGroup {
    pub representative: CanonicalMatch,
    pub sources: BTreeSet<Source>,
}

/// Group canonical records by identity key.
///
/// The map is ordered by key, so downstream output depends only on record
/// content, never on the arrival order of concurrent fetches. The
/// representative is the first record seen for the key; corroborating
/// sources accumulate as a set, so duplicates from one source count once.
pub fn group_by_identity(records: &[CanonicalMatch]) -> BTreeMap<IdentityKey, ConsensusGroup> {
    let mut groups: BTreeMap<IdentityKey, ConsensusGroup> = BTreeMap::new();

    for record in records {
        let key = record.identity_key();
        groups
            .entry(key)
            .and_modify(|group| {
                group.sources.insert(record.source);
            })
            .or_insert_with(|| ConsensusGroup {
                representative: record.clone(),
                sources: [record.source].into_iter().collect(),
            });
    }

    groups
}

/// Retain only groups corroborated by at least `min_sources` distinct
/// sources, emitting one `ValidatedMatch` per surviving group.
pub fn validate(records: &[CanonicalMatch], min_sources: usize) -> Vec<ValidatedMatch> {
    let groups = group_by_identity(records);
    let total = groups.len();

    let validated: Vec<ValidatedMatch> = groups
        .into_values()
        .filter(|group| group.sources.len() >= min_sources)
        .map(|group| ValidatedMatch {
            date: group.representative.date,
            opponent: group.representative.opponent_raw,
            score: group.representative.score,
            sources: group.sources,
        })
        .collect();

    debug!(
        groups = total,
        corroborated = validated.len(),
        min_sources,
        "consensus filter applied"
    );

    validated
}

/// Verdict of the two-player cross-validation.
///
/// Insufficient corroboration is a normal outcome carried in `validated`
/// and `reason`, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingVerdict {
    pub validated: bool,
    pub common: Vec<String>,
    pub reason: String,
}

/// Match lines from player A's record set that fuzzily appear in player B's.
///
/// Every candidate string from A is compared against every string in B; a
/// pair is common when similarity reaches the threshold.
pub fn common_matches(a: &[String], b: &[String], fuzzy_threshold: u8) -> Vec<String> {
    let mut common = Vec::new();
    for line_a in a {
        if common.contains(line_a) {
            continue;
        }
        if b.iter().any(|line_b| similar(line_a, line_b, fuzzy_threshold)) {
            common.push(line_a.clone());
        }
    }
    common
}

/// Cross-validate that two players share a match history.
pub fn validate_pairing_lines(
    a: &[String],
    b: &[String],
    fuzzy_threshold: u8,
    min_common: usize,
) -> PairingVerdict {
    let common = common_matches(a, b, fuzzy_threshold);
    let validated = common.len() >= min_common;
    let reason = if validated {
        format!("corroborated by {} common matches", common.len())
    } else {
        format!(
            "insufficient corroboration: {} common matches, {} required",
            common.len(),
            min_common
        )
    };

    PairingVerdict {
        validated,
        common,
        reason,
    }
}
