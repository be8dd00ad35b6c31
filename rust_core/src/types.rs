//! Core types shared across the reconciliation pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::utils::names::opponent_key;

/// Known external match-history providers.
///
/// A closed enumeration: adding a provider means adding a variant here and
/// registering a collaborator for it, never matching on URL substrings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Rttf,
    Scores24,
    Aiscore,
    Sofascore,
}

impl Source {
    /// All known sources, in stable order.
    pub const ALL: [Source; 4] = [
        Source::Rttf,
        Source::Scores24,
        Source::Aiscore,
        Source::Sofascore,
    ];

    /// Stable lowercase identifier used in audit lines and serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Rttf => "rttf",
            Source::Scores24 => "scores24",
            Source::Aiscore => "aiscore",
            Source::Sofascore => "sofascore",
        }
    }

    /// Parse a stable identifier back into a source.
    pub fn parse(s: &str) -> Option<Source> {
        match s.trim().to_lowercase().as_str() {
            "rttf" => Some(Source::Rttf),
            "scores24" => Some(Source::Scores24),
            "aiscore" => Some(Source::Aiscore),
            "sofascore" => Some(Source::Sofascore),
            _ => None,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw row of already-extracted text cells from a source page.
///
/// Cells carry no semantic typing yet; classification happens during
/// canonicalization. Rows live only for the duration of one reconciliation
/// call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    pub cells: Vec<String>,
    pub source: Source,
}

impl RawRow {
    pub fn new(source: Source, cells: Vec<String>) -> Self {
        Self { cells, source }
    }
}

/// Grouping key deciding whether two records describe the same event.
///
/// Exact-equality tuple; the tolerance for spelling variation lives entirely
/// in how `opponent_key` is derived, not in how keys are compared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityKey {
    pub date: NaiveDate,
    pub opponent_key: String,
    pub score: String,
}

/// A fully canonicalized match record from one source.
///
/// Rows whose date cannot be parsed are never materialized as this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalMatch {
    pub date: NaiveDate,
    pub opponent_raw: String,
    pub opponent_key: String,
    pub score: String,
    pub source: Source,
}

impl CanonicalMatch {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            date: self.date,
            opponent_key: self.opponent_key.clone(),
            score: self.score.clone(),
        }
    }

    /// Render as a comparable one-line form, `DD.MM.YYYY|Opponent|S:S`.
    ///
    /// Used by the two-player intersection mode, which compares whole lines
    /// fuzzily instead of grouping by identity key.
    pub fn match_line(&self) -> String {
        format!(
            "{}|{}|{}",
            self.date.format("%d.%m.%Y"),
            self.opponent_raw,
            self.score
        )
    }
}

/// A corroborated match emitted to the serving layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedMatch {
    pub date: NaiveDate,
    pub opponent: String,
    pub score: String,
    pub sources: BTreeSet<Source>,
}

impl ValidatedMatch {
    /// Recompute the identity key from display fields.
    ///
    /// `opponent` normalizes back to the same key it was validated under, so
    /// merged result sets from independent call sites collapse correctly.
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            date: self.date,
            opponent_key: opponent_key(&self.opponent),
            score: self.score.clone(),
        }
    }
}

/// Tunable parameters of one reconciliation call.
///
/// Pure values; the core never reads the environment or any file for these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Similarity score (0-100) at or above which two strings are "the same".
    pub fuzzy_threshold: u8,
    /// Distinct sources required before a match is trusted.
    pub min_sources: usize,
    /// Common matches required before a two-player pairing is validated.
    pub min_common_matches: usize,
    /// Result cap after ranking.
    pub max_results: usize,
    /// Concurrent collaborator fetches.
    pub max_workers: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 82,
            min_sources: 2,
            min_common_matches: 2,
            max_results: 20,
            max_workers: 5,
        }
    }
}

impl ReconcileConfig {
    pub fn with_fuzzy_threshold(mut self, threshold: u8) -> Self {
        self.fuzzy_threshold = threshold.min(100);
        self
    }

    pub fn with_min_sources(mut self, min_sources: usize) -> Self {
        self.min_sources = min_sources.max(1);
        self
    }

    pub fn with_min_common_matches(mut self, min_common: usize) -> Self {
        self.min_common_matches = min_common.max(1);
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }
}
