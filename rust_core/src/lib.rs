//! Crosstable Core - cross-source match-history reconciliation.
//!
//! This module provides:
//! - Canonicalization of raw per-source rows into typed match records
//! - Name normalization with Cyrillic→Latin transliteration
//! - Tolerant parsing of heterogeneous date formats
//! - Fuzzy identity matching for self-match suppression and pairing checks
//! - Cross-source consensus validation with a corroboration threshold
//! - Deduplication and recency ranking of validated results
//! - Bounded concurrent collection from pluggable source collaborators

mod types;

pub mod audit;
pub mod canonical;
pub mod consensus;
pub mod engine;
pub mod error;
pub mod rank;
pub mod sources;
pub mod utils;

pub use engine::{reconcile_player, validate_pairing, PairingReport, PlayerReport};
pub use types::*;
