//! Fuzzy identity matching over normalized strings.
//!
//! One similarity function backs both uses in the pipeline: suppressing rows
//! where a site listed the queried player as their own opponent, and the
//! two-player intersection check that decides whether two record sets share
//! a match. Comparison is case-insensitive normalized edit similarity.

use strsim::normalized_levenshtein;

/// Similarity score at or above which two strings are considered the same
/// identity, absent caller configuration.
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 82;

/// Normalized edit similarity between two strings, scaled to 0-100.
///
/// Symmetric, and 100 for identical inputs (including two empty strings).
pub fn similarity(a: &str, b: &str) -> u8 {
    let score = normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase());
    (score * 100.0).round() as u8
}

/// True when similarity reaches the threshold.
pub fn similar(a: &str, b: &str, threshold: u8) -> bool {
    similarity(a, b) >= threshold
}
