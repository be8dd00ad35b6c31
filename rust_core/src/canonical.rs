//! Record canonicalization.
//!
//! Classifies the already-extracted text cells of one source row into date,
//! opponent, and score fields, producing a `CanonicalMatch` or a typed skip.
//! The heuristics are deliberately source-agnostic: anything site-specific
//! happens upstream in the scraping collaborators, which hand this module
//! plain text cells only.

use tracing::debug;

use crate::error::SkipReason;
use crate::types::{CanonicalMatch, RawRow};
use crate::utils::dates::{looks_like_date, parse_date};
use crate::utils::matching::similar;
use crate::utils::names::opponent_key;

/// Outcome of canonicalizing one raw row.
///
/// A skip is data, not an exception: callers can count and inspect skip
/// causes without any failure propagating.
#[derive(Debug, Clone)]
pub enum RowOutcome {
    Match(CanonicalMatch),
    Skipped(SkipReason),
}

impl RowOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, RowOutcome::Match(_))
    }
}

/// Classify one row's cells and build a canonical record.
///
/// Field heuristics: the first cell with a recognizable date token becomes
/// the date; a cell holding a `:`-delimited pair of integers becomes the
/// score; a cell of letters, spaces, and hyphens becomes the opponent. Rows
/// missing any of the three, or whose date text cannot be parsed, are
/// skipped. An opponent fuzzy-similar to the queried player's own name is a
/// data error (the site listed the player against themselves) and skips too.
pub fn canonicalize_row(
    row: &RawRow,
    player_variants: &[String],
    fuzzy_threshold: u8,
) -> RowOutcome {
    let mut date = None;
    let mut score = None;
    let mut opponent: Option<&str> = None;
    let mut saw_date_like = false;

    for cell in &row.cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }

        if date.is_none() && looks_like_date(cell) {
            saw_date_like = true;
            match parse_date(cell) {
                Some(parsed) => {
                    date = Some(parsed);
                    continue;
                }
                None => continue,
            }
        }

        if score.is_none() {
            if let Some(normalized) = parse_score(cell) {
                score = Some(normalized);
                continue;
            }
        }

        if opponent.is_none() && looks_like_name(cell) {
            opponent = Some(cell);
        }
    }

    let (Some(date), Some(score), Some(opponent_raw)) = (date, score, opponent) else {
        let reason = if date.is_none() && saw_date_like {
            SkipReason::NullDate
        } else {
            SkipReason::MissingFields
        };
        debug!(source = %row.source, reason = reason.as_str(), "row skipped");
        return RowOutcome::Skipped(reason);
    };

    let key = opponent_key(opponent_raw);
    if player_variants
        .iter()
        .any(|variant| !variant.is_empty() && similar(&key, variant, fuzzy_threshold))
    {
        debug!(source = %row.source, opponent = opponent_raw, "self-match row skipped");
        return RowOutcome::Skipped(SkipReason::SelfMatch);
    }

    RowOutcome::Match(CanonicalMatch {
        date,
        opponent_raw: opponent_raw.to_string(),
        opponent_key: key,
        score,
        source: row.source,
    })
}

/// Canonicalize a batch of rows, returning kept records and skip reasons.
pub fn canonicalize_rows(
    rows: &[RawRow],
    player_variants: &[String],
    fuzzy_threshold: u8,
) -> (Vec<CanonicalMatch>, Vec<SkipReason>) {
    let mut records = Vec::new();
    let mut skips = Vec::new();

    for row in rows {
        match canonicalize_row(row, player_variants, fuzzy_threshold) {
            RowOutcome::Match(record) => records.push(record),
            RowOutcome::Skipped(reason) => skips.push(reason),
        }
    }

    (records, skips)
}

/// Recognize a `:`-delimited pair of integers and normalize its spacing.
fn parse_score(cell: &str) -> Option<String> {
    let (left, right) = cell.split_once(':')?;
    let left = left.trim();
    let right = right.trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    if !left.bytes().all(|b| b.is_ascii_digit()) || !right.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}:{}", left, right))
}

/// Recognize an opponent-shaped cell: letters, spaces, hyphens, and the
/// odd initial dot or apostrophe, with at least two letters overall.
fn looks_like_name(cell: &str) -> bool {
    let mut letters = 0;
    for ch in cell.chars() {
        if ch.is_alphabetic() {
            letters += 1;
        } else if !matches!(ch, ' ' | '-' | '.' | '\'') {
            return false;
        }
    }
    letters >= 2
}
