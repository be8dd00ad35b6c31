//! Failure taxonomy for the reconciliation core.
//!
//! Everything that can go wrong inside per-row or per-source processing is
//! absorbed into a typed skip or an audit entry; only `InvalidInput` crosses
//! the engine boundary as a hard failure.

use thiserror::Error;

/// Why one raw row was dropped during canonicalization.
///
/// A skip is a normal filtering outcome, not an error; it is counted and
/// logged at debug level so causes stay inspectable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than the three required fields (date, opponent, score) could be
    /// classified out of the row's cells.
    MissingFields,
    /// A date-shaped cell was present but no supported format matched.
    NullDate,
    /// The opponent field resolved to the queried player themselves.
    SelfMatch,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingFields => "missing_fields",
            SkipReason::NullDate => "null_date",
            SkipReason::SelfMatch => "self_match",
        }
    }
}

/// Hard failures surfaced to the boundary caller.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The caller omitted a required player name. Reconciliation cannot
    /// proceed without one, so this is a rejected call rather than an empty
    /// result.
    #[error("player name is required")]
    InvalidInput,
}
