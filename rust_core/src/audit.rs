//! Per-call audit trail.
//!
//! Records human-readable per-source processing outcomes for a single
//! reconciliation call. The trail is owned by the call and returned alongside
//! its results; there is no process-wide log to accumulate into. Retention is
//! bounded by the caller via the capacity argument.

use crate::types::Source;

/// Outcome of collecting one source's rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// The source yielded rows; `usize` is the count of canonical records
    /// kept after row-level filtering.
    Ok(usize),
    /// The source answered but yielded zero rows (empty page, no profile).
    NoMatches,
    /// The collaborator failed outright (timeout, malformed page, transport
    /// error). The reason is logged, not carried in the audit line.
    FailLoad,
}

/// Bounded, call-scoped collection of advisory audit lines.
#[derive(Debug, Clone)]
pub struct AuditTrail {
    lines: Vec<String>,
    capacity: usize,
}

impl AuditTrail {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Vec::new(),
            capacity,
        }
    }

    /// Record one source outcome as its advisory line.
    pub fn record(&mut self, source: Source, outcome: &SourceOutcome) {
        let line = match outcome {
            SourceOutcome::Ok(count) => format!("ok {} -> {}", source, count),
            SourceOutcome::NoMatches => format!("no_matches {}", source),
            SourceOutcome::FailLoad => format!("fail_load {}", source),
        };
        self.push(line);
    }

    /// Append a line, dropping it silently once the retention bound is hit.
    pub fn push(&mut self, line: String) {
        if self.lines.len() < self.capacity {
            self.lines.push(line);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
