//! Match-history source abstractions.
//!
//! Defines the MatchSource trait that scraping collaborators implement. The
//! collaborators own everything the core refuses to know about: transport,
//! retries, markup, and search-query construction. By the time rows reach
//! this boundary they are plain decoded text cells tagged with a source.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{RawRow, Source};

// Concrete collaborator implementations
pub mod fixture;
pub mod registry;

// Re-export registry for convenient access
pub use registry::SourceRegistry;

/// One external provider's collector of raw match rows.
///
/// Implementations commit to returning already-extracted text cells: no
/// markup, no HTTP status codes. Errors are arbitrary upstream failures;
/// the engine absorbs them into the audit trail and never aborts the batch
/// over a single source.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Collect raw rows for the queried player.
    ///
    /// An empty vector means the source answered but had nothing (no
    /// profile, empty history); an error means the source could not be
    /// loaded at all.
    async fn collect_rows(&self, player: &str) -> Result<Vec<RawRow>>;

    /// Which provider this collaborator is bound to.
    fn source(&self) -> Source;

    /// Collaborator name for logging and debugging.
    fn collaborator_name(&self) -> &str;
}
