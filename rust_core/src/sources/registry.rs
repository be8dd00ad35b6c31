//! Source registry.
//!
//! Maps the closed Source enumeration to collaborator capabilities. Adding a
//! provider is a registry entry against an enum variant; nothing anywhere
//! selects a parser by matching on URL or source-name substrings.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::MatchSource;
use crate::types::Source;

/// Registry of match-history collaborators, keyed by source.
pub struct SourceRegistry {
    sources: HashMap<Source, Arc<dyn MatchSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Register a collaborator under the source it reports for.
    ///
    /// A later registration for the same source replaces the earlier one.
    pub fn register(&mut self, collaborator: Arc<dyn MatchSource>) {
        let source = collaborator.source();
        info!(
            source = %source,
            collaborator = collaborator.collaborator_name(),
            "registering source collaborator"
        );
        self.sources.insert(source, collaborator);
    }

    /// Get the collaborator for a source.
    pub fn get(&self, source: Source) -> Option<Arc<dyn MatchSource>> {
        self.sources.get(&source).cloned()
    }

    /// All registered collaborators, in stable source order.
    pub fn all(&self) -> Vec<Arc<dyn MatchSource>> {
        Source::ALL
            .iter()
            .filter_map(|source| self.sources.get(source).cloned())
            .collect()
    }

    /// List registered sources, in stable order.
    pub fn list_sources(&self) -> Vec<Source> {
        Source::ALL
            .iter()
            .copied()
            .filter(|source| self.sources.contains_key(source))
            .collect()
    }

    pub fn has_source(&self, source: Source) -> bool {
        self.sources.contains_key(&source)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
