//! Fixture-backed match source.
//!
//! Serves pre-extracted rows held in memory. Used by tests and by serving
//! layers that receive rows from out-of-process scrapers; real site
//! collaborators plug in behind the same trait.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use super::MatchSource;
use crate::types::{RawRow, Source};
use crate::utils::names::opponent_key;

pub struct FixtureSource {
    source: Source,
    /// Rows served for any player without a dedicated entry.
    default_rows: Vec<Vec<String>>,
    /// Rows keyed by normalized player name, for multi-player fixtures.
    player_rows: HashMap<String, Vec<Vec<String>>>,
}

impl FixtureSource {
    pub fn new(source: Source, rows: Vec<Vec<String>>) -> Self {
        Self {
            source,
            default_rows: rows,
            player_rows: HashMap::new(),
        }
    }

    /// Convenience constructor from string slices.
    pub fn from_cells(source: Source, rows: &[&[&str]]) -> Self {
        Self::new(
            source,
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    /// Attach rows served only when the queried player matches `player`.
    pub fn with_player_rows(mut self, player: &str, rows: Vec<Vec<String>>) -> Self {
        self.player_rows.insert(opponent_key(player), rows);
        self
    }
}

#[async_trait]
impl MatchSource for FixtureSource {
    async fn collect_rows(&self, player: &str) -> Result<Vec<RawRow>> {
        let rows = self
            .player_rows
            .get(&opponent_key(player))
            .unwrap_or(&self.default_rows);
        Ok(rows
            .iter()
            .map(|cells| RawRow::new(self.source, cells.clone()))
            .collect())
    }

    fn source(&self) -> Source {
        self.source
    }

    fn collaborator_name(&self) -> &str {
        "Fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rows_tagged_with_source() {
        let fixture = FixtureSource::from_cells(
            Source::Scores24,
            &[
                &["01.03.2024", "Ivanov", "3:1"],
                &["05.03.2024", "Petrov", "2:3"],
            ],
        );

        let rows = fixture.collect_rows("any").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.source == Source::Scores24));
        assert_eq!(rows[0].cells, vec!["01.03.2024", "Ivanov", "3:1"]);
    }

    #[tokio::test]
    async fn test_empty_fixture_yields_no_rows() {
        let fixture = FixtureSource::new(Source::Rttf, Vec::new());
        assert!(fixture.collect_rows("any").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_player_rows_keyed_by_normalized_name() {
        let fixture = FixtureSource::new(Source::Rttf, Vec::new()).with_player_rows(
            "Иванов",
            vec![vec![
                "01.03.2024".to_string(),
                "Petrov".to_string(),
                "3:1".to_string(),
            ]],
        );

        // The Latin spelling resolves to the same fixture entry.
        let rows = fixture.collect_rows("Ivanov").await.unwrap();
        assert_eq!(rows.len(), 1);

        let other = fixture.collect_rows("Sidorov").await.unwrap();
        assert!(other.is_empty());
    }
}
