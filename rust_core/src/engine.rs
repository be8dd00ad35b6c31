//! Reconciliation engine.
//!
//! Orchestrates concurrent row collection from the registered source
//! collaborators, then runs the pure reconciliation pipeline over whatever
//! arrived: canonicalize, corroborate across sources, rank. A source that
//! fails or returns nothing costs an audit line, never the batch.

use std::sync::Arc;

use futures_util::future;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::audit::{AuditTrail, SourceOutcome};
use crate::canonical::canonicalize_rows;
use crate::consensus;
use crate::error::ReconcileError;
use crate::rank;
use crate::sources::SourceRegistry;
use crate::types::{CanonicalMatch, ReconcileConfig, Source, ValidatedMatch};
use crate::utils::names::name_variants;

/// Consensus view of one player's match history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerReport {
    pub request_id: Uuid,
    pub player: String,
    pub matches: Vec<ValidatedMatch>,
    pub total: usize,
    pub audit: Vec<String>,
}

/// Verdict on whether two players share a corroborated match history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingReport {
    pub request_id: Uuid,
    pub player1: String,
    pub player2: String,
    pub validated: bool,
    pub common_matches: Vec<String>,
    pub total_common: usize,
    pub reason: String,
    pub audit: Vec<String>,
}

/// Build the corroborated, ranked match list for one player.
///
/// The only hard failure is a blank player name; everything downstream of
/// collection is absorbed into skips and audit lines.
pub async fn reconcile_player(
    registry: &SourceRegistry,
    player: &str,
    config: &ReconcileConfig,
) -> Result<PlayerReport, ReconcileError> {
    let player = player.trim();
    if player.is_empty() {
        return Err(ReconcileError::InvalidInput);
    }

    info!(player, sources = registry.len(), "reconciling match history");

    let variants = name_variants(player);
    let mut audit = AuditTrail::default();
    let records = collect_canonical(registry, player, &variants, config, &mut audit).await;

    let validated = consensus::validate(&records, config.min_sources);
    let matches = rank::rank(validated, config.max_results);

    info!(player, matches = matches.len(), "reconciliation complete");

    Ok(PlayerReport {
        request_id: Uuid::new_v4(),
        player: player.to_string(),
        total: matches.len(),
        matches,
        audit: audit.into_lines(),
    })
}

/// Cross-validate that two named players actually played each other.
///
/// Each player's record set is collected independently, deduplicated, and
/// rendered to match lines; the pairing is validated when enough lines from
/// one set fuzzily appear in the other.
pub async fn validate_pairing(
    registry: &SourceRegistry,
    player1: &str,
    player2: &str,
    config: &ReconcileConfig,
) -> Result<PairingReport, ReconcileError> {
    let player1 = player1.trim();
    let player2 = player2.trim();
    if player1.is_empty() || player2.is_empty() {
        return Err(ReconcileError::InvalidInput);
    }

    info!(player1, player2, "cross-validating pairing");

    let mut audit = AuditTrail::default();
    let lines1 = collect_match_lines(registry, player1, config, &mut audit).await;
    let lines2 = collect_match_lines(registry, player2, config, &mut audit).await;

    let verdict = consensus::validate_pairing_lines(
        &lines1,
        &lines2,
        config.fuzzy_threshold,
        config.min_common_matches,
    );

    info!(
        player1,
        player2,
        validated = verdict.validated,
        common = verdict.common.len(),
        "pairing verdict"
    );

    Ok(PairingReport {
        request_id: Uuid::new_v4(),
        player1: player1.to_string(),
        player2: player2.to_string(),
        validated: verdict.validated,
        total_common: verdict.common.len(),
        common_matches: verdict.common,
        reason: verdict.reason,
        audit: audit.into_lines(),
    })
}

/// Collect and canonicalize rows from every registered source.
///
/// Collaborators run concurrently under a worker-pool semaphore; outcomes
/// are recorded per source in stable source order, so neither the audit
/// trail nor the record set depends on completion order.
async fn collect_canonical(
    registry: &SourceRegistry,
    player: &str,
    player_variants: &[String],
    config: &ReconcileConfig,
    audit: &mut AuditTrail,
) -> Vec<CanonicalMatch> {
    let semaphore = Arc::new(Semaphore::new(config.max_workers.max(1)));
    let mut handles = Vec::new();

    for collaborator in registry.all() {
        let semaphore = Arc::clone(&semaphore);
        let player = player.to_string();
        let source = collaborator.source();
        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(closed) => return Err(anyhow::Error::new(closed)),
            };
            collaborator.collect_rows(&player).await
        });
        handles.push((source, handle));
    }

    let joined = future::join_all(
        handles
            .into_iter()
            .map(|(source, handle)| async move { (source, handle.await) }),
    )
    .await;

    let mut outcomes: Vec<(Source, SourceOutcome, Vec<CanonicalMatch>)> = Vec::new();
    for (source, join_result) in joined {
        let fetched = match join_result {
            Ok(result) => result,
            Err(join_error) => Err(anyhow::Error::new(join_error)),
        };

        match fetched {
            Ok(rows) if rows.is_empty() => {
                outcomes.push((source, SourceOutcome::NoMatches, Vec::new()));
            }
            Ok(rows) => {
                let (records, skips) =
                    canonicalize_rows(&rows, player_variants, config.fuzzy_threshold);
                if !skips.is_empty() {
                    debug!(source = %source, skipped = skips.len(), "rows skipped");
                }
                outcomes.push((source, SourceOutcome::Ok(records.len()), records));
            }
            Err(error) => {
                warn!(source = %source, error = %error, "source load failed");
                outcomes.push((source, SourceOutcome::FailLoad, Vec::new()));
            }
        }
    }

    outcomes.sort_by_key(|(source, _, _)| *source);

    let mut records = Vec::new();
    for (source, outcome, mut kept) in outcomes {
        audit.record(source, &outcome);
        records.append(&mut kept);
    }
    records
}

/// One player's deduplicated record set as comparable match lines.
async fn collect_match_lines(
    registry: &SourceRegistry,
    player: &str,
    config: &ReconcileConfig,
    audit: &mut AuditTrail,
) -> Vec<String> {
    let variants = name_variants(player);
    let records = collect_canonical(registry, player, &variants, config, audit).await;
    consensus::group_by_identity(&records)
        .into_values()
        .map(|group| group.representative.match_line())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::fixture::FixtureSource;
    use crate::sources::MatchSource;
    use crate::types::RawRow;
    use anyhow::anyhow;
    use async_trait::async_trait;

    struct FailingSource(Source);

    #[async_trait]
    impl MatchSource for FailingSource {
        async fn collect_rows(&self, _player: &str) -> anyhow::Result<Vec<RawRow>> {
            Err(anyhow!("connection timed out"))
        }

        fn source(&self) -> Source {
            self.0
        }

        fn collaborator_name(&self) -> &str {
            "Failing"
        }
    }

    fn rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_cross_source_corroboration_end_to_end() {
        // A and C report the same event under different alphabets; B has
        // nothing that matches.
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(FixtureSource::from_cells(
            Source::Rttf,
            &[&["10.04.2024", "Smirnov", "3:0"]],
        )));
        registry.register(Arc::new(FixtureSource::new(Source::Scores24, Vec::new())));
        registry.register(Arc::new(FixtureSource::from_cells(
            Source::Aiscore,
            &[&["10.04.2024", "Смирнов", "3:0"]],
        )));

        let report = reconcile_player(&registry, "Kuznetsov", &ReconcileConfig::default())
            .await
            .unwrap();

        assert_eq!(report.total, 1);
        assert_eq!(
            report.matches[0].sources,
            [Source::Rttf, Source::Aiscore].into_iter().collect()
        );
        assert_eq!(
            report.audit,
            vec![
                "ok rttf -> 1".to_string(),
                "no_matches scores24".to_string(),
                "ok aiscore -> 1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_single_source_claims_are_not_trusted() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(FixtureSource::from_cells(
            Source::Rttf,
            &[
                &["10.04.2024", "Smirnov", "3:0"],
                &["10.04.2024", "Smirnov", "3:0"],
            ],
        )));

        let report = reconcile_player(&registry, "Kuznetsov", &ReconcileConfig::default())
            .await
            .unwrap();
        assert_eq!(report.total, 0);
    }

    #[tokio::test]
    async fn test_source_failure_does_not_abort_batch() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(FixtureSource::from_cells(
            Source::Rttf,
            &[&["10.04.2024", "Smirnov", "3:0"]],
        )));
        registry.register(Arc::new(FixtureSource::from_cells(
            Source::Scores24,
            &[&["10.04.2024", "Smirnov", "3:0"]],
        )));
        registry.register(Arc::new(FailingSource(Source::Sofascore)));

        let report = reconcile_player(&registry, "Kuznetsov", &ReconcileConfig::default())
            .await
            .unwrap();

        assert_eq!(report.total, 1);
        assert!(report
            .audit
            .contains(&"fail_load sofascore".to_string()));
    }

    #[tokio::test]
    async fn test_blank_player_rejected() {
        let registry = SourceRegistry::new();
        let result = reconcile_player(&registry, "   ", &ReconcileConfig::default()).await;
        assert!(matches!(result, Err(ReconcileError::InvalidInput)));
    }

    #[tokio::test]
    async fn test_empty_registry_yields_empty_report() {
        let registry = SourceRegistry::new();
        let report = reconcile_player(&registry, "Kuznetsov", &ReconcileConfig::default())
            .await
            .unwrap();
        assert_eq!(report.total, 0);
        assert!(report.audit.is_empty());
    }

    #[tokio::test]
    async fn test_self_match_rows_dropped_before_consensus() {
        // Both sources list the queried player as their own opponent.
        let mut registry = SourceRegistry::new();
        for source in [Source::Rttf, Source::Scores24] {
            registry.register(Arc::new(FixtureSource::from_cells(
                source,
                &[&["10.04.2024", "Kuznetsov", "3:0"]],
            )));
        }

        let report = reconcile_player(&registry, "Кузнецов", &ReconcileConfig::default())
            .await
            .unwrap();
        assert_eq!(report.total, 0);
        assert_eq!(
            report.audit,
            vec!["ok rttf -> 0".to_string(), "ok scores24 -> 0".to_string()]
        );
    }

    #[tokio::test]
    async fn test_result_cap_keeps_most_recent() {
        let mut cells: Vec<Vec<String>> = Vec::new();
        for day in 1..=25 {
            cells.push(vec![
                format!("{:02}.03.2024", day),
                "Ivanov".to_string(),
                "3:1".to_string(),
            ]);
        }
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(FixtureSource::new(Source::Rttf, cells.clone())));
        registry.register(Arc::new(FixtureSource::new(Source::Scores24, cells)));

        let config = ReconcileConfig::default().with_max_results(20);
        let report = reconcile_player(&registry, "Kuznetsov", &config).await.unwrap();

        assert_eq!(report.total, 20);
        assert_eq!(report.matches[0].date.to_string(), "2024-03-25");
        assert_eq!(report.matches[19].date.to_string(), "2024-03-06");
    }

    #[tokio::test]
    async fn test_pairing_one_common_match_is_insufficient() {
        let source = FixtureSource::new(Source::Rttf, Vec::new())
            .with_player_rows(
                "PlayerA",
                rows(&[
                    &["01.03.2024", "Ivanov", "3:1"],
                    &["05.03.2024", "Petrov", "2:3"],
                ]),
            )
            .with_player_rows(
                "PlayerB",
                rows(&[
                    &["01.03.2024", "Ivanov", "3:1"],
                    &["09.03.2024", "Sidorov", "1:3"],
                ]),
            );
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(source));

        let report = validate_pairing(&registry, "PlayerA", "PlayerB", &ReconcileConfig::default())
            .await
            .unwrap();

        assert_eq!(report.total_common, 1);
        assert_eq!(
            report.common_matches,
            vec!["01.03.2024|Ivanov|3:1".to_string()]
        );
        assert!(!report.validated);
        assert!(report.reason.contains("insufficient corroboration"));
    }

    #[tokio::test]
    async fn test_pairing_validated_at_minimum_common() {
        let shared = rows(&[
            &["01.03.2024", "Ivanov", "3:1"],
            &["05.03.2024", "Petrov", "2:3"],
        ]);
        let source = FixtureSource::new(Source::Rttf, Vec::new())
            .with_player_rows("PlayerA", shared.clone())
            .with_player_rows("PlayerB", shared);
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(source));

        let report = validate_pairing(&registry, "PlayerA", "PlayerB", &ReconcileConfig::default())
            .await
            .unwrap();

        assert!(report.validated);
        assert_eq!(report.total_common, 2);
    }

    #[tokio::test]
    async fn test_pairing_requires_both_names() {
        let registry = SourceRegistry::new();
        let result =
            validate_pairing(&registry, "PlayerA", "", &ReconcileConfig::default()).await;
        assert!(matches!(result, Err(ReconcileError::InvalidInput)));
    }
}
