//! Manual one-time data fixups: test-ad cleanup, the legacy `ads` table
//! migration, and counter recomputation. Shared by the admin API task
//! endpoints and the ops CLI.

use crate::error::Result;
use crate::storage::{Storage, TitleFilter};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanupSummary {
    pub deleted: usize,
    pub titles: Vec<String>,
}

/// Delete ads whose titles match any of the given filters. The filters are
/// the ones the old admin console used verbatim: an exact "s" placeholder
/// match and case-insensitive "test" substring matches.
pub async fn cleanup_test_ads(
    storage: Arc<dyn Storage>,
    filters: &[TitleFilter],
) -> Result<CleanupSummary> {
    let deleted = storage.delete_ads_by_title(filters).await?;
    let titles: Vec<String> = deleted.into_iter().map(|ad| ad.title).collect();
    info!("Cleanup removed {} test ads", titles.len());
    Ok(CleanupSummary {
        deleted: titles.len(),
        titles,
    })
}

pub fn default_test_ad_filters() -> Vec<TitleFilter> {
    vec![
        TitleFilter::Eq("s".to_string()),
        TitleFilter::Like("test".to_string()),
    ]
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MigrationSummary {
    pub migrated: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
}

/// Migrate every row of the legacy `ads` table into `advertisements`.
///
/// Legacy rows whose name already exists as an advertisement title are
/// skipped and left in place, so re-running after a partial failure only
/// moves what is still missing. A failed row is recorded and the batch
/// continues.
pub async fn migrate_legacy_ads(storage: Arc<dyn Storage>) -> Result<MigrationSummary> {
    let legacy = storage.list_legacy_ads().await?;
    let mut taken_titles: std::collections::HashSet<String> = storage
        .list_advertisements()
        .await?
        .into_iter()
        .map(|ad| ad.title)
        .collect();

    let mut summary = MigrationSummary::default();
    for row in legacy {
        let legacy_id = match row.id {
            Some(id) => id,
            None => {
                warn!("Legacy ad '{}' has no id, skipping", row.name);
                summary.failed.push(row.name);
                continue;
            }
        };

        if taken_titles.contains(&row.name) {
            info!("Legacy ad '{}' already migrated, skipping", row.name);
            summary.skipped += 1;
            continue;
        }

        let name = row.name.clone();
        let mut ad = row.into_advertisement();
        match storage.create_advertisement(&mut ad).await {
            Ok(()) => match storage.delete_legacy_ad(legacy_id).await {
                Ok(_) => {
                    info!("Migrated legacy ad '{}'", name);
                    taken_titles.insert(name.clone());
                    summary.migrated += 1;
                }
                Err(e) => {
                    // The advertisement row exists; the skip check above
                    // keeps the leftover legacy row from duplicating it.
                    warn!("Migrated '{}' but failed to delete legacy row: {}", name, e);
                    summary.failed.push(name);
                }
            },
            Err(e) => {
                warn!("Failed to migrate legacy ad '{}': {}", name, e);
                summary.failed.push(name);
            }
        }
    }
    Ok(summary)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecomputeSummary {
    pub changed: usize,
    pub checked_at: chrono::DateTime<Utc>,
}

pub async fn recompute_ad_counters(storage: Arc<dyn Storage>) -> Result<RecomputeSummary> {
    let changed = storage.recompute_ad_counters().await?;
    info!("Recomputed ad counters, {} rows changed", changed);
    Ok(RecomputeSummary {
        changed,
        checked_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdType, Advertisement, LegacyAd};
    use crate::storage::InMemoryStorage;

    fn legacy(name: &str) -> LegacyAd {
        LegacyAd {
            id: None,
            name: name.to_string(),
            ad_html: format!("<div>{name}</div>"),
            slot: "sidebar".to_string(),
            enabled: true,
            impressions: 3,
            clicks: 1,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn migration_moves_all_legacy_rows() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.insert_legacy_ad(legacy("Old one"));
        storage.insert_legacy_ad(legacy("Old two"));

        let summary = migrate_legacy_ads(storage.clone()).await.unwrap();
        assert_eq!(summary.migrated, 2);
        assert_eq!(summary.skipped, 0);
        assert!(summary.failed.is_empty());

        let ads = storage.list_advertisements().await.unwrap();
        assert_eq!(ads.len(), 2);
        assert!(ads.iter().all(|ad| ad.ad_type == AdType::Html));
        assert!(storage.list_legacy_ads().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn migration_rerun_is_idempotent() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.insert_legacy_ad(legacy("Old one"));

        migrate_legacy_ads(storage.clone()).await.unwrap();
        // Simulate a leftover legacy row from a partial earlier run
        storage.insert_legacy_ad(legacy("Old one"));

        let second = migrate_legacy_ads(storage.clone()).await.unwrap();
        assert_eq!(second.migrated, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(storage.list_advertisements().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn migration_skips_duplicate_names_within_one_run() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.insert_legacy_ad(legacy("Old one"));
        storage.insert_legacy_ad(legacy("Old one"));

        let summary = migrate_legacy_ads(storage.clone()).await.unwrap();
        assert_eq!(summary.migrated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(storage.list_advertisements().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cleanup_uses_default_filters() {
        let storage = Arc::new(InMemoryStorage::new());
        let now = Utc::now();
        for title in ["s", "A test ad", "Keep me"] {
            let mut ad = Advertisement {
                id: None,
                title: title.to_string(),
                ad_code: String::new(),
                ad_type: AdType::Banner,
                placement: "header".to_string(),
                is_active: false,
                is_paused: false,
                view_count: 0,
                click_count: 0,
                start_date: None,
                end_date: None,
                width: None,
                height: None,
                created_at: now,
                updated_at: now,
            };
            storage.create_advertisement(&mut ad).await.unwrap();
        }

        let summary = cleanup_test_ads(storage.clone(), &default_test_ad_filters())
            .await
            .unwrap();
        assert_eq!(summary.deleted, 2);
        let remaining = storage.list_advertisements().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Keep me");
    }
}
