use crate::icons::find_best_icon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tf_core::error::Result;
use tf_core::storage::Storage;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    Updated,
    Skipped,
    Failed,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RowOutcome {
    pub tool: String,
    pub action: RowAction,
    pub icon_url: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IconRunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub rows: Vec<RowOutcome>,
}

impl IconRunReport {
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Batch logo backfill over the AI tools table. Rows are processed one at
/// a time; a failed row is recorded and the run continues.
pub struct IconUpdater {
    storage: Arc<dyn Storage>,
    client: reqwest::Client,
    verify: bool,
    dry_run: bool,
    delay: Duration,
}

impl IconUpdater {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            client: reqwest::Client::new(),
            verify: false,
            dry_run: false,
            delay: Duration::from_millis(0),
        }
    }

    /// Check that the chosen icon URL answers with a success status before
    /// writing it to the row.
    pub fn with_verification(mut self) -> Self {
        self.verify = true;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Fixed sleep between rows to stay under CDN rate limits.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn icon_reachable(&self, url: &str) -> std::result::Result<bool, String> {
        match self.client.get(url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => Err(e.to_string()),
        }
    }

    pub async fn run(&self) -> Result<IconRunReport> {
        let started_at = Utc::now();
        let tools = self.storage.list_ai_tools().await?;
        info!("Icon backfill over {} tool rows", tools.len());

        let mut rows = Vec::with_capacity(tools.len());
        for (i, mut tool) in tools.into_iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let entry = find_best_icon(
                &tool.name,
                &tool.slug,
                &tool.category,
                tool.description.as_deref(),
            );
            let url = entry.url();

            // Unchanged rows make a rerun a no-op
            if tool.logo_url.as_deref() == Some(url.as_str()) {
                rows.push(RowOutcome {
                    tool: tool.name.clone(),
                    action: RowAction::Skipped,
                    icon_url: url,
                    success: true,
                    detail: Some("already up to date".to_string()),
                });
                continue;
            }

            if self.verify {
                match self.icon_reachable(&url).await {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!("Icon URL for '{}' is unreachable: {}", tool.name, url);
                        rows.push(RowOutcome {
                            tool: tool.name.clone(),
                            action: RowAction::Skipped,
                            icon_url: url,
                            success: true,
                            detail: Some("icon URL returned a non-success status".to_string()),
                        });
                        continue;
                    }
                    Err(e) => {
                        warn!("Icon check failed for '{}': {}", tool.name, e);
                        rows.push(RowOutcome {
                            tool: tool.name.clone(),
                            action: RowAction::Failed,
                            icon_url: url,
                            success: false,
                            detail: Some(e),
                        });
                        continue;
                    }
                }
            }

            if self.dry_run {
                rows.push(RowOutcome {
                    tool: tool.name.clone(),
                    action: RowAction::Skipped,
                    icon_url: url,
                    success: true,
                    detail: Some("dry run".to_string()),
                });
                continue;
            }

            tool.logo_url = Some(url.clone());
            tool.updated_at = Utc::now();
            match self.storage.update_ai_tool(&tool).await {
                Ok(()) => {
                    info!("Updated icon for '{}' -> {}", tool.name, url);
                    rows.push(RowOutcome {
                        tool: tool.name.clone(),
                        action: RowAction::Updated,
                        icon_url: url,
                        success: true,
                        detail: None,
                    });
                }
                Err(e) => {
                    warn!("Failed to update '{}': {}", tool.name, e);
                    rows.push(RowOutcome {
                        tool: tool.name.clone(),
                        action: RowAction::Failed,
                        icon_url: url,
                        success: false,
                        detail: Some(e.to_string()),
                    });
                }
            }
        }

        let report = IconRunReport {
            started_at,
            finished_at: Utc::now(),
            updated: rows.iter().filter(|r| r.action == RowAction::Updated).count(),
            skipped: rows.iter().filter(|r| r.action == RowAction::Skipped).count(),
            failed: rows.iter().filter(|r| r.action == RowAction::Failed).count(),
            rows,
        };
        info!(
            "Icon backfill finished: {} updated, {} skipped, {} failed",
            report.updated, report.skipped, report.failed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_core::domain::{AiTool, ContentStatus, PricingTier};
    use tf_core::storage::InMemoryStorage;

    fn tool(name: &str, slug: &str, category: &str) -> AiTool {
        let now = Utc::now();
        AiTool {
            id: None,
            name: name.to_string(),
            slug: slug.to_string(),
            category: category.to_string(),
            description: None,
            website_url: None,
            logo_url: None,
            pricing: PricingTier::Free,
            rating: None,
            features: vec![],
            status: ContentStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn backfill_assigns_icons_and_rerun_is_idempotent() {
        let storage = Arc::new(InMemoryStorage::new());
        for t in [
            tool("ChatGPT", "chatgpt", "chat"),
            tool("Mystery Tool", "mystery", "misc"),
        ] {
            let mut t = t;
            storage.create_ai_tool(&mut t).await.unwrap();
        }

        let updater = IconUpdater::new(storage.clone());
        let first = updater.run().await.unwrap();
        assert_eq!(first.updated, 2);
        assert_eq!(first.failed, 0);

        let tools = storage.list_ai_tools().await.unwrap();
        let urls: Vec<&str> = tools.iter().filter_map(|t| t.logo_url.as_deref()).collect();
        assert_eq!(urls.len(), 2);
        assert!(urls.iter().all(|u| u.ends_with(".svg")));

        // Second run sees every row already carrying its chosen URL
        let second = updater.run().await.unwrap();
        assert_eq!(second.updated, 0);
        assert_eq!(second.skipped, 2);

        let after = storage.list_ai_tools().await.unwrap();
        let urls_after: Vec<&str> =
            after.iter().filter_map(|t| t.logo_url.as_deref()).collect();
        assert_eq!(urls, urls_after);
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let storage = Arc::new(InMemoryStorage::new());
        let mut t = tool("Figma AI", "figma-ai", "design");
        storage.create_ai_tool(&mut t).await.unwrap();

        let report = IconUpdater::new(storage.clone()).dry_run().run().await.unwrap();
        assert_eq!(report.updated, 0);
        assert_eq!(report.skipped, 1);

        let tools = storage.list_ai_tools().await.unwrap();
        assert!(tools[0].logo_url.is_none());
    }
}
