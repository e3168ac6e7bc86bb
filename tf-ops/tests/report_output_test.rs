use anyhow::Result;
use std::sync::Arc;
use tempfile::tempdir;
use tf_core::domain::{AiTool, ContentStatus, PricingTier};
use tf_core::storage::{InMemoryStorage, Storage};
use tf_ops::icons::IconUpdater;
use tf_ops::sitecheck::{Issue, PageReport, Severity, SiteReport};

fn sample_tool(name: &str, slug: &str) -> AiTool {
    let now = chrono::Utc::now();
    AiTool {
        id: None,
        name: name.to_string(),
        slug: slug.to_string(),
        category: "misc".to_string(),
        description: None,
        website_url: None,
        logo_url: None,
        pricing: PricingTier::Freemium,
        rating: Some(4.5),
        features: vec!["chat".to_string()],
        status: ContentStatus::Published,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn icon_run_report_round_trips_through_disk() -> Result<()> {
    let storage = Arc::new(InMemoryStorage::new());
    let mut tool = sample_tool("Claude", "claude");
    storage.create_ai_tool(&mut tool).await?;

    let run = IconUpdater::new(storage).run().await?;

    let dir = tempdir()?;
    let path = dir.path().join("icon-report.json");
    run.write_to(&path)?;

    let raw = std::fs::read_to_string(&path)?;
    let parsed: tf_ops::icons::IconRunReport = serde_json::from_str(&raw)?;
    assert_eq!(parsed.updated, 1);
    assert_eq!(parsed.rows.len(), 1);
    assert!(parsed.rows[0].icon_url.contains("anthropic"));
    Ok(())
}

#[test]
fn site_report_file_carries_the_score() -> Result<()> {
    let pages = vec![PageReport {
        url: "https://technoflash.example/".to_string(),
        status: Some(200),
        issues: vec![
            Issue::new(Severity::Critical, "Missing <title>"),
            Issue::new(Severity::Medium, "Multiple <h1> elements (2)"),
            Issue::new(Severity::Medium, "1 images without alt text"),
        ],
    }];
    let report = SiteReport::from_pages(pages);

    let dir = tempdir()?;
    let path = dir.path().join("sitecheck-report.json");
    report.write_to(&path)?;

    let raw = std::fs::read_to_string(&path)?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(parsed["health_score"], 70);
    assert_eq!(parsed["critical"], 1);
    assert_eq!(parsed["pages"][0]["status"], 200);
    Ok(())
}
