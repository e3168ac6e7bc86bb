use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tf_ops::config::Config;
use tf_ops::icons::IconUpdater;
use tf_ops::sitecheck::SiteChecker;
use tracing::error;

use tf_core::maintenance;
use tf_core::storage::{Storage, TitleFilter};

#[derive(Parser)]
#[command(name = "tf-ops")]
#[command(about = "TechnoFlash operational batch scripts")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backfill logo URLs for the AI tools directory
    UpdateIcons {
        /// Verify each icon URL answers over HTTP before writing it
        #[arg(long)]
        verify: bool,
        /// Pick icons and report, but write nothing
        #[arg(long)]
        dry_run: bool,
        /// Sleep between row writes, in milliseconds
        #[arg(long, default_value_t = 200)]
        delay_ms: u64,
        /// Where to write the JSON run report
        #[arg(long, default_value = "icon-report.json")]
        report: PathBuf,
    },
    /// Fetch the configured pages and report SEO/health findings
    Sitecheck {
        /// Path to the TOML config file
        #[arg(long, default_value = "config.toml")]
        config: String,
        /// Override the report path from the config
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Delete leftover test advertisements by title filter
    CleanupTestAds {
        /// Exact title matches to delete (repeatable)
        #[arg(long = "eq")]
        eq: Vec<String>,
        /// Case-insensitive substring matches to delete (repeatable)
        #[arg(long = "like")]
        like: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Move every row of the legacy ads table into advertisements
    MigrateLegacyAds {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Clamp negative ad view/click counters to zero
    RecomputeCounters,
}

#[cfg(feature = "db")]
async fn open_storage() -> anyhow::Result<Arc<dyn Storage>> {
    let storage = tf_core::storage::DatabaseStorage::new().await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "db"))]
async fn open_storage() -> anyhow::Result<Arc<dyn Storage>> {
    tracing::warn!("Built without the `db` feature; using in-memory storage");
    Ok(Arc::new(tf_core::storage::InMemoryStorage::new()))
}

fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    println!("⚠️  {prompt}");
    println!("Press Enter to continue or Ctrl+C to cancel...");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tf_ops::logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::UpdateIcons {
            verify,
            dry_run,
            delay_ms,
            report,
        } => {
            println!("🖼️  Running icon backfill...");
            let storage = open_storage().await?;
            let mut updater =
                IconUpdater::new(storage).with_delay(Duration::from_millis(delay_ms));
            if verify {
                updater = updater.with_verification();
            }
            if dry_run {
                updater = updater.dry_run();
            }

            let run = updater.run().await?;
            run.write_to(&report)?;
            println!("\n📊 Icon backfill results:");
            println!("   Updated: {}", run.updated);
            println!("   Skipped: {}", run.skipped);
            println!("   Failed: {}", run.failed);
            println!("   Report: {}", report.display());

            if run.failed > 0 {
                error!("{} rows failed during icon backfill", run.failed);
                std::process::exit(1);
            }
        }
        Commands::Sitecheck { config, report } => {
            println!("🔎 Running site health check...");
            let cfg = Config::load(&config)?;
            let checker = SiteChecker::new(
                Duration::from_secs(cfg.sitecheck.timeout_seconds),
                Duration::from_millis(cfg.sitecheck.delay_ms),
            );

            let site_report = checker.check_all(&cfg.sitecheck.urls()).await;
            let report_path =
                report.unwrap_or_else(|| PathBuf::from(&cfg.sitecheck.report_path));
            site_report.write_to(&report_path)?;

            println!("\n📊 Site health results:");
            println!("   Pages checked: {}", site_report.pages.len());
            println!(
                "   Issues: {} critical, {} high, {} medium, {} low",
                site_report.critical, site_report.high, site_report.medium, site_report.low
            );
            println!("   Health score: {}/100", site_report.health_score);
            println!("   Report: {}", report_path.display());

            if site_report.has_critical() {
                error!("{} critical issues found", site_report.critical);
                std::process::exit(1);
            }
        }
        Commands::CleanupTestAds { eq, like, yes } => {
            let filters: Vec<TitleFilter> = if eq.is_empty() && like.is_empty() {
                maintenance::default_test_ad_filters()
            } else {
                eq.into_iter()
                    .map(TitleFilter::Eq)
                    .chain(like.into_iter().map(TitleFilter::Like))
                    .collect()
            };

            confirm(
                "This will permanently delete every ad matching the title filters!",
                yes,
            )?;

            println!("🗑️  Cleaning up test ads...");
            let storage = open_storage().await?;
            let summary = maintenance::cleanup_test_ads(storage, &filters).await?;
            println!("✅ Deleted {} ads", summary.deleted);
            for title in &summary.titles {
                println!("   - {title}");
            }
        }
        Commands::MigrateLegacyAds { yes } => {
            confirm(
                "This will move every legacy `ads` row into `advertisements` and delete the originals!",
                yes,
            )?;

            println!("🚚 Migrating legacy ads...");
            let storage = open_storage().await?;
            let summary = maintenance::migrate_legacy_ads(storage).await?;
            println!(
                "✅ Migration finished: {} migrated, {} skipped, {} failed",
                summary.migrated,
                summary.skipped,
                summary.failed.len()
            );
            if !summary.failed.is_empty() {
                println!("\n⚠️  Failed rows:");
                for name in &summary.failed {
                    println!("   - {name}");
                }
                std::process::exit(1);
            }
        }
        Commands::RecomputeCounters => {
            println!("🔢 Recomputing ad counters...");
            let storage = open_storage().await?;
            let summary = maintenance::recompute_ad_counters(storage).await?;
            println!("✅ {} rows changed", summary.changed);
        }
    }
    Ok(())
}
