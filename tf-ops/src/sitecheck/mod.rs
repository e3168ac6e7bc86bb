//! Site health/SEO checker: fetch a fixed list of pages, inspect status
//! codes, HTML metadata and security headers, and score the findings.

mod checker;

pub use checker::SiteChecker;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tf_core::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Penalty weight applied to the health score.
    pub fn weight(&self) -> i64 {
        match self {
            Severity::Critical => 20,
            Severity::High => 10,
            Severity::Medium => 5,
            Severity::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// `100 − 20×critical − 10×high − 5×medium − 1×low`, clamped at 0.
pub fn health_score(critical: usize, high: usize, medium: usize, low: usize) -> u8 {
    let penalty = 20 * critical as i64 + 10 * high as i64 + 5 * medium as i64 + low as i64;
    (100 - penalty).max(0) as u8
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    /// HTTP status, absent when the fetch itself failed.
    pub status: Option<u16>,
    pub issues: Vec<Issue>,
}

impl PageReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn health_score(&self) -> u8 {
        health_score(
            self.count(Severity::Critical),
            self.count(Severity::High),
            self.count(Severity::Medium),
            self.count(Severity::Low),
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SiteReport {
    pub generated_at: DateTime<Utc>,
    pub pages: Vec<PageReport>,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub health_score: u8,
}

impl SiteReport {
    pub fn from_pages(pages: Vec<PageReport>) -> Self {
        let count =
            |sev| pages.iter().map(|p| p.count(sev)).sum::<usize>();
        let critical = count(Severity::Critical);
        let high = count(Severity::High);
        let medium = count(Severity::Medium);
        let low = count(Severity::Low);
        Self {
            generated_at: Utc::now(),
            critical,
            high,
            medium,
            low,
            health_score: health_score(critical, high, medium, low),
            pages,
        }
    }

    pub fn has_critical(&self) -> bool {
        self.critical > 0
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_matches_the_published_example() {
        // 1 critical + 2 medium => 100 - 20 - 10 = 70
        assert_eq!(health_score(1, 0, 2, 0), 70);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        assert_eq!(health_score(6, 0, 0, 0), 0);
        assert_eq!(health_score(4, 2, 1, 0), 0);
    }

    #[test]
    fn perfect_page_scores_full_marks() {
        assert_eq!(health_score(0, 0, 0, 0), 100);
    }

    #[test]
    fn site_report_aggregates_page_buckets() {
        let pages = vec![
            PageReport {
                url: "https://technoflash.example/".to_string(),
                status: Some(200),
                issues: vec![Issue::new(Severity::Critical, "Missing <title>")],
            },
            PageReport {
                url: "https://technoflash.example/articles".to_string(),
                status: Some(200),
                issues: vec![
                    Issue::new(Severity::Medium, "Multiple <h1> elements"),
                    Issue::new(Severity::Medium, "2 images without alt text"),
                ],
            },
        ];
        let report = SiteReport::from_pages(pages);
        assert_eq!(report.critical, 1);
        assert_eq!(report.medium, 2);
        assert_eq!(report.health_score, 70);
        assert!(report.has_critical());
    }
}
