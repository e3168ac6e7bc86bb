use crate::sitecheck::{Issue, PageReport, Severity, SiteReport};
use reqwest::header::HeaderMap;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{info, warn};

const SECURITY_HEADERS: [&str; 3] = [
    "x-content-type-options",
    "x-frame-options",
    "strict-transport-security",
];

pub struct SiteChecker {
    client: reqwest::Client,
    delay: Duration,
}

impl SiteChecker {
    pub fn new(timeout: Duration, delay: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, delay }
    }

    /// Check every URL in order, sleeping between fetches. Fetch failures
    /// become critical findings; they never abort the remaining pages.
    pub async fn check_all(&self, urls: &[String]) -> SiteReport {
        let mut pages = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let page = self.check_page(url).await;
            info!(
                "Checked {}: status {:?}, {} issues, score {}",
                url,
                page.status,
                page.issues.len(),
                page.health_score()
            );
            pages.push(page);
        }
        SiteReport::from_pages(pages)
    }

    pub async fn check_page(&self, url: &str) -> PageReport {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                return PageReport {
                    url: url.to_string(),
                    status: None,
                    issues: vec![Issue::new(
                        Severity::Critical,
                        format!("Fetch failed: {e}"),
                    )],
                };
            }
        };

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let mut issues = Vec::new();

        if !(200..=299).contains(&status) {
            issues.push(Issue::new(
                Severity::Critical,
                format!("HTTP status {status}"),
            ));
        } else {
            match resp.text().await {
                Ok(body) => issues.extend(inspect_html(&body)),
                Err(e) => issues.push(Issue::new(
                    Severity::Critical,
                    format!("Failed to read body: {e}"),
                )),
            }
        }
        issues.extend(inspect_headers(&headers));

        PageReport {
            url: url.to_string(),
            status: Some(status),
            issues,
        }
    }
}

/// Inspect page HTML for the SEO findings: title, meta description, H1
/// structure and image alt text.
pub fn inspect_html(body: &str) -> Vec<Issue> {
    let document = Html::parse_document(body);
    let mut issues = Vec::new();

    let title_sel = Selector::parse("title").unwrap();
    match document.select(&title_sel).next() {
        None => issues.push(Issue::new(Severity::Critical, "Missing <title>")),
        Some(el) => {
            let title = el.text().collect::<String>();
            let title = title.trim();
            let title_chars = title.chars().count();
            if title.is_empty() {
                issues.push(Issue::new(Severity::Critical, "Missing <title>"));
            } else if title_chars < 10 {
                issues.push(Issue::new(
                    Severity::High,
                    format!("Title too short ({title_chars} chars)"),
                ));
            } else if title_chars > 60 {
                issues.push(Issue::new(
                    Severity::Medium,
                    format!("Title too long ({title_chars} chars)"),
                ));
            }
        }
    }

    let desc_sel = Selector::parse("meta[name=\"description\"]").unwrap();
    let description = document
        .select(&desc_sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match description.map(|d| d.chars().count()) {
        None => issues.push(Issue::new(Severity::High, "Missing meta description")),
        Some(chars) if chars < 50 => issues.push(Issue::new(
            Severity::Medium,
            format!("Meta description too short ({chars} chars)"),
        )),
        Some(chars) if chars > 160 => issues.push(Issue::new(
            Severity::Low,
            format!("Meta description too long ({chars} chars)"),
        )),
        Some(_) => {}
    }

    let h1_sel = Selector::parse("h1").unwrap();
    let h1_count = document.select(&h1_sel).count();
    if h1_count == 0 {
        issues.push(Issue::new(Severity::High, "Missing <h1>"));
    } else if h1_count > 1 {
        issues.push(Issue::new(
            Severity::Medium,
            format!("Multiple <h1> elements ({h1_count})"),
        ));
    }

    let img_sel = Selector::parse("img").unwrap();
    let missing_alt = document
        .select(&img_sel)
        .filter(|el| {
            el.value()
                .attr("alt")
                .map(|alt| alt.trim().is_empty())
                .unwrap_or(true)
        })
        .count();
    if missing_alt > 0 {
        issues.push(Issue::new(
            Severity::Medium,
            format!("{missing_alt} images without alt text"),
        ));
    }

    issues
}

/// Flag missing security headers, one low-severity finding each.
pub fn inspect_headers(headers: &HeaderMap) -> Vec<Issue> {
    SECURITY_HEADERS
        .iter()
        .filter(|name| !headers.contains_key(**name))
        .map(|name| Issue::new(Severity::Low, format!("Missing security header: {name}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(body: &str) -> Vec<Issue> {
        inspect_html(body)
    }

    fn has(issues: &[Issue], severity: Severity, needle: &str) -> bool {
        issues
            .iter()
            .any(|i| i.severity == severity && i.message.contains(needle))
    }

    const CLEAN_PAGE: &str = r#"<!DOCTYPE html><html><head>
        <title>TechnoFlash - AI tools and tech articles</title>
        <meta name="description" content="Guides, reviews and an AI tools directory, updated by the TechnoFlash editorial team.">
        </head><body><h1>Latest articles</h1>
        <img src="hero.png" alt="Hero illustration">
        </body></html>"#;

    #[test]
    fn clean_page_has_no_issues() {
        assert!(classify(CLEAN_PAGE).is_empty());
    }

    #[test]
    fn missing_title_is_always_critical() {
        let issues = classify("<html><head></head><body><h1>x</h1></body></html>");
        assert!(has(&issues, Severity::Critical, "Missing <title>"));

        // An empty title counts as missing too
        let issues = classify("<html><head><title> </title></head><body></body></html>");
        assert!(has(&issues, Severity::Critical, "Missing <title>"));
    }

    #[test]
    fn short_title_is_high_severity() {
        let issues =
            classify("<html><head><title>Home</title></head><body><h1>x</h1></body></html>");
        assert!(has(&issues, Severity::High, "Title too short"));
        assert!(!has(&issues, Severity::Critical, "Missing <title>"));
    }

    #[test]
    fn length_thresholds_count_characters_not_bytes() {
        // 5 characters, 10 bytes: must still read as a too-short title
        let issues =
            classify("<html><head><title>تقنية</title></head><body><h1>x</h1></body></html>");
        assert!(has(&issues, Severity::High, "Title too short (5 chars)"));

        // 40 characters of 2-byte script stays within the 10..=60 range
        let long_enough = "تقنية".repeat(8);
        let issues = classify(&format!(
            "<html><head><title>{long_enough}</title></head><body><h1>x</h1></body></html>"
        ));
        assert!(!has(&issues, Severity::High, "Title too short"));
        assert!(!has(&issues, Severity::Medium, "Title too long"));

        // 96 characters of multibyte meta description clears the 50-char floor
        let desc = "موسوعة".repeat(8);
        let issues = classify(&format!(
            r#"<html><head><title>A perfectly fine title</title>
               <meta name="description" content="{desc}{desc}"></head>
               <body><h1>x</h1></body></html>"#
        ));
        assert!(!has(&issues, Severity::Medium, "Meta description too short"));
    }

    #[test]
    fn heading_structure_findings() {
        let issues = classify(
            "<html><head><title>A perfectly fine title</title></head><body><p>no heading</p></body></html>",
        );
        assert!(has(&issues, Severity::High, "Missing <h1>"));

        let issues = classify(
            "<html><head><title>A perfectly fine title</title></head><body><h1>a</h1><h1>b</h1></body></html>",
        );
        assert!(has(&issues, Severity::Medium, "Multiple <h1>"));
    }

    #[test]
    fn images_without_alt_are_counted_once() {
        let issues = classify(
            r#"<html><head><title>A perfectly fine title</title></head>
               <body><h1>x</h1><img src="a.png"><img src="b.png" alt=""><img src="c.png" alt="ok"></body></html>"#,
        );
        assert!(has(&issues, Severity::Medium, "2 images without alt text"));
    }

    #[test]
    fn missing_security_headers_are_low_severity() {
        let headers = HeaderMap::new();
        let issues = inspect_headers(&headers);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.severity == Severity::Low));

        let mut headers = HeaderMap::new();
        headers.insert("x-frame-options", "DENY".parse().unwrap());
        assert_eq!(inspect_headers(&headers).len(), 2);
    }
}
