use serde::Deserialize;
use std::fs;
use tf_core::error::{CmsError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub sitecheck: SitecheckConfig,
}

#[derive(Debug, Deserialize)]
pub struct SitecheckConfig {
    pub base_url: String,
    pub paths: Vec<String>,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_report_path")]
    pub report_path: String,
}

fn default_delay_ms() -> u64 {
    500
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_report_path() -> String {
    "sitecheck-report.json".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            CmsError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;

        let config: Config = toml::from_str(&config_content)
            .map_err(|e| CmsError::Config(format!("Invalid config file '{}': {}", path, e)))?;
        Ok(config)
    }
}

impl SitecheckConfig {
    /// The fixed list of URLs to check, resolved against the base URL.
    pub fn urls(&self) -> Vec<String> {
        self.paths
            .iter()
            .map(|p| {
                if p.starts_with("http://") || p.starts_with("https://") {
                    p.clone()
                } else {
                    format!(
                        "{}/{}",
                        self.base_url.trim_end_matches('/'),
                        p.trim_start_matches('/')
                    )
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_paths() {
        let cfg = SitecheckConfig {
            base_url: "https://technoflash.example/".to_string(),
            paths: vec![
                "/".to_string(),
                "articles".to_string(),
                "https://other.example/page".to_string(),
            ],
            delay_ms: 0,
            timeout_seconds: 5,
            report_path: "out.json".to_string(),
        };
        let urls = cfg.urls();
        assert_eq!(urls[0], "https://technoflash.example/");
        assert_eq!(urls[1], "https://technoflash.example/articles");
        assert_eq!(urls[2], "https://other.example/page");
    }
}
