use crate::domain::*;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title filter used by the test-ad cleanup: either an exact title match
/// or a case-insensitive substring match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "op", content = "value")]
pub enum TitleFilter {
    Eq(String),
    Like(String),
}

impl TitleFilter {
    pub fn matches(&self, title: &str) -> bool {
        match self {
            TitleFilter::Eq(wanted) => title == wanted,
            TitleFilter::Like(needle) => {
                title.to_lowercase().contains(&needle.to_lowercase())
            }
        }
    }
}

/// Storage trait for all CMS entities. Create operations assign the id
/// back onto the passed-in value.
#[async_trait]
pub trait Storage: Send + Sync {
    // Article operations
    async fn create_article(&self, article: &mut Article) -> Result<()>;
    async fn get_article(&self, id: Uuid) -> Result<Option<Article>>;
    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>>;
    async fn list_articles(&self) -> Result<Vec<Article>>;
    async fn update_article(&self, article: &Article) -> Result<()>;
    async fn delete_article(&self, id: Uuid) -> Result<bool>;

    // AI tool operations
    async fn create_ai_tool(&self, tool: &mut AiTool) -> Result<()>;
    async fn get_ai_tool(&self, id: Uuid) -> Result<Option<AiTool>>;
    async fn list_ai_tools(&self) -> Result<Vec<AiTool>>;
    async fn update_ai_tool(&self, tool: &AiTool) -> Result<()>;
    async fn delete_ai_tool(&self, id: Uuid) -> Result<bool>;

    // Advertisement operations
    async fn create_advertisement(&self, ad: &mut Advertisement) -> Result<()>;
    async fn get_advertisement(&self, id: Uuid) -> Result<Option<Advertisement>>;
    async fn list_advertisements(&self) -> Result<Vec<Advertisement>>;
    async fn update_advertisement(&self, ad: &Advertisement) -> Result<()>;
    async fn delete_advertisement(&self, id: Uuid) -> Result<bool>;
    async fn toggle_ad_active(&self, id: Uuid) -> Result<Advertisement>;
    async fn toggle_ad_paused(&self, id: Uuid) -> Result<Advertisement>;
    async fn record_ad_view(&self, id: Uuid) -> Result<()>;
    async fn record_ad_click(&self, id: Uuid) -> Result<()>;
    /// Ads that should currently render in the given placement.
    async fn list_live_ads(
        &self,
        placement: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Advertisement>>;
    /// Delete ads whose titles match any filter; returns the deleted rows.
    async fn delete_ads_by_title(
        &self,
        filters: &[TitleFilter],
    ) -> Result<Vec<Advertisement>>;
    /// Clamp negative view/click counters to zero; returns rows changed.
    async fn recompute_ad_counters(&self) -> Result<usize>;

    // Legacy ads table (migration input only)
    async fn list_legacy_ads(&self) -> Result<Vec<LegacyAd>>;
    async fn delete_legacy_ad(&self, id: Uuid) -> Result<bool>;

    // Page operations
    async fn create_page(&self, page: &mut Page) -> Result<()>;
    async fn get_page(&self, id: Uuid) -> Result<Option<Page>>;
    async fn get_page_by_key(&self, page_key: &str) -> Result<Option<Page>>;
    async fn list_pages(&self) -> Result<Vec<Page>>;
    async fn update_page(&self, page: &Page) -> Result<()>;
    async fn delete_page(&self, id: Uuid) -> Result<bool>;

    // Service operations
    async fn create_service(&self, service: &mut Service) -> Result<()>;
    async fn get_service(&self, id: Uuid) -> Result<Option<Service>>;
    async fn list_services(&self) -> Result<Vec<Service>>;
    async fn update_service(&self, service: &Service) -> Result<()>;
    async fn delete_service(&self, id: Uuid) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_filter_matches_exact_title_only() {
        let f = TitleFilter::Eq("s".to_string());
        assert!(f.matches("s"));
        assert!(!f.matches("sidebar"));
        assert!(!f.matches("S"));
    }

    #[test]
    fn like_filter_is_case_insensitive_substring() {
        let f = TitleFilter::Like("test".to_string());
        assert!(f.matches("test ad"));
        assert!(f.matches("My TEST Banner"));
        assert!(!f.matches("production ad"));
    }
}
