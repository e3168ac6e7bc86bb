use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    Free,
    Freemium,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiTool {
    pub id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub pricing: PricingTier,
    pub rating: Option<f64>,
    pub features: Vec<String>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Banner,
    Html,
    Video,
    Script,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: Option<Uuid>,
    pub title: String,
    pub ad_code: String,
    pub ad_type: AdType,
    pub placement: String,
    pub is_active: bool,
    pub is_paused: bool,
    pub view_count: i64,
    pub click_count: i64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Advertisement {
    /// Whether this ad should currently render in its placement: active,
    /// not paused, and inside the scheduling window when one is set.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active || self.is_paused {
            return false;
        }
        if let Some(start) = self.start_date {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if now > end {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: Option<Uuid>,
    pub page_key: String,
    pub title: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub display_order: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingType {
    Fixed,
    Hourly,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub pricing_type: PricingType,
    pub pricing_amount: Option<f64>,
    pub category: String,
    pub tags: Vec<String>,
    pub cta_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of the legacy `ads` table. Only read as migration input;
/// nothing else writes to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyAd {
    pub id: Option<Uuid>,
    pub name: String,
    pub ad_html: String,
    pub slot: String,
    pub enabled: bool,
    pub impressions: i64,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl LegacyAd {
    /// Map a legacy row onto the current advertisement shape. Legacy ads
    /// were all raw HTML snippets, so the type is always `Html`.
    pub fn into_advertisement(self) -> Advertisement {
        let now = Utc::now();
        Advertisement {
            id: None,
            title: self.name,
            ad_code: self.ad_html,
            ad_type: AdType::Html,
            placement: self.slot,
            is_active: self.enabled,
            is_paused: false,
            view_count: self.impressions,
            click_count: self.clicks,
            start_date: None,
            end_date: None,
            width: None,
            height: None,
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_ad() -> Advertisement {
        let now = Utc::now();
        Advertisement {
            id: Some(Uuid::new_v4()),
            title: "Sidebar banner".to_string(),
            ad_code: "<img src=\"banner.png\">".to_string(),
            ad_type: AdType::Banner,
            placement: "sidebar".to_string(),
            is_active: true,
            is_paused: false,
            view_count: 0,
            click_count: 0,
            start_date: None,
            end_date: None,
            width: Some(300),
            height: Some(250),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn ad_without_window_is_live_when_active() {
        let ad = base_ad();
        assert!(ad.is_live(Utc::now()));
    }

    #[test]
    fn paused_ad_is_never_live() {
        let mut ad = base_ad();
        ad.is_paused = true;
        assert!(!ad.is_live(Utc::now()));
    }

    #[test]
    fn ad_outside_schedule_window_is_not_live() {
        let now = Utc::now();
        let mut ad = base_ad();
        ad.start_date = Some(now + Duration::days(1));
        assert!(!ad.is_live(now));

        ad.start_date = None;
        ad.end_date = Some(now - Duration::days(1));
        assert!(!ad.is_live(now));
    }

    #[test]
    fn legacy_ad_maps_fields_onto_advertisement() {
        let legacy = LegacyAd {
            id: Some(Uuid::new_v4()),
            name: "Old footer ad".to_string(),
            ad_html: "<div>old</div>".to_string(),
            slot: "footer".to_string(),
            enabled: true,
            impressions: 42,
            clicks: 7,
            created_at: Utc::now(),
        };
        let ad = legacy.into_advertisement();
        assert_eq!(ad.title, "Old footer ad");
        assert_eq!(ad.ad_code, "<div>old</div>");
        assert_eq!(ad.placement, "footer");
        assert_eq!(ad.ad_type, AdType::Html);
        assert!(ad.is_active);
        assert!(!ad.is_paused);
        assert_eq!(ad.view_count, 42);
        assert_eq!(ad.click_count, 7);
        assert!(ad.id.is_none());
    }
}
