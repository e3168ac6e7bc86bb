use chrono::{DateTime, Utc};
use serde::Deserialize;
use tf_core::domain::*;
use tf_core::error::{CmsError, Result};

/// Slug derivation for rows created without one. Uniqueness is assumed,
/// not enforced.
pub fn create_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '-',
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CmsError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    pub status: Option<ContentStatus>,
}

impl CreateArticleRequest {
    pub fn into_article(self) -> Result<Article> {
        require("title", &self.title)?;
        require("content", &self.content)?;
        let now = Utc::now();
        Ok(Article {
            id: None,
            slug: self.slug.unwrap_or_else(|| create_slug(&self.title)),
            title: self.title,
            content: self.content,
            tags: self.tags,
            author: self.author,
            status: self.status.unwrap_or(ContentStatus::Draft),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
    pub status: Option<ContentStatus>,
}

impl UpdateArticleRequest {
    pub fn apply(self, article: &mut Article) -> Result<()> {
        if let Some(title) = self.title {
            require("title", &title)?;
            article.title = title;
        }
        if let Some(content) = self.content {
            require("content", &content)?;
            article.content = content;
        }
        if let Some(slug) = self.slug {
            article.slug = slug;
        }
        if let Some(tags) = self.tags {
            article.tags = tags;
        }
        if let Some(author) = self.author {
            article.author = author;
        }
        if let Some(status) = self.status {
            article.status = status;
        }
        article.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAiToolRequest {
    pub name: String,
    pub slug: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub pricing: Option<PricingTier>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub features: Vec<String>,
    pub status: Option<ContentStatus>,
}

impl CreateAiToolRequest {
    pub fn into_tool(self) -> Result<AiTool> {
        require("name", &self.name)?;
        require("category", &self.category)?;
        let now = Utc::now();
        Ok(AiTool {
            id: None,
            slug: self.slug.unwrap_or_else(|| create_slug(&self.name)),
            name: self.name,
            category: self.category,
            description: self.description,
            website_url: self.website_url,
            logo_url: self.logo_url,
            pricing: self.pricing.unwrap_or(PricingTier::Free),
            rating: self.rating,
            features: self.features,
            status: self.status.unwrap_or(ContentStatus::Draft),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAiToolRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub pricing: Option<PricingTier>,
    pub rating: Option<f64>,
    pub features: Option<Vec<String>>,
    pub status: Option<ContentStatus>,
}

impl UpdateAiToolRequest {
    pub fn apply(self, tool: &mut AiTool) -> Result<()> {
        if let Some(name) = self.name {
            require("name", &name)?;
            tool.name = name;
        }
        if let Some(slug) = self.slug {
            tool.slug = slug;
        }
        if let Some(category) = self.category {
            tool.category = category;
        }
        if let Some(description) = self.description {
            tool.description = Some(description);
        }
        if let Some(website_url) = self.website_url {
            tool.website_url = Some(website_url);
        }
        if let Some(logo_url) = self.logo_url {
            tool.logo_url = Some(logo_url);
        }
        if let Some(pricing) = self.pricing {
            tool.pricing = pricing;
        }
        if let Some(rating) = self.rating {
            tool.rating = Some(rating);
        }
        if let Some(features) = self.features {
            tool.features = features;
        }
        if let Some(status) = self.status {
            tool.status = status;
        }
        tool.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAdRequest {
    pub title: String,
    pub ad_code: String,
    pub ad_type: AdType,
    pub placement: String,
    #[serde(default)]
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl CreateAdRequest {
    pub fn into_ad(self) -> Result<Advertisement> {
        require("title", &self.title)?;
        require("ad_code", &self.ad_code)?;
        require("placement", &self.placement)?;
        let now = Utc::now();
        Ok(Advertisement {
            id: None,
            title: self.title,
            ad_code: self.ad_code,
            ad_type: self.ad_type,
            placement: self.placement,
            is_active: self.is_active,
            is_paused: false,
            view_count: 0,
            click_count: 0,
            start_date: self.start_date,
            end_date: self.end_date,
            width: self.width,
            height: self.height,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdRequest {
    pub title: Option<String>,
    pub ad_code: Option<String>,
    pub ad_type: Option<AdType>,
    pub placement: Option<String>,
    pub is_active: Option<bool>,
    pub is_paused: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl UpdateAdRequest {
    pub fn apply(self, ad: &mut Advertisement) -> Result<()> {
        if let Some(title) = self.title {
            require("title", &title)?;
            ad.title = title;
        }
        if let Some(ad_code) = self.ad_code {
            require("ad_code", &ad_code)?;
            ad.ad_code = ad_code;
        }
        if let Some(ad_type) = self.ad_type {
            ad.ad_type = ad_type;
        }
        if let Some(placement) = self.placement {
            ad.placement = placement;
        }
        if let Some(is_active) = self.is_active {
            ad.is_active = is_active;
        }
        if let Some(is_paused) = self.is_paused {
            ad.is_paused = is_paused;
        }
        if self.start_date.is_some() {
            ad.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            ad.end_date = self.end_date;
        }
        if self.width.is_some() {
            ad.width = self.width;
        }
        if self.height.is_some() {
            ad.height = self.height;
        }
        ad.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub page_key: String,
    pub title: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_published: bool,
}

impl CreatePageRequest {
    pub fn into_page(self) -> Result<Page> {
        require("page_key", &self.page_key)?;
        require("title", &self.title)?;
        require("content", &self.content)?;
        let now = Utc::now();
        Ok(Page {
            id: None,
            page_key: self.page_key,
            title: self.title,
            content: self.content,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            display_order: self.display_order,
            is_published: self.is_published,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub display_order: Option<i32>,
    pub is_published: Option<bool>,
}

impl UpdatePageRequest {
    pub fn apply(self, page: &mut Page) -> Result<()> {
        if let Some(title) = self.title {
            require("title", &title)?;
            page.title = title;
        }
        if let Some(content) = self.content {
            require("content", &content)?;
            page.content = content;
        }
        if self.meta_title.is_some() {
            page.meta_title = self.meta_title;
        }
        if self.meta_description.is_some() {
            page.meta_description = self.meta_description;
        }
        if let Some(display_order) = self.display_order {
            page.display_order = display_order;
        }
        if let Some(is_published) = self.is_published {
            page.is_published = is_published;
        }
        page.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: String,
    pub pricing_type: PricingType,
    pub pricing_amount: Option<f64>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cta_link: Option<String>,
}

impl CreateServiceRequest {
    pub fn into_service(self) -> Result<Service> {
        require("name", &self.name)?;
        require("description", &self.description)?;
        let now = Utc::now();
        Ok(Service {
            id: None,
            name: self.name,
            description: self.description,
            pricing_type: self.pricing_type,
            pricing_amount: self.pricing_amount,
            category: self.category,
            tags: self.tags,
            cta_link: self.cta_link,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pricing_type: Option<PricingType>,
    pub pricing_amount: Option<f64>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cta_link: Option<String>,
}

impl UpdateServiceRequest {
    pub fn apply(self, service: &mut Service) -> Result<()> {
        if let Some(name) = self.name {
            require("name", &name)?;
            service.name = name;
        }
        if let Some(description) = self.description {
            require("description", &description)?;
            service.description = description;
        }
        if let Some(pricing_type) = self.pricing_type {
            service.pricing_type = pricing_type;
        }
        if self.pricing_amount.is_some() {
            service.pricing_amount = self.pricing_amount;
        }
        if let Some(category) = self.category {
            service.category = category;
        }
        if let Some(tags) = self.tags {
            service.tags = tags;
        }
        if self.cta_link.is_some() {
            service.cta_link = self.cta_link;
        }
        service.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_derivation_matches_the_site_convention() {
        assert_eq!(create_slug("ChatGPT 4 Turbo!"), "chatgpt-4-turbo");
        assert_eq!(create_slug("  Hello -- World  "), "hello-world");
    }

    #[test]
    fn article_create_requires_title_and_content() {
        let req = CreateArticleRequest {
            title: "  ".to_string(),
            slug: None,
            content: "body".to_string(),
            tags: vec![],
            author: "ed".to_string(),
            status: None,
        };
        assert!(req.into_article().is_err());

        let req = CreateArticleRequest {
            title: "A headline".to_string(),
            slug: None,
            content: "body".to_string(),
            tags: vec![],
            author: "ed".to_string(),
            status: None,
        };
        let article = req.into_article().unwrap();
        assert_eq!(article.slug, "a-headline");
        assert_eq!(article.status, ContentStatus::Draft);
    }
}
