use crate::domain::*;
use crate::error::{CmsError, Result};
use crate::storage::traits::{Storage, TitleFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// In-memory storage implementation for development/testing
#[derive(Default)]
pub struct InMemoryStorage {
    articles: Arc<Mutex<HashMap<Uuid, Article>>>,
    ai_tools: Arc<Mutex<HashMap<Uuid, AiTool>>>,
    advertisements: Arc<Mutex<HashMap<Uuid, Advertisement>>>,
    legacy_ads: Arc<Mutex<HashMap<Uuid, LegacyAd>>>,
    pages: Arc<Mutex<HashMap<Uuid, Page>>>,
    services: Arc<Mutex<HashMap<Uuid, Service>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a legacy ad row directly; only the migration path reads these.
    pub fn insert_legacy_ad(&self, mut ad: LegacyAd) -> Uuid {
        let id = ad.id.unwrap_or_else(Uuid::new_v4);
        ad.id = Some(id);
        self.legacy_ads.lock().unwrap().insert(id, ad);
        id
    }

    fn mutate_ad<F>(&self, id: Uuid, f: F) -> Result<Advertisement>
    where
        F: FnOnce(&mut Advertisement),
    {
        let mut ads = self.advertisements.lock().unwrap();
        let ad = ads
            .get_mut(&id)
            .ok_or_else(|| CmsError::NotFound(format!("advertisement {id}")))?;
        f(ad);
        ad.updated_at = Utc::now();
        Ok(ad.clone())
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_article(&self, article: &mut Article) -> Result<()> {
        let id = Uuid::new_v4();
        article.id = Some(id);
        self.articles.lock().unwrap().insert(id, article.clone());
        debug!("Created article: {} with id {}", article.title, id);
        Ok(())
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
        Ok(self.articles.lock().unwrap().get(&id).cloned())
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let articles = self.articles.lock().unwrap();
        Ok(articles.values().find(|a| a.slug == slug).cloned())
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let mut rows: Vec<Article> =
            self.articles.lock().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_article(&self, article: &Article) -> Result<()> {
        let id = article
            .id
            .ok_or_else(|| CmsError::MissingField("article.id".to_string()))?;
        let mut articles = self.articles.lock().unwrap();
        if !articles.contains_key(&id) {
            return Err(CmsError::NotFound(format!("article {id}")));
        }
        articles.insert(id, article.clone());
        Ok(())
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool> {
        Ok(self.articles.lock().unwrap().remove(&id).is_some())
    }

    async fn create_ai_tool(&self, tool: &mut AiTool) -> Result<()> {
        let id = Uuid::new_v4();
        tool.id = Some(id);
        self.ai_tools.lock().unwrap().insert(id, tool.clone());
        debug!("Created AI tool: {} with id {}", tool.name, id);
        Ok(())
    }

    async fn get_ai_tool(&self, id: Uuid) -> Result<Option<AiTool>> {
        Ok(self.ai_tools.lock().unwrap().get(&id).cloned())
    }

    async fn list_ai_tools(&self) -> Result<Vec<AiTool>> {
        let mut rows: Vec<AiTool> =
            self.ai_tools.lock().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_ai_tool(&self, tool: &AiTool) -> Result<()> {
        let id = tool
            .id
            .ok_or_else(|| CmsError::MissingField("ai_tool.id".to_string()))?;
        let mut tools = self.ai_tools.lock().unwrap();
        if !tools.contains_key(&id) {
            return Err(CmsError::NotFound(format!("ai_tool {id}")));
        }
        tools.insert(id, tool.clone());
        Ok(())
    }

    async fn delete_ai_tool(&self, id: Uuid) -> Result<bool> {
        Ok(self.ai_tools.lock().unwrap().remove(&id).is_some())
    }

    async fn create_advertisement(&self, ad: &mut Advertisement) -> Result<()> {
        let id = Uuid::new_v4();
        ad.id = Some(id);
        self.advertisements.lock().unwrap().insert(id, ad.clone());
        debug!("Created advertisement: {} with id {}", ad.title, id);
        Ok(())
    }

    async fn get_advertisement(&self, id: Uuid) -> Result<Option<Advertisement>> {
        Ok(self.advertisements.lock().unwrap().get(&id).cloned())
    }

    async fn list_advertisements(&self) -> Result<Vec<Advertisement>> {
        let mut rows: Vec<Advertisement> =
            self.advertisements.lock().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_advertisement(&self, ad: &Advertisement) -> Result<()> {
        let id = ad
            .id
            .ok_or_else(|| CmsError::MissingField("advertisement.id".to_string()))?;
        let mut ads = self.advertisements.lock().unwrap();
        if !ads.contains_key(&id) {
            return Err(CmsError::NotFound(format!("advertisement {id}")));
        }
        ads.insert(id, ad.clone());
        Ok(())
    }

    async fn delete_advertisement(&self, id: Uuid) -> Result<bool> {
        Ok(self.advertisements.lock().unwrap().remove(&id).is_some())
    }

    async fn toggle_ad_active(&self, id: Uuid) -> Result<Advertisement> {
        self.mutate_ad(id, |ad| ad.is_active = !ad.is_active)
    }

    async fn toggle_ad_paused(&self, id: Uuid) -> Result<Advertisement> {
        self.mutate_ad(id, |ad| ad.is_paused = !ad.is_paused)
    }

    async fn record_ad_view(&self, id: Uuid) -> Result<()> {
        self.mutate_ad(id, |ad| ad.view_count += 1)?;
        Ok(())
    }

    async fn record_ad_click(&self, id: Uuid) -> Result<()> {
        self.mutate_ad(id, |ad| ad.click_count += 1)?;
        Ok(())
    }

    async fn list_live_ads(
        &self,
        placement: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Advertisement>> {
        let ads = self.advertisements.lock().unwrap();
        Ok(ads
            .values()
            .filter(|ad| ad.placement == placement && ad.is_live(now))
            .cloned()
            .collect())
    }

    async fn delete_ads_by_title(
        &self,
        filters: &[TitleFilter],
    ) -> Result<Vec<Advertisement>> {
        let mut ads = self.advertisements.lock().unwrap();
        let doomed: Vec<Uuid> = ads
            .iter()
            .filter(|(_, ad)| filters.iter().any(|f| f.matches(&ad.title)))
            .map(|(id, _)| *id)
            .collect();
        let mut deleted = Vec::with_capacity(doomed.len());
        for id in doomed {
            if let Some(ad) = ads.remove(&id) {
                deleted.push(ad);
            }
        }
        Ok(deleted)
    }

    async fn recompute_ad_counters(&self) -> Result<usize> {
        let mut ads = self.advertisements.lock().unwrap();
        let mut changed = 0;
        for ad in ads.values_mut() {
            if ad.view_count < 0 || ad.click_count < 0 {
                ad.view_count = ad.view_count.max(0);
                ad.click_count = ad.click_count.max(0);
                ad.updated_at = Utc::now();
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn list_legacy_ads(&self) -> Result<Vec<LegacyAd>> {
        Ok(self.legacy_ads.lock().unwrap().values().cloned().collect())
    }

    async fn delete_legacy_ad(&self, id: Uuid) -> Result<bool> {
        Ok(self.legacy_ads.lock().unwrap().remove(&id).is_some())
    }

    async fn create_page(&self, page: &mut Page) -> Result<()> {
        let id = Uuid::new_v4();
        page.id = Some(id);
        self.pages.lock().unwrap().insert(id, page.clone());
        debug!("Created page: {} with id {}", page.page_key, id);
        Ok(())
    }

    async fn get_page(&self, id: Uuid) -> Result<Option<Page>> {
        Ok(self.pages.lock().unwrap().get(&id).cloned())
    }

    async fn get_page_by_key(&self, page_key: &str) -> Result<Option<Page>> {
        let pages = self.pages.lock().unwrap();
        Ok(pages.values().find(|p| p.page_key == page_key).cloned())
    }

    async fn list_pages(&self) -> Result<Vec<Page>> {
        let mut rows: Vec<Page> = self.pages.lock().unwrap().values().cloned().collect();
        rows.sort_by_key(|p| p.display_order);
        Ok(rows)
    }

    async fn update_page(&self, page: &Page) -> Result<()> {
        let id = page
            .id
            .ok_or_else(|| CmsError::MissingField("page.id".to_string()))?;
        let mut pages = self.pages.lock().unwrap();
        if !pages.contains_key(&id) {
            return Err(CmsError::NotFound(format!("page {id}")));
        }
        pages.insert(id, page.clone());
        Ok(())
    }

    async fn delete_page(&self, id: Uuid) -> Result<bool> {
        Ok(self.pages.lock().unwrap().remove(&id).is_some())
    }

    async fn create_service(&self, service: &mut Service) -> Result<()> {
        let id = Uuid::new_v4();
        service.id = Some(id);
        self.services.lock().unwrap().insert(id, service.clone());
        debug!("Created service: {} with id {}", service.name, id);
        Ok(())
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>> {
        Ok(self.services.lock().unwrap().get(&id).cloned())
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        let mut rows: Vec<Service> =
            self.services.lock().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_service(&self, service: &Service) -> Result<()> {
        let id = service
            .id
            .ok_or_else(|| CmsError::MissingField("service.id".to_string()))?;
        let mut services = self.services.lock().unwrap();
        if !services.contains_key(&id) {
            return Err(CmsError::NotFound(format!("service {id}")));
        }
        services.insert(id, service.clone());
        Ok(())
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool> {
        Ok(self.services.lock().unwrap().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ad(title: &str, placement: &str) -> Advertisement {
        let now = Utc::now();
        Advertisement {
            id: None,
            title: title.to_string(),
            ad_code: "<div>ad</div>".to_string(),
            ad_type: AdType::Html,
            placement: placement.to_string(),
            is_active: true,
            is_paused: false,
            view_count: 0,
            click_count: 0,
            start_date: None,
            end_date: None,
            width: None,
            height: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_get_round_trips() {
        let storage = InMemoryStorage::new();
        let mut ad = sample_ad("Header banner", "header");
        storage.create_advertisement(&mut ad).await.unwrap();
        let id = ad.id.expect("id assigned on create");

        let fetched = storage.get_advertisement(id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Header banner");
    }

    #[tokio::test]
    async fn toggling_paused_twice_restores_original_state() {
        let storage = InMemoryStorage::new();
        let mut ad = sample_ad("Sidebar", "sidebar");
        storage.create_advertisement(&mut ad).await.unwrap();
        let id = ad.id.unwrap();

        let once = storage.toggle_ad_paused(id).await.unwrap();
        assert!(once.is_paused);
        let twice = storage.toggle_ad_paused(id).await.unwrap();
        assert_eq!(twice.is_paused, ad.is_paused);
    }

    #[tokio::test]
    async fn delete_by_title_removes_exactly_the_matching_rows() {
        let storage = InMemoryStorage::new();
        for title in ["s", "test banner", "My Test Ad", "Production header"] {
            let mut ad = sample_ad(title, "header");
            storage.create_advertisement(&mut ad).await.unwrap();
        }

        let filters = vec![
            TitleFilter::Eq("s".to_string()),
            TitleFilter::Like("test".to_string()),
        ];
        let deleted = storage.delete_ads_by_title(&filters).await.unwrap();
        assert_eq!(deleted.len(), 3);

        let remaining = storage.list_advertisements().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Production header");
    }

    #[tokio::test]
    async fn live_ads_respect_placement_pause_and_window() {
        let storage = InMemoryStorage::new();
        let now = Utc::now();

        let mut live = sample_ad("Live", "sidebar");
        storage.create_advertisement(&mut live).await.unwrap();

        let mut wrong_slot = sample_ad("Wrong slot", "footer");
        storage.create_advertisement(&mut wrong_slot).await.unwrap();

        let mut paused = sample_ad("Paused", "sidebar");
        paused.is_paused = true;
        storage.create_advertisement(&mut paused).await.unwrap();

        let mut expired = sample_ad("Expired", "sidebar");
        expired.end_date = Some(now - chrono::Duration::days(1));
        storage.create_advertisement(&mut expired).await.unwrap();

        let live_ads = storage.list_live_ads("sidebar", now).await.unwrap();
        assert_eq!(live_ads.len(), 1);
        assert_eq!(live_ads[0].title, "Live");
    }

    #[tokio::test]
    async fn recompute_clamps_negative_counters_only() {
        let storage = InMemoryStorage::new();
        let mut broken = sample_ad("Broken", "header");
        broken.view_count = -5;
        storage.create_advertisement(&mut broken).await.unwrap();

        let mut fine = sample_ad("Fine", "header");
        fine.view_count = 10;
        storage.create_advertisement(&mut fine).await.unwrap();

        let changed = storage.recompute_ad_counters().await.unwrap();
        assert_eq!(changed, 1);

        let fixed = storage
            .get_advertisement(broken.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fixed.view_count, 0);
        let untouched = storage
            .get_advertisement(fine.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.view_count, 10);
    }

    #[tokio::test]
    async fn page_lookup_by_key() {
        let storage = InMemoryStorage::new();
        let now = Utc::now();
        let mut page = Page {
            id: None,
            page_key: "about".to_string(),
            title: "About us".to_string(),
            content: "TechnoFlash is a publishing site.".to_string(),
            meta_title: None,
            meta_description: None,
            display_order: 1,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        storage.create_page(&mut page).await.unwrap();

        let found = storage.get_page_by_key("about").await.unwrap();
        assert!(found.is_some());
        assert!(storage.get_page_by_key("missing").await.unwrap().is_none());
    }
}
