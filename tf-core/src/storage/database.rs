use crate::database::DatabaseManager;
use crate::domain::*;
use crate::error::{CmsError, Result};
use crate::storage::traits::{Storage, TitleFilter};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Storage implementation backed by the hosted libSQL database. Lookup
/// columns stay relational; the full row travels as a JSON document.
pub struct DatabaseStorage {
    db: Arc<DatabaseManager>,
}

impl DatabaseStorage {
    pub async fn new() -> Result<Self> {
        let db_manager = DatabaseManager::new().await?;
        db_manager.run_migrations().await?;

        Ok(Self {
            db: Arc::new(db_manager),
        })
    }

    fn encode<T: Serialize>(what: &str, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| CmsError::Database {
            message: format!("Failed to serialize {what}: {e}"),
        })
    }

    fn decode<T: DeserializeOwned>(what: &str, data: &str) -> Result<T> {
        serde_json::from_str(data).map_err(|e| CmsError::Database {
            message: format!("Failed to deserialize {what}: {e}"),
        })
    }

    async fn execute(&self, sql: &str, params: impl libsql::params::IntoParams) -> Result<u64> {
        let conn = self.db.get_connection()?;
        conn.execute(sql, params)
            .await
            .map_err(|e| CmsError::Database {
                message: format!("Query failed: {e}"),
            })
    }

    async fn query_data_rows(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<String>> {
        let conn = self.db.get_connection()?;
        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| CmsError::Database {
                message: format!("Query failed: {e}"),
            })?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await.map_err(|e| CmsError::Database {
            message: format!("Failed to read row: {e}"),
        })? {
            let data: String = row.get(0).map_err(|e| CmsError::Database {
                message: format!("Failed to get data column: {e}"),
            })?;
            out.push(data);
        }
        Ok(out)
    }

    async fn get_one<T: DeserializeOwned>(
        &self,
        what: &str,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Option<T>> {
        let rows = self.query_data_rows(sql, params).await?;
        match rows.first() {
            Some(data) => Ok(Some(Self::decode(what, data)?)),
            None => Ok(None),
        }
    }

    async fn get_all<T: DeserializeOwned>(
        &self,
        what: &str,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<T>> {
        let rows = self.query_data_rows(sql, params).await?;
        rows.iter().map(|data| Self::decode(what, data)).collect()
    }
}

/// Legacy `ads` rows predate the JSON layout, so their timestamps can be
/// either SQLite's `datetime('now')` format or RFC 3339.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    Utc::now()
}

fn legacy_ad_from_row(row: &libsql::Row) -> Result<LegacyAd> {
    fn field(e: libsql::Error) -> CmsError {
        CmsError::Database {
            message: format!("Failed to read legacy ad column: {e}"),
        }
    }
    let id: String = row.get(0).map_err(field)?;
    let name: String = row.get(1).map_err(field)?;
    let ad_html: String = row.get(2).map_err(field)?;
    let slot: String = row.get(3).map_err(field)?;
    let enabled: i64 = row.get(4).map_err(field)?;
    let impressions: i64 = row.get(5).map_err(field)?;
    let clicks: i64 = row.get(6).map_err(field)?;
    let created_at: String = row.get(7).map_err(field)?;

    Ok(LegacyAd {
        id: Some(Uuid::parse_str(&id).map_err(|e| CmsError::Database {
            message: format!("Invalid legacy ad UUID: {e}"),
        })?),
        name,
        ad_html,
        slot,
        enabled: enabled != 0,
        impressions,
        clicks,
        created_at: parse_timestamp(&created_at),
    })
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn create_article(&self, article: &mut Article) -> Result<()> {
        let id = Uuid::new_v4();
        article.id = Some(id);
        let data = Self::encode("article", article)?;
        self.execute(
            "INSERT INTO articles (id, slug, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                id.to_string(),
                article.slug.clone(),
                data,
                article.created_at.to_rfc3339(),
                article.updated_at.to_rfc3339()
            ],
        )
        .await?;
        debug!("Created article {} ({})", article.title, id);
        Ok(())
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
        self.get_one(
            "article",
            "SELECT data FROM articles WHERE id = ?",
            libsql::params![id.to_string()],
        )
        .await
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        self.get_one(
            "article",
            "SELECT data FROM articles WHERE slug = ?",
            libsql::params![slug],
        )
        .await
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        self.get_all(
            "article",
            "SELECT data FROM articles ORDER BY created_at DESC",
            (),
        )
        .await
    }

    async fn update_article(&self, article: &Article) -> Result<()> {
        let id = article
            .id
            .ok_or_else(|| CmsError::MissingField("article.id".to_string()))?;
        let data = Self::encode("article", article)?;
        let changed = self
            .execute(
                "UPDATE articles SET slug = ?, data = ?, updated_at = ? WHERE id = ?",
                libsql::params![
                    article.slug.clone(),
                    data,
                    article.updated_at.to_rfc3339(),
                    id.to_string()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(CmsError::NotFound(format!("article {id}")));
        }
        Ok(())
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .execute(
                "DELETE FROM articles WHERE id = ?",
                libsql::params![id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    async fn create_ai_tool(&self, tool: &mut AiTool) -> Result<()> {
        let id = Uuid::new_v4();
        tool.id = Some(id);
        let data = Self::encode("ai_tool", tool)?;
        self.execute(
            "INSERT INTO ai_tools (id, slug, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                id.to_string(),
                tool.slug.clone(),
                data,
                tool.created_at.to_rfc3339(),
                tool.updated_at.to_rfc3339()
            ],
        )
        .await?;
        debug!("Created AI tool {} ({})", tool.name, id);
        Ok(())
    }

    async fn get_ai_tool(&self, id: Uuid) -> Result<Option<AiTool>> {
        self.get_one(
            "ai_tool",
            "SELECT data FROM ai_tools WHERE id = ?",
            libsql::params![id.to_string()],
        )
        .await
    }

    async fn list_ai_tools(&self) -> Result<Vec<AiTool>> {
        self.get_all("ai_tool", "SELECT data FROM ai_tools ORDER BY slug", ())
            .await
    }

    async fn update_ai_tool(&self, tool: &AiTool) -> Result<()> {
        let id = tool
            .id
            .ok_or_else(|| CmsError::MissingField("ai_tool.id".to_string()))?;
        let data = Self::encode("ai_tool", tool)?;
        let changed = self
            .execute(
                "UPDATE ai_tools SET slug = ?, data = ?, updated_at = ? WHERE id = ?",
                libsql::params![
                    tool.slug.clone(),
                    data,
                    tool.updated_at.to_rfc3339(),
                    id.to_string()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(CmsError::NotFound(format!("ai_tool {id}")));
        }
        Ok(())
    }

    async fn delete_ai_tool(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .execute(
                "DELETE FROM ai_tools WHERE id = ?",
                libsql::params![id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    async fn create_advertisement(&self, ad: &mut Advertisement) -> Result<()> {
        let id = Uuid::new_v4();
        ad.id = Some(id);
        let data = Self::encode("advertisement", ad)?;
        self.execute(
            "INSERT INTO advertisements (id, title, placement, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
            libsql::params![
                id.to_string(),
                ad.title.clone(),
                ad.placement.clone(),
                data,
                ad.created_at.to_rfc3339(),
                ad.updated_at.to_rfc3339()
            ],
        )
        .await?;
        debug!("Created advertisement {} ({})", ad.title, id);
        Ok(())
    }

    async fn get_advertisement(&self, id: Uuid) -> Result<Option<Advertisement>> {
        self.get_one(
            "advertisement",
            "SELECT data FROM advertisements WHERE id = ?",
            libsql::params![id.to_string()],
        )
        .await
    }

    async fn list_advertisements(&self) -> Result<Vec<Advertisement>> {
        self.get_all(
            "advertisement",
            "SELECT data FROM advertisements ORDER BY created_at DESC",
            (),
        )
        .await
    }

    async fn update_advertisement(&self, ad: &Advertisement) -> Result<()> {
        let id = ad
            .id
            .ok_or_else(|| CmsError::MissingField("advertisement.id".to_string()))?;
        let data = Self::encode("advertisement", ad)?;
        let changed = self
            .execute(
                "UPDATE advertisements SET title = ?, placement = ?, data = ?, updated_at = ? WHERE id = ?",
                libsql::params![
                    ad.title.clone(),
                    ad.placement.clone(),
                    data,
                    ad.updated_at.to_rfc3339(),
                    id.to_string()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(CmsError::NotFound(format!("advertisement {id}")));
        }
        Ok(())
    }

    async fn delete_advertisement(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .execute(
                "DELETE FROM advertisements WHERE id = ?",
                libsql::params![id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    async fn toggle_ad_active(&self, id: Uuid) -> Result<Advertisement> {
        let mut ad = self
            .get_advertisement(id)
            .await?
            .ok_or_else(|| CmsError::NotFound(format!("advertisement {id}")))?;
        ad.is_active = !ad.is_active;
        ad.updated_at = Utc::now();
        self.update_advertisement(&ad).await?;
        Ok(ad)
    }

    async fn toggle_ad_paused(&self, id: Uuid) -> Result<Advertisement> {
        let mut ad = self
            .get_advertisement(id)
            .await?
            .ok_or_else(|| CmsError::NotFound(format!("advertisement {id}")))?;
        ad.is_paused = !ad.is_paused;
        ad.updated_at = Utc::now();
        self.update_advertisement(&ad).await?;
        Ok(ad)
    }

    async fn record_ad_view(&self, id: Uuid) -> Result<()> {
        let mut ad = self
            .get_advertisement(id)
            .await?
            .ok_or_else(|| CmsError::NotFound(format!("advertisement {id}")))?;
        ad.view_count += 1;
        ad.updated_at = Utc::now();
        self.update_advertisement(&ad).await
    }

    async fn record_ad_click(&self, id: Uuid) -> Result<()> {
        let mut ad = self
            .get_advertisement(id)
            .await?
            .ok_or_else(|| CmsError::NotFound(format!("advertisement {id}")))?;
        ad.click_count += 1;
        ad.updated_at = Utc::now();
        self.update_advertisement(&ad).await
    }

    async fn list_live_ads(
        &self,
        placement: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Advertisement>> {
        let ads: Vec<Advertisement> = self
            .get_all(
                "advertisement",
                "SELECT data FROM advertisements WHERE placement = ?",
                libsql::params![placement],
            )
            .await?;
        Ok(ads.into_iter().filter(|ad| ad.is_live(now)).collect())
    }

    async fn delete_ads_by_title(
        &self,
        filters: &[TitleFilter],
    ) -> Result<Vec<Advertisement>> {
        let all = self.list_advertisements().await?;
        let mut deleted = Vec::new();
        for ad in all {
            if filters.iter().any(|f| f.matches(&ad.title)) {
                let id = ad.id.ok_or_else(|| CmsError::Database {
                    message: format!("advertisement '{}' has no id in its document", ad.title),
                })?;
                if self.delete_advertisement(id).await? {
                    deleted.push(ad);
                }
            }
        }
        info!("Deleted {} advertisements by title filter", deleted.len());
        Ok(deleted)
    }

    async fn recompute_ad_counters(&self) -> Result<usize> {
        let all = self.list_advertisements().await?;
        let mut changed = 0;
        for mut ad in all {
            if ad.view_count < 0 || ad.click_count < 0 {
                ad.view_count = ad.view_count.max(0);
                ad.click_count = ad.click_count.max(0);
                ad.updated_at = Utc::now();
                self.update_advertisement(&ad).await?;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn list_legacy_ads(&self) -> Result<Vec<LegacyAd>> {
        let conn = self.db.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT id, name, ad_html, slot, enabled, impressions, clicks, created_at FROM ads",
                (),
            )
            .await
            .map_err(|e| CmsError::Database {
                message: format!("Query failed: {e}"),
            })?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await.map_err(|e| CmsError::Database {
            message: format!("Failed to read row: {e}"),
        })? {
            out.push(legacy_ad_from_row(&row)?);
        }
        Ok(out)
    }

    async fn delete_legacy_ad(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .execute(
                "DELETE FROM ads WHERE id = ?",
                libsql::params![id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    async fn create_page(&self, page: &mut Page) -> Result<()> {
        let id = Uuid::new_v4();
        page.id = Some(id);
        let data = Self::encode("page", page)?;
        self.execute(
            "INSERT INTO pages (id, page_key, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                id.to_string(),
                page.page_key.clone(),
                data,
                page.created_at.to_rfc3339(),
                page.updated_at.to_rfc3339()
            ],
        )
        .await?;
        debug!("Created page {} ({})", page.page_key, id);
        Ok(())
    }

    async fn get_page(&self, id: Uuid) -> Result<Option<Page>> {
        self.get_one(
            "page",
            "SELECT data FROM pages WHERE id = ?",
            libsql::params![id.to_string()],
        )
        .await
    }

    async fn get_page_by_key(&self, page_key: &str) -> Result<Option<Page>> {
        self.get_one(
            "page",
            "SELECT data FROM pages WHERE page_key = ?",
            libsql::params![page_key],
        )
        .await
    }

    async fn list_pages(&self) -> Result<Vec<Page>> {
        let mut pages: Vec<Page> =
            self.get_all("page", "SELECT data FROM pages", ()).await?;
        pages.sort_by_key(|p| p.display_order);
        Ok(pages)
    }

    async fn update_page(&self, page: &Page) -> Result<()> {
        let id = page
            .id
            .ok_or_else(|| CmsError::MissingField("page.id".to_string()))?;
        let data = Self::encode("page", page)?;
        let changed = self
            .execute(
                "UPDATE pages SET page_key = ?, data = ?, updated_at = ? WHERE id = ?",
                libsql::params![
                    page.page_key.clone(),
                    data,
                    page.updated_at.to_rfc3339(),
                    id.to_string()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(CmsError::NotFound(format!("page {id}")));
        }
        Ok(())
    }

    async fn delete_page(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .execute(
                "DELETE FROM pages WHERE id = ?",
                libsql::params![id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    async fn create_service(&self, service: &mut Service) -> Result<()> {
        let id = Uuid::new_v4();
        service.id = Some(id);
        let data = Self::encode("service", service)?;
        self.execute(
            "INSERT INTO services (id, name, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                id.to_string(),
                service.name.clone(),
                data,
                service.created_at.to_rfc3339(),
                service.updated_at.to_rfc3339()
            ],
        )
        .await?;
        debug!("Created service {} ({})", service.name, id);
        Ok(())
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>> {
        self.get_one(
            "service",
            "SELECT data FROM services WHERE id = ?",
            libsql::params![id.to_string()],
        )
        .await
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        self.get_all("service", "SELECT data FROM services ORDER BY name", ())
            .await
    }

    async fn update_service(&self, service: &Service) -> Result<()> {
        let id = service
            .id
            .ok_or_else(|| CmsError::MissingField("service.id".to_string()))?;
        let data = Self::encode("service", service)?;
        let changed = self
            .execute(
                "UPDATE services SET name = ?, data = ?, updated_at = ? WHERE id = ?",
                libsql::params![
                    service.name.clone(),
                    data,
                    service.updated_at.to_rfc3339(),
                    id.to_string()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(CmsError::NotFound(format!("service {id}")));
        }
        Ok(())
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .execute(
                "DELETE FROM services WHERE id = ?",
                libsql::params![id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }
}
