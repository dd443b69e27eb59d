//! Media item repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{
    CreateMediaItemRequest, MediaGroupRecord, MediaItemGroupRecord, MediaItemQuery,
    MediaItemRecord, UpdateMediaItemRequest, effective_limit, effective_page,
};

/// Map a media item row into a raw record, without relations
pub(crate) fn item_from_row(row: &PgRow) -> MediaItemRecord {
    let platform: Option<String> = row.get("platform");

    MediaItemRecord {
        id: row.get("id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        name: row.get("name"),
        platform: platform.and_then(|p| p.parse().ok()),
        external_id: row.get("external_id"),
        group_links: None,
    }
}

/// Map a media group row into a raw record, without relations
pub(crate) fn group_from_row(row: &PgRow) -> MediaGroupRecord {
    MediaGroupRecord {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        item_links: None,
    }
}

/// Media item repository for database operations
#[derive(Clone)]
pub struct MediaItemRepository {
    pool: PgPool,
}

impl MediaItemRepository {
    /// Create a new media item repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a media item exists
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM media_items WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Get a media item by ID with its group join rows loaded
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<MediaItemRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, platform, external_id, created_at, updated_at
            FROM media_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut item = item_from_row(&row);
        item.group_links = Some(self.load_group_links(id).await?);

        Ok(Some(item))
    }

    /// Get media items with pagination and optional platform filtering
    pub async fn list(&self, query: &MediaItemQuery) -> Result<(Vec<MediaItemRecord>, i64)> {
        let page = effective_page(query.page);
        let limit = effective_limit(query.limit);
        let offset = (page - 1) as i64 * limit as i64;
        let platform = query.platform.map(|p| p.as_str());

        let rows = sqlx::query(
            r#"
            SELECT id, name, platform, external_id, created_at, updated_at
            FROM media_items
            WHERE ($1::text IS NULL OR platform = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(platform)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM media_items WHERE ($1::text IS NULL OR platform = $1)",
        )
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;

        let mut items: Vec<MediaItemRecord> = rows.iter().map(item_from_row).collect();
        self.attach_group_links(&mut items).await?;

        Ok((items, total))
    }

    /// Create a media item
    pub async fn create(&self, request: &CreateMediaItemRequest) -> Result<MediaItemRecord> {
        let row = sqlx::query(
            r#"
            INSERT INTO media_items (name, platform, external_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, platform, external_id, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(request.platform.as_str())
        .bind(&request.external_id)
        .fetch_one(&self.pool)
        .await?;

        let mut item = item_from_row(&row);
        item.group_links = Some(Vec::new());

        Ok(item)
    }

    /// Apply a partial update to a media item
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateMediaItemRequest,
    ) -> Result<Option<MediaItemRecord>> {
        let row = sqlx::query(
            r#"
            UPDATE media_items
            SET name = COALESCE($2, name),
                platform = COALESCE($3, platform),
                external_id = COALESCE($4, external_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, platform, external_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.platform.map(|p| p.as_str()))
        .bind(request.external_id.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut item = item_from_row(&row);
        item.group_links = Some(self.load_group_links(id).await?);

        Ok(Some(item))
    }

    /// Delete a media item, returning whether a row was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load the group join rows of a single media item
    async fn load_group_links(&self, item_id: Uuid) -> Result<Vec<MediaItemGroupRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.name, g.description
            FROM media_groups g
            JOIN media_item_groups j ON j.media_group_id = g.id
            WHERE j.media_item_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| MediaItemGroupRecord {
                item: None,
                group: Some(Box::new(group_from_row(row))),
            })
            .collect())
    }

    /// Load group join rows for a whole page of items in one query
    async fn attach_group_links(&self, items: &mut [MediaItemRecord]) -> Result<()> {
        let ids: Vec<Uuid> = items.iter().filter_map(|item| item.id).collect();

        if ids.is_empty() {
            for item in items.iter_mut() {
                item.group_links = Some(Vec::new());
            }
            return Ok(());
        }

        let rows = sqlx::query(
            r#"
            SELECT j.media_item_id, g.id, g.name, g.description
            FROM media_item_groups j
            JOIN media_groups g ON g.id = j.media_group_id
            WHERE j.media_item_id = ANY($1)
            ORDER BY g.name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_item: HashMap<Uuid, Vec<MediaItemGroupRecord>> = HashMap::new();
        for row in &rows {
            let item_id: Uuid = row.get("media_item_id");
            by_item.entry(item_id).or_default().push(MediaItemGroupRecord {
                item: None,
                group: Some(Box::new(group_from_row(row))),
            });
        }

        for item in items.iter_mut() {
            let links = item
                .id
                .and_then(|id| by_item.remove(&id))
                .unwrap_or_default();
            item.group_links = Some(links);
        }

        Ok(())
    }
}
