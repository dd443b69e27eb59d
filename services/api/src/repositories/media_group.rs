//! Media group repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

use super::media_item::{group_from_row, item_from_row};
use crate::models::{
    CreateMediaGroupRequest, MediaGroupQuery, MediaGroupRecord, MediaItemGroupRecord,
    UpdateMediaGroupRequest, effective_limit, effective_page,
};

/// Media group repository for database operations
#[derive(Clone)]
pub struct MediaGroupRepository {
    pool: PgPool,
}

impl MediaGroupRepository {
    /// Create a new media group repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a media group exists
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM media_groups WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Get a media group by ID with its item join rows loaded
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<MediaGroupRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description
            FROM media_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut group = group_from_row(&row);
        group.item_links = Some(self.load_item_links(id).await?);

        Ok(Some(group))
    }

    /// Get media groups with pagination
    pub async fn list(&self, query: &MediaGroupQuery) -> Result<(Vec<MediaGroupRecord>, i64)> {
        let page = effective_page(query.page);
        let limit = effective_limit(query.limit);
        let offset = (page - 1) as i64 * limit as i64;

        let rows = sqlx::query(
            r#"
            SELECT id, name, description
            FROM media_groups
            ORDER BY name
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media_groups")
            .fetch_one(&self.pool)
            .await?;

        let mut groups: Vec<MediaGroupRecord> = rows.iter().map(group_from_row).collect();
        self.attach_item_links(&mut groups).await?;

        Ok((groups, total))
    }

    /// Create a media group
    pub async fn create(&self, request: &CreateMediaGroupRequest) -> Result<MediaGroupRecord> {
        let row = sqlx::query(
            r#"
            INSERT INTO media_groups (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(&request.name)
        .bind(request.description.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let mut group = group_from_row(&row);
        group.item_links = Some(Vec::new());

        Ok(group)
    }

    /// Apply a partial update to a media group
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateMediaGroupRequest,
    ) -> Result<Option<MediaGroupRecord>> {
        let row = sqlx::query(
            r#"
            UPDATE media_groups
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.description.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut group = group_from_row(&row);
        group.item_links = Some(self.load_item_links(id).await?);

        Ok(Some(group))
    }

    /// Delete a media group, returning whether a row was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Add a media item to a group; idempotent for an existing link
    pub async fn add_item(&self, group_id: Uuid, item_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO media_item_groups (media_item_id, media_group_id)
            VALUES ($1, $2)
            ON CONFLICT (media_item_id, media_group_id) DO NOTHING
            "#,
        )
        .bind(item_id)
        .bind(group_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a media item from a group, returning whether a link existed
    pub async fn remove_item(&self, group_id: Uuid, item_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM media_item_groups WHERE media_item_id = $1 AND media_group_id = $2",
        )
        .bind(item_id)
        .bind(group_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load the item join rows of a single media group
    async fn load_item_links(&self, group_id: Uuid) -> Result<Vec<MediaItemGroupRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.name, i.platform, i.external_id, i.created_at, i.updated_at
            FROM media_items i
            JOIN media_item_groups j ON j.media_item_id = i.id
            WHERE j.media_group_id = $1
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| MediaItemGroupRecord {
                item: Some(Box::new(item_from_row(row))),
                group: None,
            })
            .collect())
    }

    /// Load item join rows for a whole page of groups in one query
    async fn attach_item_links(&self, groups: &mut [MediaGroupRecord]) -> Result<()> {
        let ids: Vec<Uuid> = groups.iter().filter_map(|group| group.id).collect();

        if ids.is_empty() {
            for group in groups.iter_mut() {
                group.item_links = Some(Vec::new());
            }
            return Ok(());
        }

        let rows = sqlx::query(
            r#"
            SELECT j.media_group_id, i.id, i.name, i.platform, i.external_id,
                   i.created_at, i.updated_at
            FROM media_item_groups j
            JOIN media_items i ON i.id = j.media_item_id
            WHERE j.media_group_id = ANY($1)
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_group: HashMap<Uuid, Vec<MediaItemGroupRecord>> = HashMap::new();
        for row in &rows {
            let group_id: Uuid = row.get("media_group_id");
            by_group.entry(group_id).or_default().push(MediaItemGroupRecord {
                item: Some(Box::new(item_from_row(row))),
                group: None,
            });
        }

        for group in groups.iter_mut() {
            let links = group
                .id
                .and_then(|id| by_group.remove(&id))
                .unwrap_or_default();
            group.item_links = Some(links);
        }

        Ok(())
    }
}
