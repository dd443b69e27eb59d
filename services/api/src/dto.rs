//! Response shaping for media entities
//!
//! Raw persistence records cross into client-safe response objects here.
//! Every semantically required field is checked before anything is
//! emitted, and the first missing field aborts the whole operation: a
//! partially populated object can never escape to a caller. A missing
//! field is an upstream invariant violation, so the error carries the
//! field name for the logs while the client only ever sees a generic
//! internal error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{MediaGroupRecord, MediaItemRecord, Platform};

/// Error raised when a record breaks the required-field invariant
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// A field the upstream query must always return was absent
    #[error("missing required field `{field}` on `{entity}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
}

/// Media item response object
#[derive(Debug, Clone, Serialize)]
pub struct MediaItemResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub platform: Platform,
    pub external_id: String,
    pub groups: Vec<MediaGroupResponse>,
}

/// Media group response object
#[derive(Debug, Clone, Serialize)]
pub struct MediaGroupResponse {
    pub id: Uuid,
    pub name: String,
    /// Optional free text; an absent description stays absent in the
    /// serialized response, it never becomes an empty string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub media_items: Vec<MediaItemResponse>,
}

/// Response for media item listing with pagination
#[derive(Debug, Clone, Serialize)]
pub struct MediaItemListResponse {
    pub items: Vec<MediaItemResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

/// Response for media group listing with pagination
#[derive(Debug, Clone, Serialize)]
pub struct MediaGroupListResponse {
    pub groups: Vec<MediaGroupResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

fn require<T>(
    value: Option<T>,
    entity: &'static str,
    field: &'static str,
) -> Result<T, ShapeError> {
    value.ok_or(ShapeError::MissingField { entity, field })
}

/// Shape a raw media item record into a response object.
///
/// The `groups` sequence carries one shaped group per join row, in join
/// order; an absent join collection yields an empty sequence.
pub fn shape_media_item(record: &MediaItemRecord) -> Result<MediaItemResponse, ShapeError> {
    const ENTITY: &str = "media_item";

    let id = require(record.id, ENTITY, "id")?;
    let created_at = require(record.created_at, ENTITY, "created_at")?;
    let updated_at = require(record.updated_at, ENTITY, "updated_at")?;
    let name = require(record.name.clone(), ENTITY, "name")?;
    let platform = require(record.platform, ENTITY, "platform")?;
    let external_id = require(record.external_id.clone(), ENTITY, "external_id")?;

    let groups = record
        .group_links
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|link| {
            let group = require(link.group.as_deref(), "media_item_group", "group")?;
            shape_media_group(group)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MediaItemResponse {
        id,
        created_at,
        updated_at,
        name,
        platform,
        external_id,
        groups,
    })
}

/// Shape a raw media group record into a response object.
///
/// `id` and `name` are required; `description` passes through as-is,
/// including when absent.
pub fn shape_media_group(record: &MediaGroupRecord) -> Result<MediaGroupResponse, ShapeError> {
    const ENTITY: &str = "media_group";

    let id = require(record.id, ENTITY, "id")?;
    let name = require(record.name.clone(), ENTITY, "name")?;

    let media_items = record
        .item_links
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|link| {
            let item = require(link.item.as_deref(), "media_item_group", "item")?;
            shape_media_item(item)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MediaGroupResponse {
        id,
        name,
        description: record.description.clone(),
        media_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaItemGroupRecord;

    fn item_record() -> MediaItemRecord {
        MediaItemRecord {
            id: Some(Uuid::new_v4()),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
            name: Some("Intro".to_string()),
            platform: Some(Platform::Youtube),
            external_id: Some("yt-123".to_string()),
            group_links: None,
        }
    }

    fn group_record() -> MediaGroupRecord {
        MediaGroupRecord {
            id: Some(Uuid::new_v4()),
            name: Some("Favorites".to_string()),
            description: Some("hand picked".to_string()),
            item_links: None,
        }
    }

    #[test]
    fn shapes_item_with_no_links_into_empty_groups() {
        let record = item_record();
        let shaped = shape_media_item(&record).expect("complete record should shape");

        assert_eq!(Some(shaped.id), record.id);
        assert_eq!(Some(shaped.name.as_str()), record.name.as_deref());
        assert_eq!(Some(shaped.platform), record.platform);
        assert_eq!(
            Some(shaped.external_id.as_str()),
            record.external_id.as_deref()
        );
        assert!(shaped.groups.is_empty());
    }

    #[test]
    fn absent_and_empty_link_collections_both_shape_to_empty() {
        let mut record = item_record();
        record.group_links = None;
        assert!(shape_media_item(&record).unwrap().groups.is_empty());

        record.group_links = Some(Vec::new());
        assert!(shape_media_item(&record).unwrap().groups.is_empty());
    }

    #[test]
    fn missing_required_item_field_aborts_with_field_name() {
        let mut record = item_record();
        record.name = None;
        assert_eq!(
            shape_media_item(&record).unwrap_err(),
            ShapeError::MissingField {
                entity: "media_item",
                field: "name"
            }
        );

        let mut record = item_record();
        record.id = None;
        assert_eq!(
            shape_media_item(&record).unwrap_err(),
            ShapeError::MissingField {
                entity: "media_item",
                field: "id"
            }
        );

        let mut record = item_record();
        record.platform = None;
        assert_eq!(
            shape_media_item(&record).unwrap_err(),
            ShapeError::MissingField {
                entity: "media_item",
                field: "platform"
            }
        );

        let mut record = item_record();
        record.updated_at = None;
        assert_eq!(
            shape_media_item(&record).unwrap_err(),
            ShapeError::MissingField {
                entity: "media_item",
                field: "updated_at"
            }
        );
    }

    #[test]
    fn item_with_one_group_link_shapes_nested_group() {
        let mut record = item_record();
        let mut group = group_record();
        group.item_links = None;
        record.group_links = Some(vec![MediaItemGroupRecord {
            item: None,
            group: Some(Box::new(group)),
        }]);

        let shaped = shape_media_item(&record).expect("record with link should shape");

        assert_eq!(shaped.groups.len(), 1);
        assert_eq!(shaped.groups[0].name, "Favorites");
        assert!(shaped.groups[0].media_items.is_empty());
    }

    #[test]
    fn group_link_count_matches_join_rows() {
        let mut record = item_record();
        let links = (0..3)
            .map(|_| MediaItemGroupRecord {
                item: None,
                group: Some(Box::new(group_record())),
            })
            .collect();
        record.group_links = Some(links);

        let shaped = shape_media_item(&record).unwrap();
        assert_eq!(shaped.groups.len(), 3);
    }

    #[test]
    fn link_without_nested_group_is_an_invariant_violation() {
        let mut record = item_record();
        record.group_links = Some(vec![MediaItemGroupRecord {
            item: None,
            group: None,
        }]);

        assert_eq!(
            shape_media_item(&record).unwrap_err(),
            ShapeError::MissingField {
                entity: "media_item_group",
                field: "group"
            }
        );
    }

    #[test]
    fn missing_field_wins_over_broken_links() {
        // Required fields are checked before the join rows are touched,
        // so the first violation reported is the item's own.
        let mut record = item_record();
        record.name = None;
        record.group_links = Some(vec![MediaItemGroupRecord {
            item: None,
            group: None,
        }]);

        assert_eq!(
            shape_media_item(&record).unwrap_err(),
            ShapeError::MissingField {
                entity: "media_item",
                field: "name"
            }
        );
    }

    #[test]
    fn group_without_description_stays_without_description() {
        let mut record = group_record();
        record.description = None;

        let shaped = shape_media_group(&record).expect("description is optional");
        assert_eq!(shaped.description, None);

        let serialized = serde_json::to_value(&shaped).unwrap();
        assert!(serialized.get("description").is_none());
    }

    #[test]
    fn group_requires_id_and_name() {
        let mut record = group_record();
        record.id = None;
        assert_eq!(
            shape_media_group(&record).unwrap_err(),
            ShapeError::MissingField {
                entity: "media_group",
                field: "id"
            }
        );

        let mut record = group_record();
        record.name = None;
        assert_eq!(
            shape_media_group(&record).unwrap_err(),
            ShapeError::MissingField {
                entity: "media_group",
                field: "name"
            }
        );
    }

    #[test]
    fn group_shapes_nested_items() {
        let mut record = group_record();
        record.item_links = Some(vec![
            MediaItemGroupRecord {
                item: Some(Box::new(item_record())),
                group: None,
            },
            MediaItemGroupRecord {
                item: Some(Box::new(item_record())),
                group: None,
            },
        ]);

        let shaped = shape_media_group(&record).unwrap();
        assert_eq!(shaped.media_items.len(), 2);
        assert!(shaped.media_items.iter().all(|i| i.groups.is_empty()));
    }
}
