//! Media domain models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Source platform of a media item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Vimeo,
    Dailymotion,
}

impl Platform {
    /// Text-column representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Vimeo => "vimeo",
            Platform::Dailymotion => "dailymotion",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Platform::Youtube),
            "vimeo" => Ok(Platform::Vimeo),
            "dailymotion" => Ok(Platform::Dailymotion),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Raw media item record as produced by a persistence query.
///
/// Every field is optional at this boundary: the query is expected to
/// return all of them, and the response shaper treats an absent one as an
/// upstream invariant violation instead of trusting a partial row.
#[derive(Debug, Clone, Default)]
pub struct MediaItemRecord {
    pub id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub platform: Option<Platform>,
    pub external_id: Option<String>,
    /// Join rows toward media groups, when the query loaded the relation
    pub group_links: Option<Vec<MediaItemGroupRecord>>,
}

/// Raw media group record as produced by a persistence query
#[derive(Debug, Clone, Default)]
pub struct MediaGroupRecord {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Join rows toward media items, when the query loaded the relation
    pub item_links: Option<Vec<MediaItemGroupRecord>>,
}

/// Raw join row between a media item and a media group
#[derive(Debug, Clone, Default)]
pub struct MediaItemGroupRecord {
    pub item: Option<Box<MediaItemRecord>>,
    pub group: Option<Box<MediaGroupRecord>>,
}

/// Request for media item creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMediaItemRequest {
    pub name: String,
    pub platform: Platform,
    pub external_id: String,
}

/// Request for partial media item update
///
/// An absent (or null) field is left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMediaItemRequest {
    pub name: Option<String>,
    pub platform: Option<Platform>,
    pub external_id: Option<String>,
}

/// Request for media group creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMediaGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Request for partial media group update
///
/// An absent (or null) field is left unchanged; in particular there is no
/// way to clear an existing `description` through this request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMediaGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Query parameters for media item listing
#[derive(Debug, Clone, Deserialize)]
pub struct MediaItemQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
    /// Filter by source platform
    pub platform: Option<Platform>,
}

/// Query parameters for media group listing
#[derive(Debug, Clone, Deserialize)]
pub struct MediaGroupQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of groups per page
    pub limit: Option<u32>,
}

/// Effective 1-based page after clamping raw query input.
///
/// Repositories and list handlers both go through this, so the reported
/// pagination always matches the query that ran.
pub fn effective_page(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

/// Effective page size after clamping raw query input
pub fn effective_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(10).min(100).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_round_trips_through_text() {
        for platform in [Platform::Youtube, Platform::Vimeo, Platform::Dailymotion] {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
    }

    #[test]
    fn platform_rejects_unknown_provider() {
        assert!("myspace".parse::<Platform>().is_err());
        assert!("YOUTUBE".parse::<Platform>().is_err());
    }

    #[test]
    fn pagination_clamps_raw_input() {
        assert_eq!(effective_page(None), 1);
        assert_eq!(effective_page(Some(0)), 1);
        assert_eq!(effective_page(Some(7)), 7);

        assert_eq!(effective_limit(None), 10);
        assert_eq!(effective_limit(Some(0)), 1);
        assert_eq!(effective_limit(Some(500)), 100);
    }
}
