//! Application state shared across handlers

use auth::jwt::JwtService;

use crate::repositories::{MediaGroupRepository, MediaItemRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub media_item_repository: MediaItemRepository,
    pub media_group_repository: MediaGroupRepository,
    pub jwt_service: JwtService,
}
