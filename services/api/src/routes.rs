//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::{
        MediaGroupListResponse, MediaItemListResponse, shape_media_group, shape_media_item,
    },
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{
        CreateMediaGroupRequest, CreateMediaItemRequest, MediaGroupQuery, MediaItemQuery,
        UpdateMediaGroupRequest, UpdateMediaItemRequest, effective_limit, effective_page,
    },
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/media-items",
            get(list_media_items).post(create_media_item),
        )
        .route(
            "/media-items/:id",
            get(get_media_item)
                .put(update_media_item)
                .delete(delete_media_item),
        )
        .route(
            "/media-groups",
            get(list_media_groups).post(create_media_group),
        )
        .route(
            "/media-groups/:id",
            get(get_media_group)
                .put(update_media_group)
                .delete(delete_media_group),
        )
        .route(
            "/media-groups/:group_id/items/:item_id",
            put(add_group_item).delete(remove_group_item),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Get media items with pagination and filtering
pub async fn list_media_items(
    State(state): State<AppState>,
    Query(query): Query<MediaItemQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (records, total) = state
        .media_item_repository
        .list(&query)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list media items: {}", e);
            ApiError::InternalServerError
        })?;

    let items = records
        .iter()
        .map(shape_media_item)
        .collect::<Result<Vec<_>, _>>()?;

    let page = effective_page(query.page);
    let limit = effective_limit(query.limit);

    Ok(Json(MediaItemListResponse {
        items,
        page,
        limit,
        total,
    }))
}

/// Get a media item by ID
pub async fn get_media_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .media_item_repository
        .get_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get media item: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Media item not found".to_string()))?;

    Ok(Json(shape_media_item(&record)?))
}

/// Create a new media item
pub async fn create_media_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateMediaItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }
    if payload.external_id.trim().is_empty() {
        return Err(ApiError::BadRequest("External ID is required".to_string()));
    }

    let record = state
        .media_item_repository
        .create(&payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create media item: {}", e);
            ApiError::InternalServerError
        })?;

    tracing::info!("Media item created by {} <{}>", user.name, user.email);

    Ok((StatusCode::CREATED, Json(shape_media_item(&record)?)))
}

/// Apply a partial update to a media item
pub async fn update_media_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMediaItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::BadRequest("Name must not be empty".to_string()));
    }

    let record = state
        .media_item_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update media item: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Media item not found".to_string()))?;

    Ok(Json(shape_media_item(&record)?))
}

/// Delete a media item
pub async fn delete_media_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.media_item_repository.delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete media item: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Media item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Get media groups with pagination
pub async fn list_media_groups(
    State(state): State<AppState>,
    Query(query): Query<MediaGroupQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (records, total) = state
        .media_group_repository
        .list(&query)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list media groups: {}", e);
            ApiError::InternalServerError
        })?;

    let groups = records
        .iter()
        .map(shape_media_group)
        .collect::<Result<Vec<_>, _>>()?;

    let page = effective_page(query.page);
    let limit = effective_limit(query.limit);

    Ok(Json(MediaGroupListResponse {
        groups,
        page,
        limit,
        total,
    }))
}

/// Get a media group by ID
pub async fn get_media_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .media_group_repository
        .get_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get media group: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Media group not found".to_string()))?;

    Ok(Json(shape_media_group(&record)?))
}

/// Create a new media group
pub async fn create_media_group(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateMediaGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }

    let record = state
        .media_group_repository
        .create(&payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create media group: {}", e);
            ApiError::InternalServerError
        })?;

    tracing::info!("Media group created by {} <{}>", user.name, user.email);

    Ok((StatusCode::CREATED, Json(shape_media_group(&record)?)))
}

/// Apply a partial update to a media group
pub async fn update_media_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMediaGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::BadRequest("Name must not be empty".to_string()));
    }

    let record = state
        .media_group_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update media group: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Media group not found".to_string()))?;

    Ok(Json(shape_media_group(&record)?))
}

/// Delete a media group
pub async fn delete_media_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.media_group_repository.delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete media group: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Media group not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Add a media item to a group
pub async fn add_group_item(
    State(state): State<AppState>,
    Path((group_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_link_endpoints(&state, group_id, item_id).await?;

    state
        .media_group_repository
        .add_item(group_id, item_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add media item to group: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a media item from a group
pub async fn remove_group_item(
    State(state): State<AppState>,
    Path((group_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_link_endpoints(&state, group_id, item_id).await?;

    let removed = state
        .media_group_repository
        .remove_item(group_id, item_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to remove media item from group: {}", e);
            ApiError::InternalServerError
        })?;

    if !removed {
        return Err(ApiError::NotFound(
            "Media item is not in this group".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Check that both sides of a join-row operation exist
async fn ensure_link_endpoints(
    state: &AppState,
    group_id: Uuid,
    item_id: Uuid,
) -> Result<(), ApiError> {
    let group_exists = state
        .media_group_repository
        .exists(group_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check media group existence: {}", e);
            ApiError::InternalServerError
        })?;
    if !group_exists {
        return Err(ApiError::NotFound("Media group not found".to_string()));
    }

    let item_exists = state
        .media_item_repository
        .exists(item_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check media item existence: {}", e);
            ApiError::InternalServerError
        })?;
    if !item_exists {
        return Err(ApiError::NotFound("Media item not found".to_string()));
    }

    Ok(())
}
