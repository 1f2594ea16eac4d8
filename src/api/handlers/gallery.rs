use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use sqlx::types::Json as JsonColumn;
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::{parse_filter, CreateGalleryImageRequest, ListGalleryQuery, UpdateGalleryImageRequest};
use crate::domain::models::gallery::{GalleryImage, NewGalleryImageParams};
use crate::domain::services::catalog::{self, GalleryQuery};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_images(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListGalleryQuery>,
) -> Result<Json<Vec<GalleryImage>>, AppError> {
    let query = GalleryQuery {
        featured: params.featured,
        event_type: parse_filter(params.event_type.as_deref())?,
        limit: params.limit,
    };
    Ok(Json(catalog::list_gallery(state.gallery_repo.as_ref(), &query).await?))
}

pub async fn list_event_images(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<GalleryImage>>, AppError> {
    Ok(Json(state.gallery_repo.list_by_event(&event_id).await?))
}

pub async fn create_image(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CreateGalleryImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.image_url.trim().is_empty() {
        return Err(AppError::Validation("image_url is required".into()));
    }
    let event_type = parse_filter(payload.event_type.as_deref())?;

    let sort_order = match payload.sort_order {
        Some(order) => order,
        None => i32::try_from(state.gallery_repo.count().await?).unwrap_or(i32::MAX),
    };

    let image = GalleryImage::new(NewGalleryImageParams {
        image_url: payload.image_url,
        title: payload.title,
        description: payload.description,
        alt: payload.alt,
        event_id: payload.event_id,
        event_type,
        tags: payload.tags,
        is_featured: payload.is_featured,
        sort_order,
        width: payload.width,
        height: payload.height,
    });

    let created = state.gallery_repo.create(&image).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_image(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateGalleryImageRequest>,
) -> Result<Json<GalleryImage>, AppError> {
    let mut image = state.gallery_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Image not found".into()))?;

    if let Some(v) = payload.image_url { image.image_url = v; }
    if let Some(v) = payload.title { image.title = Some(v); }
    if let Some(v) = payload.description { image.description = Some(v); }
    if let Some(v) = payload.alt { image.alt = v; }
    if let Some(v) = payload.event_id { image.event_id = Some(v); }
    if let Some(v) = payload.event_type { image.event_type = Some(v.parse()?); }
    if let Some(v) = payload.tags { image.tags = JsonColumn(v); }
    if let Some(v) = payload.is_featured { image.is_featured = v; }
    if let Some(v) = payload.sort_order { image.sort_order = v; }
    if let Some(v) = payload.width { image.width = Some(v); }
    if let Some(v) = payload.height { image.height = Some(v); }

    Ok(Json(state.gallery_repo.update(&image).await?))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.gallery_repo.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
