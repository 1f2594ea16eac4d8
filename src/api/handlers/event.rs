use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use sqlx::types::Json as JsonColumn;
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::{parse_filter, CreateEventRequest, LimitQuery, ListEventsQuery, UpdateEventRequest};
use crate::api::dtos::responses::ReconcileResponse;
use crate::domain::models::{
    booking::Booking,
    event::{Event, NewEventParams},
    now_millis, EventType,
};
use crate::domain::services::{catalog, reconciliation};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn validate_event(event: &Event) -> Result<(), AppError> {
    if event.title.trim().is_empty() || event.slug.trim().is_empty() {
        return Err(AppError::Validation("title and slug are required".into()));
    }
    if event.capacity < 0 {
        return Err(AppError::Validation("capacity must not be negative".into()));
    }
    if event.base_price < 0 {
        return Err(AppError::Validation("base_price must not be negative".into()));
    }
    Ok(())
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListEventsQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let query = catalog::EventQuery {
        event_type: parse_filter(params.event_type.as_deref())?,
        status: parse_filter(params.status.as_deref())?,
        featured: params.featured,
        limit: params.limit,
    };
    let events = catalog::list_events(state.event_repo.as_ref(), &query).await?;
    Ok(Json(events))
}

pub async fn list_upcoming(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = catalog::list_upcoming(state.event_repo.as_ref(), now_millis(), params.limit).await?;
    Ok(Json(events))
}

pub async fn list_featured(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = catalog::list_featured(state.event_repo.as_ref(), params.limit).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    Ok(Json(event))
}

pub async fn get_event_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Event>, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event_type: EventType = payload.event_type.parse()?;

    let event = Event::new(NewEventParams {
        title: payload.title,
        slug: payload.slug,
        description: payload.description,
        short_description: payload.short_description,
        event_type,
        tags: payload.tags,
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        capacity: payload.capacity,
        base_price: payload.base_price,
        hero_image_url: payload.hero_image_url,
        thumbnail_image_url: payload.thumbnail_image_url,
        gallery_image_urls: payload.gallery_image_urls,
        artists: payload.artists,
        venue_setup: payload.venue_setup,
        amenities: payload.amenities,
        is_featured: payload.is_featured,
        meta_title: payload.meta_title,
        meta_description: payload.meta_description,
    });
    validate_event(&event)?;

    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} ({})", created.slug, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    let mut event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if let Some(v) = payload.title { event.title = v; }
    if let Some(v) = payload.slug { event.slug = v; }
    if let Some(v) = payload.description { event.description = v; }
    if let Some(v) = payload.short_description { event.short_description = v; }
    if let Some(v) = payload.event_type { event.event_type = v.parse()?; }
    if let Some(v) = payload.tags { event.tags = JsonColumn(v); }
    if let Some(v) = payload.date { event.date = v; }
    if let Some(v) = payload.start_time { event.start_time = v; }
    if let Some(v) = payload.end_time { event.end_time = v; }
    if let Some(v) = payload.capacity { event.capacity = v; }
    if let Some(v) = payload.base_price { event.base_price = v; }
    if let Some(v) = payload.hero_image_url { event.hero_image_url = Some(v); }
    if let Some(v) = payload.thumbnail_image_url { event.thumbnail_image_url = Some(v); }
    if let Some(v) = payload.gallery_image_urls { event.gallery_image_urls = JsonColumn(v); }
    if let Some(v) = payload.artists { event.artists = JsonColumn(v); }
    if let Some(v) = payload.venue_setup { event.venue_setup = Some(v); }
    if let Some(v) = payload.amenities { event.amenities = JsonColumn(v); }
    if let Some(v) = payload.status { event.status = v.parse()?; }
    if let Some(v) = payload.is_featured { event.is_featured = v; }
    if let Some(v) = payload.meta_title { event.meta_title = Some(v); }
    if let Some(v) = payload.meta_description { event.meta_description = Some(v); }
    event.updated_at = now_millis();

    validate_event(&event)?;
    let updated = state.event_repo.update(&event).await?;
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.event_repo.delete(&id).await?;
    info!("Event deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_event_bookings(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.booking_repo.list_by_event(&id).await?))
}

pub async fn reconcile_event(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ReconcileResponse>, AppError> {
    let drift = reconciliation::reconcile_event(state.event_repo.as_ref(), &id).await?;
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(Json(ReconcileResponse {
        event_id: event.id,
        corrected: drift.is_some(),
        before: drift.map(|d| d.before),
        current_attendees: event.current_attendees,
    }))
}
