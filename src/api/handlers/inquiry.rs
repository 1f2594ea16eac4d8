use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AdminUser, maybe_auth::MaybeAuthUser};
use crate::api::dtos::requests::{parse_filter, CreateInquiryRequest, ListInquiriesQuery, UpdateInquiryStatusRequest};
use crate::domain::models::{
    inquiry::{Inquiry, InquiryStatus, NewInquiryParams},
    now_millis,
};
use crate::domain::services::catalog::truncate;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_inquiry(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(payload): Json<CreateInquiryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(AppError::Validation("name, email and message are required".into()));
    }
    if payload.estimated_guests.is_some_and(|g| g < 1) {
        return Err(AppError::Validation("estimated_guests must be at least 1".into()));
    }

    let inquiry = Inquiry::new(NewInquiryParams {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        company_name: payload.company_name,
        event_type: parse_filter(payload.event_type.as_deref())?,
        preferred_date: payload.preferred_date,
        estimated_guests: payload.estimated_guests,
        message: payload.message,
        user_id: user.map(|u| u.id),
    });

    let created = state.inquiry_repo.create(&inquiry).await?;
    info!("Inquiry received: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_inquiries(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<ListInquiriesQuery>,
) -> Result<Json<Vec<Inquiry>>, AppError> {
    let status = parse_filter::<InquiryStatus>(params.status.as_deref())?;
    let inquiries = state.inquiry_repo.list(status).await?;
    Ok(Json(truncate(inquiries, params.limit)))
}

pub async fn get_inquiry(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Inquiry>, AppError> {
    let inquiry = state.inquiry_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Inquiry not found".into()))?;
    Ok(Json(inquiry))
}

pub async fn update_inquiry_status(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInquiryStatusRequest>,
) -> Result<Json<Inquiry>, AppError> {
    let status: InquiryStatus = payload.status.parse()?;
    let mut inquiry = state.inquiry_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Inquiry not found".into()))?;

    inquiry.apply_status(status, payload.admin_notes, now_millis());
    Ok(Json(state.inquiry_repo.update(&inquiry).await?))
}

pub async fn delete_inquiry(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.inquiry_repo.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
