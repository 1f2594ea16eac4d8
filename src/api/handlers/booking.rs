use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::api::dtos::requests::{
    parse_filter, CancelBookingRequest, CreateBookingRequest, ListBookingsQuery, UpdateBookingStatusRequest,
};
use crate::domain::models::{
    booking::{Booking, BookingStatus, NewBookingParams},
    user::User,
};
use crate::domain::services::catalog::truncate;
use crate::error::AppError;
use std::sync::Arc;

/// Owners see and manage their own bookings; admins see all of them.
fn ensure_access(user: &User, booking: &Booking) -> Result<(), AppError> {
    if user.is_admin() || booking.user_id == user.id {
        Ok(())
    } else {
        Err(AppError::Forbidden("Not your booking".into()))
    }
}

/// Statuses an owner may set on their own booking: recording the invoice
/// they were just issued, or cancelling.
fn owner_may_set(status: BookingStatus) -> bool {
    matches!(status, BookingStatus::Invoiced | BookingStatus::Cancelled)
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.create(NewBookingParams {
        user_id: user.id,
        event_id: payload.event_id,
        number_of_guests: payload.number_of_guests,
        total_amount: payload.total_amount,
        contact_name: payload.contact_name,
        contact_email: payload.contact_email,
        contact_phone: payload.contact_phone,
        special_requests: payload.special_requests,
        dietary_restrictions: payload.dietary_restrictions,
        company_name: payload.company_name,
        event_purpose: payload.event_purpose,
    }).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.booking_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    ensure_access(&user, &booking)?;
    Ok(Json(booking))
}

pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.booking_repo.list_by_user(&user.id).await?))
}

pub async fn list_all_bookings(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<ListBookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let status = parse_filter::<BookingStatus>(params.status.as_deref())?;
    let bookings = state.booking_repo.list_all(status).await?;
    Ok(Json(truncate(bookings, params.limit)))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let target: BookingStatus = payload.status.parse()?;

    let booking = state.booking_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    ensure_access(&user, &booking)?;
    if !user.is_admin() && !owner_may_set(target) {
        return Err(AppError::Forbidden(format!("Only admins can set status '{}'", target)));
    }

    let updated = state.booking_service.transition(&id, target, payload.refs).await?;
    Ok(Json(updated))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Option<Json<CancelBookingRequest>>,
) -> Result<Json<Booking>, AppError> {
    let reason = payload.and_then(|Json(body)| body.reason);

    let booking = state.booking_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    ensure_access(&user, &booking)?;

    let cancelled = state.booking_service.cancel(&id, reason.as_deref()).await?;
    Ok(Json(cancelled))
}
