use axum::{extract::{State, Path}, Json};
use crate::state::AppState;
use crate::api::extractors::auth::{AdminUser, AuthUser, VerifiedClaims};
use crate::api::dtos::requests::{SyncUserRequest, UpdateRoleRequest};
use crate::domain::models::{now_millis, user::{User, UserRole}};
use crate::domain::services::auth_service::ProfileUpdate;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn sync_current_user(
    State(state): State<Arc<AppState>>,
    VerifiedClaims(claims): VerifiedClaims,
    payload: Option<Json<SyncUserRequest>>,
) -> Result<Json<User>, AppError> {
    let Json(body) = payload.unwrap_or_default();
    let profile = ProfileUpdate {
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        image_url: body.image_url,
        phone: body.phone,
    };
    let user = state.auth_service.sync(&claims, profile).await?;
    Ok(Json(user))
}

pub async fn get_current_user(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.user_repo.list().await?))
}

pub async fn update_role(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<User>, AppError> {
    let role: UserRole = payload.role.parse()?;
    let user = state.user_repo.update_role(&id, role, now_millis()).await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    info!("User {} set role of {} to {}", admin.id, user.id, role);
    Ok(Json(user))
}
