use axum::{extract::State, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateInvoiceRequest;
use crate::api::dtos::responses::InvoiceCreatedResponse;
use crate::domain::models::{invoice::InvoiceRequest, now_millis};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<Json<InvoiceCreatedResponse>, AppError> {
    if payload.amount <= 0 {
        return Err(AppError::Validation("amount must be positive".into()));
    }
    if payload.number_of_guests < 1 {
        return Err(AppError::Validation("numberOfGuests must be at least 1".into()));
    }

    let request = InvoiceRequest {
        user_id: user.id.clone(),
        customer_email: payload.customer_email,
        customer_name: payload.customer_name,
        amount: payload.amount,
        description: payload.description,
        event_title: payload.event_title,
        booking_id: payload.booking_id,
        number_of_guests: payload.number_of_guests,
    };

    let issued = state.invoice_service.create_and_send(&request).await?;
    info!("Invoice {} issued for booking {}", issued.invoice_id, request.booking_id);

    if user.payment_customer_id.as_deref() != Some(issued.customer_id.as_str())
        && let Err(e) = state.user_repo.set_payment_customer_id(&user.id, &issued.customer_id, now_millis()).await {
            warn!("Could not store payment customer id for user {}: {}", user.id, e);
        }

    Ok(Json(InvoiceCreatedResponse {
        success: true,
        invoice_id: issued.invoice_id,
        invoice_url: issued.invoice_url,
        customer_id: issued.customer_id,
    }))
}
