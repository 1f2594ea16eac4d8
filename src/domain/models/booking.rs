use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{now_millis, text_enum};

text_enum!(BookingStatus, "booking status", {
    Pending => "pending",
    Confirmed => "confirmed",
    Invoiced => "invoiced",
    Paid => "paid",
    Cancelled => "cancelled",
    Completed => "completed",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub number_of_guests: i32,
    pub total_amount: i64,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub special_requests: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub company_name: Option<String>,
    pub event_purpose: Option<String>,
    pub status: BookingStatus,
    pub invoice_id: Option<String>,
    pub invoice_url: Option<String>,
    pub payment_intent_id: Option<String>,
    pub invoice_sent_at: Option<i64>,
    pub paid_at: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub cancellation_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

pub struct NewBookingParams {
    pub user_id: String,
    pub event_id: String,
    pub number_of_guests: i32,
    pub total_amount: i64,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub special_requests: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub company_name: Option<String>,
    pub event_purpose: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            event_id: params.event_id,
            number_of_guests: params.number_of_guests,
            total_amount: params.total_amount,
            contact_name: params.contact_name,
            contact_email: params.contact_email,
            contact_phone: params.contact_phone,
            special_requests: params.special_requests,
            dietary_restrictions: params.dietary_restrictions,
            company_name: params.company_name,
            event_purpose: params.event_purpose,
            status: BookingStatus::Pending,
            invoice_id: None,
            invoice_url: None,
            payment_intent_id: None,
            invoice_sent_at: None,
            paid_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payment-provider references that may accompany a status change.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaymentRefs {
    pub invoice_id: Option<String>,
    pub invoice_url: Option<String>,
    pub payment_intent_id: Option<String>,
}
