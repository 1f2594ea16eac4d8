use std::str::FromStr;

use serde::Deserialize;

use crate::domain::models::{
    booking::PaymentRefs,
    chat::ChatMessage,
    event::Artist,
    ParseEnumError,
};
use crate::error::AppError;

/// Parses an optional enum literal from a query string. Present but empty
/// is an error, not "absent".
pub fn parse_filter<T>(raw: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = ParseEnumError>,
{
    raw.map(str::parse::<T>).transpose().map_err(AppError::from)
}

#[derive(Deserialize, Default)]
pub struct SyncUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Deserialize, Default)]
pub struct ListEventsQuery {
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Default)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub event_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: i64,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
    pub base_price: i64,
    pub hero_image_url: Option<String>,
    pub thumbnail_image_url: Option<String>,
    #[serde(default)]
    pub gallery_image_urls: Vec<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub venue_setup: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub event_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub date: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub capacity: Option<i32>,
    pub base_price: Option<i64>,
    pub hero_image_url: Option<String>,
    pub thumbnail_image_url: Option<String>,
    pub gallery_image_urls: Option<Vec<String>>,
    pub artists: Option<Vec<Artist>>,
    pub venue_setup: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
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

#[derive(Deserialize, Default)]
pub struct ListBookingsQuery {
    pub status: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
    #[serde(flatten)]
    pub refs: PaymentRefs,
}

#[derive(Deserialize, Default)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ListGalleryQuery {
    pub featured: Option<bool>,
    pub event_type: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct CreateGalleryImageRequest {
    pub image_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt: String,
    pub event_id: Option<String>,
    pub event_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    pub sort_order: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Deserialize, Default)]
pub struct UpdateGalleryImageRequest {
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt: Option<String>,
    pub event_id: Option<String>,
    pub event_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateInquiryRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub event_type: Option<String>,
    pub preferred_date: Option<i64>,
    pub estimated_guests: Option<i32>,
    pub message: String,
}

#[derive(Deserialize, Default)]
pub struct ListInquiriesQuery {
    pub status: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct UpdateInquiryStatusRequest {
    pub status: String,
    pub admin_notes: Option<String>,
}

/// Invoice body, camelCase like the storefront sends it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub customer_email: String,
    pub customer_name: String,
    pub amount: i64,
    pub description: Option<String>,
    pub event_title: String,
    pub booking_id: String,
    pub number_of_guests: i32,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}
