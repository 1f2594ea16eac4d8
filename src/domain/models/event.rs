use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::{EventType, now_millis, text_enum};

text_enum!(EventStatus, "event status", {
    Draft => "draft",
    Published => "published",
    SoldOut => "sold_out",
    Cancelled => "cancelled",
    Completed => "completed",
});

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Artist {
    pub name: String,
    pub role: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub event_type: EventType,
    pub tags: Json<Vec<String>>,
    pub date: i64,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
    /// Denormalized sum of guests over the event's non-cancelled bookings.
    pub current_attendees: i32,
    pub base_price: i64,
    pub hero_image_url: Option<String>,
    pub thumbnail_image_url: Option<String>,
    pub gallery_image_urls: Json<Vec<String>>,
    pub artists: Json<Vec<Artist>>,
    pub venue_setup: Option<String>,
    pub amenities: Json<Vec<String>>,
    pub status: EventStatus,
    pub is_featured: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

pub struct NewEventParams {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub event_type: EventType,
    pub tags: Vec<String>,
    pub date: i64,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
    pub base_price: i64,
    pub hero_image_url: Option<String>,
    pub thumbnail_image_url: Option<String>,
    pub gallery_image_urls: Vec<String>,
    pub artists: Vec<Artist>,
    pub venue_setup: Option<String>,
    pub amenities: Vec<String>,
    pub is_featured: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

impl Event {
    /// New events start as drafts with nobody booked.
    pub fn new(params: NewEventParams) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            slug: params.slug,
            description: params.description,
            short_description: params.short_description,
            event_type: params.event_type,
            tags: Json(params.tags),
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            capacity: params.capacity,
            current_attendees: 0,
            base_price: params.base_price,
            hero_image_url: params.hero_image_url,
            thumbnail_image_url: params.thumbnail_image_url,
            gallery_image_urls: Json(params.gallery_image_urls),
            artists: Json(params.artists),
            venue_setup: params.venue_setup,
            amenities: Json(params.amenities),
            status: EventStatus::Draft,
            is_featured: params.is_featured,
            meta_title: params.meta_title,
            meta_description: params.meta_description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn remaining_capacity(&self) -> i32 {
        (self.capacity - self.current_attendees).max(0)
    }

    pub fn is_overbooked(&self) -> bool {
        self.current_attendees > self.capacity
    }
}
