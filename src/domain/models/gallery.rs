use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::{EventType, now_millis};

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct GalleryImage {
    pub id: String,
    pub image_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt: String,
    pub event_id: Option<String>,
    pub event_type: Option<EventType>,
    pub tags: Json<Vec<String>>,
    pub is_featured: bool,
    pub sort_order: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub uploaded_at: i64,
}

pub struct NewGalleryImageParams {
    pub image_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt: String,
    pub event_id: Option<String>,
    pub event_type: Option<EventType>,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub sort_order: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl GalleryImage {
    pub fn new(params: NewGalleryImageParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            image_url: params.image_url,
            title: params.title,
            description: params.description,
            alt: params.alt,
            event_id: params.event_id,
            event_type: params.event_type,
            tags: Json(params.tags),
            is_featured: params.is_featured,
            sort_order: params.sort_order,
            width: params.width,
            height: params.height,
            uploaded_at: now_millis(),
        }
    }
}
