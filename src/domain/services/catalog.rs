use crate::domain::models::EventType;
use crate::domain::models::event::{Event, EventStatus};
use crate::domain::models::gallery::GalleryImage;
use crate::domain::ports::{EventRepository, GalleryRepository};
use crate::error::AppError;

/// Where the candidate rows of a listing come from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Featured(bool),
    Status(EventStatus),
    All,
}

#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
    pub featured: Option<bool>,
    pub limit: Option<usize>,
}

impl EventQuery {
    pub fn source(&self) -> EventSource {
        match (self.featured, self.status) {
            (Some(featured), _) => EventSource::Featured(featured),
            (None, Some(status)) => EventSource::Status(status),
            (None, None) => EventSource::All,
        }
    }

    /// Filters a source listing in place of the store: type, then status
    /// (published only when none was asked for), then limit.
    pub fn apply(&self, events: Vec<Event>) -> Vec<Event> {
        let wanted_status = self.status.unwrap_or(EventStatus::Published);
        let filtered = events
            .into_iter()
            .filter(|e| self.event_type.is_none_or(|t| e.event_type == t))
            .filter(|e| e.status == wanted_status);
        truncate(filtered, self.limit)
    }
}

pub fn truncate<T>(items: impl IntoIterator<Item = T>, limit: Option<usize>) -> Vec<T> {
    match limit {
        Some(n) => items.into_iter().take(n).collect(),
        None => items.into_iter().collect(),
    }
}

pub async fn list_events(repo: &dyn EventRepository, query: &EventQuery) -> Result<Vec<Event>, AppError> {
    let source = match query.source() {
        EventSource::Featured(featured) => repo.list_featured(featured).await?,
        EventSource::Status(status) => repo.list_by_status(status).await?,
        EventSource::All => repo.list_by_date().await?,
    };
    Ok(query.apply(source))
}

pub async fn list_upcoming(repo: &dyn EventRepository, now: i64, limit: Option<usize>) -> Result<Vec<Event>, AppError> {
    Ok(truncate(repo.list_upcoming(now).await?, limit))
}

pub async fn list_featured(repo: &dyn EventRepository, limit: Option<usize>) -> Result<Vec<Event>, AppError> {
    let featured = repo.list_featured(true).await?;
    Ok(truncate(
        featured.into_iter().filter(|e| e.status == EventStatus::Published),
        limit,
    ))
}

#[derive(Debug, Clone, Default)]
pub struct GalleryQuery {
    pub featured: Option<bool>,
    pub event_type: Option<EventType>,
    pub limit: Option<usize>,
}

pub async fn list_gallery(repo: &dyn GalleryRepository, query: &GalleryQuery) -> Result<Vec<GalleryImage>, AppError> {
    let images = if let Some(featured) = query.featured {
        repo.list_featured(featured).await?
    } else if let Some(event_type) = query.event_type {
        repo.list_by_event_type(event_type).await?
    } else {
        repo.list_recent().await?
    };
    Ok(truncate(images, query.limit))
}
