use crate::domain::{
    models::event::{Event, EventStatus},
    ports::{AttendeeDrift, EventRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, title, slug, description, short_description, event_type, tags, date, start_time, end_time,
                capacity, current_attendees, base_price, hero_image_url, thumbnail_image_url, gallery_image_urls, artists,
                venue_setup, amenities, status, is_featured, meta_title, meta_description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.title).bind(&event.slug).bind(&event.description)
            .bind(&event.short_description).bind(event.event_type).bind(&event.tags).bind(event.date)
            .bind(&event.start_time).bind(&event.end_time).bind(event.capacity).bind(event.current_attendees)
            .bind(event.base_price).bind(&event.hero_image_url).bind(&event.thumbnail_image_url)
            .bind(&event.gallery_image_urls).bind(&event.artists).bind(&event.venue_setup).bind(&event.amenities)
            .bind(event.status).bind(event.is_featured).bind(&event.meta_title).bind(&event.meta_description)
            .bind(event.created_at).bind(event.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_date(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_featured(&self, featured: bool) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE is_featured = ? ORDER BY date ASC")
            .bind(featured)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE status = ? ORDER BY created_at ASC")
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_upcoming(&self, from: i64) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE status = 'published' AND date >= ? ORDER BY date ASC")
            .bind(from)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_ids(&self) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT id FROM events")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        // current_attendees is owned by the booking transactions and left alone.
        sqlx::query_as::<_, Event>(
            "UPDATE events SET title=?, slug=?, description=?, short_description=?, event_type=?, tags=?, date=?,
                start_time=?, end_time=?, capacity=?, base_price=?, hero_image_url=?, thumbnail_image_url=?,
                gallery_image_urls=?, artists=?, venue_setup=?, amenities=?, status=?, is_featured=?, meta_title=?,
                meta_description=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&event.title).bind(&event.slug).bind(&event.description).bind(&event.short_description)
            .bind(event.event_type).bind(&event.tags).bind(event.date).bind(&event.start_time).bind(&event.end_time)
            .bind(event.capacity).bind(event.base_price).bind(&event.hero_image_url).bind(&event.thumbnail_image_url)
            .bind(&event.gallery_image_urls).bind(&event.artists).bind(&event.venue_setup).bind(&event.amenities)
            .bind(event.status).bind(event.is_featured).bind(&event.meta_title).bind(&event.meta_description)
            .bind(event.updated_at)
            .bind(&event.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }

    async fn reconcile_attendees(&self, id: &str, now: i64) -> Result<Option<AttendeeDrift>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let before = sqlx::query_scalar::<_, i32>("SELECT current_attendees FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        let Some(before) = before else {
            return Err(AppError::NotFound("Event not found".into()));
        };

        let after = sqlx::query_scalar::<_, i32>(
            "UPDATE events SET
                current_attendees = (SELECT COALESCE(SUM(b.number_of_guests), 0) FROM bookings b
                                     WHERE b.event_id = events.id AND b.status <> 'cancelled'),
                updated_at = ?
             WHERE id = ?
               AND current_attendees <> (SELECT COALESCE(SUM(b.number_of_guests), 0) FROM bookings b
                                         WHERE b.event_id = events.id AND b.status <> 'cancelled')
             RETURNING current_attendees"
        )
            .bind(now).bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(after.map(|after| AttendeeDrift { before, after }))
    }
}
