use crate::domain::{
    models::event::{Event, EventStatus},
    ports::{AttendeeDrift, EventRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, title, slug, description, short_description, event_type, tags, date, start_time, end_time,
                capacity, current_attendees, base_price, hero_image_url, thumbnail_image_url, gallery_image_urls, artists,
                venue_setup, amenities, status, is_featured, meta_title, meta_description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = $1")
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE is_featured = $1 ORDER BY date ASC")
            .bind(featured)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE status = $1 ORDER BY created_at ASC")
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_upcoming(&self, from: i64) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE status = 'published' AND date >= $1 ORDER BY date ASC")
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
            "UPDATE events SET title=$1, slug=$2, description=$3, short_description=$4, event_type=$5, tags=$6, date=$7,
                start_time=$8, end_time=$9, capacity=$10, base_price=$11, hero_image_url=$12, thumbnail_image_url=$13,
                gallery_image_urls=$14, artists=$15, venue_setup=$16, amenities=$17, status=$18, is_featured=$19, meta_title=$20,
                meta_description=$21, updated_at=$22
             WHERE id=$23
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
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
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

        // Row lock serializes against booking writes, which update this row
        // before committing.
        let before = sqlx::query_scalar::<_, i32>("SELECT current_attendees FROM events WHERE id = $1 FOR UPDATE")
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
                updated_at = $1
             WHERE id = $2
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
