use crate::domain::{
    models::{gallery::GalleryImage, EventType},
    ports::GalleryRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteGalleryRepo {
    pool: SqlitePool,
}

impl SqliteGalleryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GalleryRepository for SqliteGalleryRepo {
    async fn create(&self, image: &GalleryImage) -> Result<GalleryImage, AppError> {
        sqlx::query_as::<_, GalleryImage>(
            "INSERT INTO gallery_images (id, image_url, title, description, alt, event_id, event_type, tags, is_featured, sort_order, width, height, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&image.id).bind(&image.image_url).bind(&image.title).bind(&image.description).bind(&image.alt)
            .bind(&image.event_id).bind(image.event_type).bind(&image.tags).bind(image.is_featured)
            .bind(image.sort_order).bind(image.width).bind(image.height).bind(image.uploaded_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<GalleryImage>, AppError> {
        sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery_images WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM gallery_images")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_featured(&self, featured: bool) -> Result<Vec<GalleryImage>, AppError> {
        sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery_images WHERE is_featured = ? ORDER BY sort_order ASC")
            .bind(featured)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event_type(&self, event_type: EventType) -> Result<Vec<GalleryImage>, AppError> {
        sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery_images WHERE event_type = ? ORDER BY sort_order ASC")
            .bind(event_type)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_recent(&self) -> Result<Vec<GalleryImage>, AppError> {
        sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery_images ORDER BY uploaded_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<GalleryImage>, AppError> {
        sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery_images WHERE event_id = ? ORDER BY sort_order ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, image: &GalleryImage) -> Result<GalleryImage, AppError> {
        sqlx::query_as::<_, GalleryImage>(
            "UPDATE gallery_images SET image_url=?, title=?, description=?, alt=?, event_id=?, event_type=?, tags=?,
                is_featured=?, sort_order=?, width=?, height=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&image.image_url).bind(&image.title).bind(&image.description).bind(&image.alt)
            .bind(&image.event_id).bind(image.event_type).bind(&image.tags).bind(image.is_featured)
            .bind(image.sort_order).bind(image.width).bind(image.height)
            .bind(&image.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Image not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM gallery_images WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Image not found".into()));
        }
        Ok(())
    }
}
