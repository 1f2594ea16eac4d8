use crate::domain::{
    models::inquiry::{Inquiry, InquiryStatus},
    ports::InquiryRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteInquiryRepo {
    pool: SqlitePool,
}

impl SqliteInquiryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InquiryRepository for SqliteInquiryRepo {
    async fn create(&self, inquiry: &Inquiry) -> Result<Inquiry, AppError> {
        sqlx::query_as::<_, Inquiry>(
            "INSERT INTO inquiries (id, name, email, phone, company_name, event_type, preferred_date, estimated_guests,
                message, status, admin_notes, user_id, created_at, updated_at, responded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&inquiry.id).bind(&inquiry.name).bind(&inquiry.email).bind(&inquiry.phone)
            .bind(&inquiry.company_name).bind(inquiry.event_type).bind(inquiry.preferred_date)
            .bind(inquiry.estimated_guests).bind(&inquiry.message).bind(inquiry.status)
            .bind(&inquiry.admin_notes).bind(&inquiry.user_id).bind(inquiry.created_at)
            .bind(inquiry.updated_at).bind(inquiry.responded_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>, AppError> {
        sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, status: Option<InquiryStatus>) -> Result<Vec<Inquiry>, AppError> {
        match status {
            Some(status) => sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries WHERE status = ? ORDER BY created_at DESC")
                .bind(status)
                .fetch_all(&self.pool)
                .await,
            None => sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await,
        }
            .map_err(AppError::Database)
    }

    async fn update(&self, inquiry: &Inquiry) -> Result<Inquiry, AppError> {
        sqlx::query_as::<_, Inquiry>(
            "UPDATE inquiries SET status=?, admin_notes=?, updated_at=?, responded_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(inquiry.status).bind(&inquiry.admin_notes).bind(inquiry.updated_at)
            .bind(inquiry.responded_at)
            .bind(&inquiry.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Inquiry not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inquiry not found".into()));
        }
        Ok(())
    }
}
