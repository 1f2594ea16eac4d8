use crate::domain::{
    models::booking::{Booking, BookingStatus, PaymentRefs},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, user_id, event_id, number_of_guests, total_amount, contact_name, contact_email,
                contact_phone, special_requests, dietary_restrictions, company_name, event_purpose, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.user_id).bind(&booking.event_id).bind(booking.number_of_guests)
            .bind(booking.total_amount).bind(&booking.contact_name).bind(&booking.contact_email)
            .bind(&booking.contact_phone).bind(&booking.special_requests).bind(&booking.dietary_restrictions)
            .bind(&booking.company_name).bind(&booking.event_purpose).bind(booking.status)
            .bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("UPDATE events SET current_attendees = current_attendees + ?, updated_at = ? WHERE id = ?")
            .bind(created.number_of_guests).bind(created.created_at).bind(&created.event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = ? ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_id = ? ORDER BY created_at DESC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, AppError> {
        match status {
            Some(status) => sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE status = ? ORDER BY created_at DESC")
                .bind(status)
                .fetch_all(&self.pool)
                .await,
            None => sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await,
        }
            .map_err(AppError::Database)
    }

    async fn update_status(&self, booking: &Booking) -> Result<Booking, AppError> {
        // The status guard keeps a concurrent cancellation from being overwritten.
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status=?, invoice_id=?, invoice_url=?, payment_intent_id=?, invoice_sent_at=?, paid_at=?, updated_at=?
             WHERE id=? AND status <> 'cancelled'
             RETURNING *"
        )
            .bind(booking.status).bind(&booking.invoice_id).bind(&booking.invoice_url)
            .bind(&booking.payment_intent_id).bind(booking.invoice_sent_at).bind(booking.paid_at)
            .bind(booking.updated_at)
            .bind(&booking.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Booking was cancelled concurrently".into()))
    }

    async fn cancel(
        &self,
        id: &str,
        reason: Option<&str>,
        refs: &PaymentRefs,
        now: i64,
    ) -> Result<Option<Booking>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled', cancelled_at = COALESCE(cancelled_at, ?),
                cancellation_reason = COALESCE(?, cancellation_reason),
                invoice_id = COALESCE(?, invoice_id), invoice_url = COALESCE(?, invoice_url),
                payment_intent_id = COALESCE(?, payment_intent_id), updated_at = ?
             WHERE id = ? AND status <> 'cancelled'
             RETURNING *"
        )
            .bind(now).bind(reason)
            .bind(&refs.invoice_id).bind(&refs.invoice_url).bind(&refs.payment_intent_id)
            .bind(now).bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let Some(cancelled) = cancelled else {
            // Unknown id or already cancelled; neither touches the counter.
            let existing = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            tx.commit().await.map_err(AppError::Database)?;
            return Ok(existing);
        };

        sqlx::query("UPDATE events SET current_attendees = MAX(0, current_attendees - ?), updated_at = ? WHERE id = ?")
            .bind(cancelled.number_of_guests).bind(now).bind(&cancelled.event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(cancelled))
    }
}
