use crate::domain::{models::user::{User, UserRole}, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn upsert_by_external_id(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, external_id, email, first_name, last_name, image_url, phone, role, payment_customer_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(external_id) DO UPDATE SET
                email = excluded.email,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                image_url = excluded.image_url,
                phone = excluded.phone,
                updated_at = excluded.updated_at
             RETURNING *"
        )
            .bind(&user.id).bind(&user.external_id).bind(&user.email)
            .bind(&user.first_name).bind(&user.last_name).bind(&user.image_url).bind(&user.phone)
            .bind(user.role).bind(&user.payment_customer_id)
            .bind(user.created_at).bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = ?")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_role(&self, id: &str, role: UserRole, now: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("UPDATE users SET role = ?, updated_at = ? WHERE id = ? RETURNING *")
            .bind(role).bind(now).bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_payment_customer_id(&self, id: &str, customer_id: &str, now: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET payment_customer_id = ?, updated_at = ? WHERE id = ?")
            .bind(customer_id).bind(now).bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
