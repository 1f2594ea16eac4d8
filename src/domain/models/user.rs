use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{now_millis, text_enum};

text_enum!(UserRole, "user role", {
    User => "user",
    Admin => "admin",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    /// Subject of the identity provider's tokens.
    pub external_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub payment_customer_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

pub struct NewUserParams {
    pub external_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub phone: Option<String>,
}

impl User {
    pub fn new(params: NewUserParams) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            external_id: params.external_id,
            email: params.email,
            first_name: params.first_name,
            last_name: params.last_name,
            image_url: params.image_url,
            phone: params.phone,
            role: UserRole::User,
            payment_customer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
