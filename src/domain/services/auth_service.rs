use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{
    models::{
        auth::Claims,
        now_millis,
        user::{NewUserParams, User},
    },
    ports::UserRepository,
};
use crate::error::AppError;

/// Profile fields a signed-in user may send along when syncing.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub phone: Option<String>,
}

/// Verifies identity-provider session tokens and maps their subject onto
/// stored users.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: &Config) -> Result<Self, AppError> {
        let decoding_key = DecodingKey::from_rsa_pem(config.auth_public_key.as_bytes())
            .map_err(|e| {
                tracing::error!("Invalid identity provider public key: {}", e);
                AppError::Internal
            })?;

        let mut validation = Validation::new(Algorithm::RS256);
        match &config.auth_audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        if let Some(iss) = &config.auth_issuer {
            validation.set_issuer(&[iss]);
        }

        Ok(Self { users, decoding_key, validation })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AppError::Unauthorized
            })
    }

    /// Resolves a token to its stored user. Users that never synced are
    /// rejected.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.verify(token)?;
        self.users.find_by_external_id(&claims.sub).await?
            .ok_or(AppError::Unauthorized)
    }

    /// Creates the user on first sight or refreshes their profile. Role and
    /// id of an existing user never change here.
    pub async fn sync(&self, claims: &Claims, profile: ProfileUpdate) -> Result<User, AppError> {
        let existing = self.users.find_by_external_id(&claims.sub).await?;

        let user = match existing {
            Some(mut user) => {
                if let Some(email) = profile.email.or_else(|| claims.email.clone()) {
                    user.email = email;
                }
                user.first_name = profile.first_name.or(user.first_name);
                user.last_name = profile.last_name.or(user.last_name);
                user.image_url = profile.image_url.or(user.image_url);
                user.phone = profile.phone.or(user.phone);
                user.updated_at = now_millis();
                user
            }
            None => {
                let email = profile.email.or_else(|| claims.email.clone())
                    .ok_or(AppError::Validation("email is required for a new user".into()))?;
                info!("Registering user for subject {}", claims.sub);
                User::new(NewUserParams {
                    external_id: claims.sub.clone(),
                    email,
                    first_name: profile.first_name,
                    last_name: profile.last_name,
                    image_url: profile.image_url,
                    phone: profile.phone,
                })
            }
        };

        self.users.upsert_by_external_id(&user).await
    }
}
