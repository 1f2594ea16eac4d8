use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// RSA public key (PEM) of the identity provider.
    pub auth_public_key: String,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Zero disables the background reconciliation task.
    pub reconcile_interval_secs: u64,
    /// `None` allows any origin.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parsed("PORT", 3000)?,
            auth_public_key: required("AUTH_PUBLIC_KEY")?.replace("\\n", "\n"),
            auth_issuer: optional("AUTH_ISSUER"),
            auth_audience: optional("AUTH_AUDIENCE"),
            stripe_secret_key: optional("STRIPE_SECRET_KEY").unwrap_or_default(),
            stripe_api_base: optional("STRIPE_API_BASE")
                .unwrap_or_else(|| "https://api.stripe.com".to_string()),
            gemini_api_key: optional("GEMINI_API_KEY"),
            gemini_model: optional("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".to_string()),
            reconcile_interval_secs: parsed("RECONCILE_INTERVAL_SECS", 300)?,
            cors_allowed_origins: optional("CORS_ALLOWED_ORIGINS").map(|raw| split_list(&raw)),
        })
    }

    pub fn is_postgres(&self) -> bool {
        self.database_url.starts_with("postgres://") || self.database_url.starts_with("postgresql://")
    }
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
