use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, EventRepository, GalleryRepository, InquiryRepository, InvoiceService,
    LlmService, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking_service::BookingService;
use crate::error::AppError;
use crate::infra::ai::gemini_service::GeminiService;
use crate::infra::payments::stripe_invoice_service::StripeInvoiceService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_event_repo::PostgresEventRepo,
    postgres_gallery_repo::PostgresGalleryRepo, postgres_inquiry_repo::PostgresInquiryRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_gallery_repo::SqliteGalleryRepo, sqlite_inquiry_repo::SqliteInquiryRepo,
    sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

/// The repository set for one backing store.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub gallery: Arc<dyn GalleryRepository>,
    pub inquiries: Arc<dyn InquiryRepository>,
}

impl Repositories {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            users: Arc::new(SqliteUserRepo::new(pool.clone())),
            events: Arc::new(SqliteEventRepo::new(pool.clone())),
            bookings: Arc::new(SqliteBookingRepo::new(pool.clone())),
            gallery: Arc::new(SqliteGalleryRepo::new(pool.clone())),
            inquiries: Arc::new(SqliteInquiryRepo::new(pool)),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            bookings: Arc::new(PostgresBookingRepo::new(pool.clone())),
            gallery: Arc::new(PostgresGalleryRepo::new(pool.clone())),
            inquiries: Arc::new(PostgresInquiryRepo::new(pool)),
        }
    }
}

/// Wires repositories and outbound services into the shared state. Tests
/// call this with their own invoice and model doubles.
pub fn assemble_state(
    config: &Config,
    repos: Repositories,
    invoice_service: Arc<dyn InvoiceService>,
    llm_service: Option<Arc<dyn LlmService>>,
) -> Result<AppState, AppError> {
    let auth_service = Arc::new(AuthService::new(repos.users.clone(), config)?);
    let booking_service = Arc::new(BookingService::new(repos.bookings.clone(), repos.events.clone()));

    Ok(AppState {
        config: config.clone(),
        user_repo: repos.users,
        event_repo: repos.events,
        booking_repo: repos.bookings,
        gallery_repo: repos.gallery,
        inquiry_repo: repos.inquiries,
        auth_service,
        booking_service,
        invoice_service,
        llm_service,
    })
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let invoice_service: Arc<dyn InvoiceService> = Arc::new(StripeInvoiceService::new(
        config.stripe_api_base.clone(),
        config.stripe_secret_key.clone(),
    ));

    let llm_service: Option<Arc<dyn LlmService>> = config.gemini_api_key.clone().map(|key| {
        Arc::new(GeminiService::new(key, config.gemini_model.clone())) as Arc<dyn LlmService>
    });
    if llm_service.is_none() {
        info!("GEMINI_API_KEY not set; chat endpoint disabled");
    }

    let repos = if config.is_postgres() {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse::<PgConnectOptions>()?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;
        Repositories::postgres(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;
        Repositories::sqlite(pool)
    };

    assemble_state(config, repos, invoice_service, llm_service)
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::Database(e.into()))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::Database(e.into()))
}
