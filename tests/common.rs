#![allow(dead_code)]

use airloft_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{
        auth::Claims,
        chat::ChatMessage,
        invoice::{InvoiceRequest, IssuedInvoice},
        user::UserRole,
    },
    domain::ports::{InvoiceService, LlmService},
    error::AppError,
    infra::factory::{assemble_state, run_sqlite_migrations, Repositories},
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

const PRIVATE_KEY_PEM: &str = include_str!("../tests/keys/test_rsa_private.pem");
const PUBLIC_KEY_PEM: &str = include_str!("../tests/keys/test_rsa_public.pem");
pub const TEST_ISSUER: &str = "https://clerk.airloft.test";

#[derive(Default)]
pub struct MockInvoiceService {
    pub fail: bool,
    pub requests: Mutex<Vec<InvoiceRequest>>,
}

#[async_trait]
impl InvoiceService for MockInvoiceService {
    async fn create_and_send(&self, request: &InvoiceRequest) -> Result<IssuedInvoice, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(AppError::Payment("card_declined: mock provider refused".into()));
        }
        Ok(IssuedInvoice {
            invoice_id: format!("in_{}", request.booking_id),
            invoice_url: format!("https://invoice.test/{}", request.booking_id),
            customer_id: "cus_test".to_string(),
        })
    }
}

pub struct MockLlmService;

#[async_trait]
impl LlmService for MockLlmService {
    async fn chat(&self, system_instruction: &str, messages: &[ChatMessage]) -> Result<String, AppError> {
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        let grounded = system_instruction.contains("Airloft");
        Ok(format!("echo:{}:grounded={}", last, grounded))
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub invoices: Arc<MockInvoiceService>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_services(MockInvoiceService::default(), true).await
    }

    pub async fn with_services(invoices: MockInvoiceService, chat_enabled: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await.expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            auth_public_key: PUBLIC_KEY_PEM.to_string(),
            auth_issuer: Some(TEST_ISSUER.to_string()),
            auth_audience: None,
            stripe_secret_key: String::new(),
            stripe_api_base: "http://localhost".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            reconcile_interval_secs: 0,
            cors_allowed_origins: None,
        };

        let invoices = Arc::new(invoices);
        let llm: Option<Arc<dyn LlmService>> = if chat_enabled { Some(Arc::new(MockLlmService)) } else { None };

        let state = assemble_state(&config, Repositories::sqlite(pool.clone()), invoices.clone(), llm)
            .expect("Failed to assemble state");
        let state = Arc::new(state);
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            invoices,
        }
    }

    /// Mints a session token the way the identity provider would.
    pub fn token_for(&self, subject: &str, email: Option<&str>) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + Duration::hours(1)).timestamp() as usize,
            iat: Some(now.timestamp() as usize),
            iss: Some(TEST_ISSUER.to_string()),
            email: email.map(String::from),
        };
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).unwrap();
        encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap()
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    /// Syncs a user for `subject` and returns their session token.
    pub async fn sign_in(&self, subject: &str) -> String {
        let email = format!("{}@example.com", subject);
        let token = self.token_for(subject, Some(&email));
        let (status, body) = self.post("/api/v1/users/me", Some(&token), json!({ "first_name": subject })).await;
        assert_eq!(status, StatusCode::OK, "sync failed: {}", body);
        token
    }

    pub async fn sign_in_admin(&self, subject: &str) -> String {
        let token = self.sign_in(subject).await;
        let user = self.state.user_repo.find_by_external_id(subject).await.unwrap().unwrap();
        self.state.user_repo.update_role(&user.id, UserRole::Admin, Utc::now().timestamp_millis()).await.unwrap();
        token
    }

    pub async fn create_event(&self, admin_token: &str, overrides: Value) -> Value {
        let mut payload = json!({
            "title": "Full Moon Sound Bath",
            "slug": format!("event-{}", Uuid::new_v4()),
            "description": "Crystal bowls under the dome.",
            "short_description": "Sound healing",
            "event_type": "sound_bath",
            "tags": ["sound", "healing"],
            "date": (Utc::now() + Duration::days(14)).timestamp_millis(),
            "start_time": "19:00",
            "end_time": "21:00",
            "capacity": 250,
            "base_price": 4500,
        });
        if let (Some(base), Some(extra)) = (payload.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        let (status, body) = self.post("/api/v1/events", Some(admin_token), payload).await;
        assert_eq!(status, StatusCode::CREATED, "event create failed: {}", body);
        body
    }

    pub async fn publish(&self, admin_token: &str, event_id: &str) -> Value {
        let (status, body) = self.put(
            &format!("/api/v1/events/{}", event_id),
            Some(admin_token),
            json!({ "status": "published" }),
        ).await;
        assert_eq!(status, StatusCode::OK, "publish failed: {}", body);
        body
    }

    pub async fn book(&self, token: &str, event_id: &str, guests: i32) -> Value {
        let (status, body) = self.post("/api/v1/bookings", Some(token), json!({
            "event_id": event_id,
            "number_of_guests": guests,
            "total_amount": 4500 * guests as i64,
            "contact_name": "Guest",
            "contact_email": "guest@example.com",
            "contact_phone": "555-0100",
        })).await;
        assert_eq!(status, StatusCode::CREATED, "booking failed: {}", body);
        body
    }

    pub async fn attendees(&self, event_id: &str) -> i64 {
        let (_, body) = self.get(&format!("/api/v1/events/{}", event_id), None).await;
        body["current_attendees"].as_i64().unwrap()
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
