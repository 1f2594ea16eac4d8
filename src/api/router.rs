use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::cors::create_cors_layer;
use crate::api::handlers::{booking, chat, event, gallery, health, inquiry, invoice, user};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = create_cors_layer(state.config.cors_allowed_origins.as_deref());

    Router::new()
        .route("/health", get(health::health_check))

        // Users
        .route("/api/v1/users/me", post(user::sync_current_user).get(user::get_current_user))
        .route("/api/v1/users", get(user::list_users))
        .route("/api/v1/users/{id}/role", put(user::update_role))

        // Events
        .route("/api/v1/events", get(event::list_events).post(event::create_event))
        .route("/api/v1/events/upcoming", get(event::list_upcoming))
        .route("/api/v1/events/featured", get(event::list_featured))
        .route("/api/v1/events/by-slug/{slug}", get(event::get_event_by_slug))
        .route("/api/v1/events/{id}", get(event::get_event).put(event::update_event).delete(event::delete_event))
        .route("/api/v1/events/{id}/bookings", get(event::list_event_bookings))
        .route("/api/v1/events/{id}/reconcile", post(event::reconcile_event))
        .route("/api/v1/events/{id}/gallery", get(gallery::list_event_images))

        // Bookings
        .route("/api/v1/bookings", post(booking::create_booking).get(booking::list_all_bookings))
        .route("/api/v1/bookings/mine", get(booking::list_my_bookings))
        .route("/api/v1/bookings/{id}", get(booking::get_booking))
        .route("/api/v1/bookings/{id}/status", put(booking::update_booking_status))
        .route("/api/v1/bookings/{id}/cancel", post(booking::cancel_booking))

        // Gallery
        .route("/api/v1/gallery", get(gallery::list_images).post(gallery::create_image))
        .route("/api/v1/gallery/{id}", put(gallery::update_image).delete(gallery::delete_image))

        // Inquiries
        .route("/api/v1/inquiries", post(inquiry::create_inquiry).get(inquiry::list_inquiries))
        .route("/api/v1/inquiries/{id}", get(inquiry::get_inquiry).delete(inquiry::delete_inquiry))
        .route("/api/v1/inquiries/{id}/status", put(inquiry::update_inquiry_status))

        // Payments & assistant
        .route("/api/v1/invoices", post(invoice::create_invoice))
        .route("/api/v1/chat", post(chat::chat))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .with_state(state)
}
