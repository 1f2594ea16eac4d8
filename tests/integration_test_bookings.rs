mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

async fn setup(app: &TestApp, capacity: i32) -> (String, String, String) {
    let admin = app.sign_in_admin("admin_1").await;
    let guest = app.sign_in("guest_1").await;
    let event = app.create_event(&admin, json!({ "capacity": capacity })).await;
    let event_id = event["id"].as_str().unwrap().to_string();
    (admin, guest, event_id)
}

#[tokio::test]
async fn test_booking_reserves_guests_on_event() {
    let app = TestApp::new().await;
    let (_admin, guest, event_id) = setup(&app, 250).await;

    let booking = app.book(&guest, &event_id, 3).await;

    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["number_of_guests"], 3);
    assert_eq!(booking["created_at"], booking["updated_at"]);
    assert_eq!(app.attendees(&event_id).await, 3);
}

#[tokio::test]
async fn test_overbooking_then_cancel_scenario() {
    let app = TestApp::new().await;
    let (_admin, guest, event_id) = setup(&app, 10).await;

    app.book(&guest, &event_id, 4).await;
    assert_eq!(app.attendees(&event_id).await, 4);

    let big = app.book(&guest, &event_id, 8).await;
    assert_eq!(app.attendees(&event_id).await, 12);

    let (status, _) = app.post(
        &format!("/api/v1/bookings/{}/cancel", big["id"].as_str().unwrap()),
        Some(&guest),
        json!({}),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.attendees(&event_id).await, 4);
}

#[tokio::test]
async fn test_cancel_is_idempotent_across_both_paths() {
    let app = TestApp::new().await;
    let (admin, guest, event_id) = setup(&app, 50).await;

    app.book(&guest, &event_id, 2).await;
    let booking = app.book(&guest, &event_id, 5).await;
    let id = booking["id"].as_str().unwrap();

    let (status, first) = app.post(&format!("/api/v1/bookings/{}/cancel", id), Some(&guest), json!({ "reason": "Plans changed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "cancelled");
    assert_eq!(first["cancellation_reason"], "Plans changed");
    assert!(first["cancelled_at"].is_i64());
    assert_eq!(app.attendees(&event_id).await, 2);

    let (status, second) = app.post(&format!("/api/v1/bookings/{}/cancel", id), Some(&guest), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cancelled_at"], first["cancelled_at"]);
    assert_eq!(app.attendees(&event_id).await, 2);

    let (status, third) = app.put(&format!("/api/v1/bookings/{}/status", id), Some(&admin), json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(third["status"], "cancelled");
    assert_eq!(app.attendees(&event_id).await, 2);
}

#[tokio::test]
async fn test_status_transitions_stamp_lifecycle_once() {
    let app = TestApp::new().await;
    let (admin, guest, event_id) = setup(&app, 100).await;
    let booking = app.book(&guest, &event_id, 4).await;
    let uri = format!("/api/v1/bookings/{}/status", booking["id"].as_str().unwrap());

    let (status, invoiced) = app.put(&uri, Some(&guest), json!({
        "status": "invoiced",
        "invoice_id": "in_123",
        "invoice_url": "https://invoice.test/in_123"
    })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoiced["status"], "invoiced");
    assert_eq!(invoiced["invoice_id"], "in_123");
    assert!(invoiced["invoice_sent_at"].is_i64());
    assert!(invoiced["paid_at"].is_null());

    let (status, paid) = app.put(&uri, Some(&admin), json!({ "status": "paid", "payment_intent_id": "pi_9" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(paid["paid_at"].is_i64());
    assert_eq!(paid["invoice_sent_at"], invoiced["invoice_sent_at"]);
    assert_eq!(paid["invoice_id"], "in_123");
    assert_eq!(paid["payment_intent_id"], "pi_9");

    let (_, reinvoiced) = app.put(&uri, Some(&admin), json!({ "status": "invoiced" })).await;
    assert_eq!(reinvoiced["invoice_sent_at"], invoiced["invoice_sent_at"]);

    let (status, cancelled) = app.put(&uri, Some(&admin), json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cancelled["cancelled_at"].is_i64());
    assert_eq!(app.attendees(&event_id).await, 0);

    let (status, body) = app.put(&uri, Some(&admin), json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_cancel_via_status_keeps_payment_refs() {
    let app = TestApp::new().await;
    let (admin, guest, event_id) = setup(&app, 40).await;
    app.book(&guest, &event_id, 1).await;
    let booking = app.book(&guest, &event_id, 6).await;
    let uri = format!("/api/v1/bookings/{}/status", booking["id"].as_str().unwrap());
    assert_eq!(app.attendees(&event_id).await, 7);

    let (status, cancelled) = app.put(&uri, Some(&admin), json!({
        "status": "cancelled",
        "invoice_id": "in_1",
        "payment_intent_id": "pi_1"
    })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(cancelled["invoice_id"], "in_1");
    assert_eq!(cancelled["payment_intent_id"], "pi_1");
    assert!(cancelled["invoice_url"].is_null());
    assert_eq!(app.attendees(&event_id).await, 1);

    let (_, stored) = app.get(&format!("/api/v1/bookings/{}", booking["id"].as_str().unwrap()), Some(&admin)).await;
    assert_eq!(stored["invoice_id"], "in_1");
    assert_eq!(stored["payment_intent_id"], "pi_1");

    let (status, again) = app.put(&uri, Some(&admin), json!({ "status": "cancelled", "invoice_id": "in_2" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["invoice_id"], "in_1");
    assert_eq!(app.attendees(&event_id).await, 1);
}

#[tokio::test]
async fn test_owner_cannot_mark_booking_paid() {
    let app = TestApp::new().await;
    let (_admin, guest, event_id) = setup(&app, 100).await;
    let booking = app.book(&guest, &event_id, 1).await;

    let (status, _) = app.put(
        &format!("/api/v1/bookings/{}/status", booking["id"].as_str().unwrap()),
        Some(&guest),
        json!({ "status": "paid" }),
    ).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_status_literal_is_rejected() {
    let app = TestApp::new().await;
    let (admin, guest, event_id) = setup(&app, 100).await;
    let booking = app.book(&guest, &event_id, 1).await;

    let (status, _) = app.put(
        &format!("/api/v1/bookings/{}/status", booking["id"].as_str().unwrap()),
        Some(&admin),
        json!({ "status": "refunded" }),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_booking_is_not_found() {
    let app = TestApp::new().await;
    let (admin, _guest, _event_id) = setup(&app, 100).await;

    let (status, _) = app.post("/api/v1/bookings/nope/cancel", Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.put("/api/v1/bookings/nope/status", Some(&admin), json!({ "status": "paid" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get("/api/v1/bookings/nope", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_validation() {
    let app = TestApp::new().await;
    let (_admin, guest, event_id) = setup(&app, 100).await;

    let (status, _) = app.post("/api/v1/bookings", Some(&guest), json!({
        "event_id": event_id, "number_of_guests": 0, "total_amount": 0,
        "contact_name": "G", "contact_email": "g@example.com", "contact_phone": "1"
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/v1/bookings", Some(&guest), json!({
        "event_id": event_id, "number_of_guests": 2, "total_amount": -1,
        "contact_name": "G", "contact_email": "g@example.com", "contact_phone": "1"
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/v1/bookings", Some(&guest), json!({
        "event_id": "missing-event", "number_of_guests": 2, "total_amount": 100,
        "contact_name": "G", "contact_email": "g@example.com", "contact_phone": "1"
    })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.attendees(&event_id).await, 0);
}

#[tokio::test]
async fn test_booking_requires_authentication() {
    let app = TestApp::new().await;
    let (_admin, _guest, event_id) = setup(&app, 100).await;

    let (status, _) = app.post("/api/v1/bookings", None, json!({
        "event_id": event_id, "number_of_guests": 1, "total_amount": 100,
        "contact_name": "G", "contact_email": "g@example.com", "contact_phone": "1"
    })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bookings_are_private_to_owner_and_admin() {
    let app = TestApp::new().await;
    let (admin, guest, event_id) = setup(&app, 100).await;
    let other = app.sign_in("guest_2").await;
    let booking = app.book(&guest, &event_id, 2).await;
    let uri = format!("/api/v1/bookings/{}", booking["id"].as_str().unwrap());

    let (status, _) = app.get(&uri, Some(&other)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.post(&format!("{}/cancel", uri), Some(&other), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.attendees(&event_id).await, 2);

    let (status, _) = app.get(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, mine) = app.get("/api/v1/bookings/mine", Some(&guest)).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    let (_, theirs) = app.get("/api/v1/bookings/mine", Some(&other)).await;
    assert!(theirs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_booking_listings() {
    let app = TestApp::new().await;
    let (admin, guest, event_id) = setup(&app, 100).await;
    app.book(&guest, &event_id, 1).await;
    let second = app.book(&guest, &event_id, 2).await;
    app.book(&guest, &event_id, 3).await;
    app.post(&format!("/api/v1/bookings/{}/cancel", second["id"].as_str().unwrap()), Some(&guest), json!({})).await;

    let (status, _) = app.get("/api/v1/bookings", Some(&guest)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, all) = app.get("/api/v1/bookings", Some(&admin)).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, cancelled) = app.get("/api/v1/bookings?status=cancelled", Some(&admin)).await;
    assert_eq!(cancelled.as_array().unwrap().len(), 1);

    let (_, limited) = app.get("/api/v1/bookings?limit=2", Some(&admin)).await;
    assert_eq!(limited.as_array().unwrap().len(), 2);

    let (status, _) = app.get("/api/v1/bookings?status=", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, by_event) = app.get(&format!("/api/v1/events/{}/bookings", event_id), Some(&admin)).await;
    assert_eq!(by_event.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_event_bookings_newest_first() {
    let app = TestApp::new().await;
    let (admin, guest, event_id) = setup(&app, 100).await;
    let first = app.book(&guest, &event_id, 1).await;
    let second = app.book(&guest, &event_id, 2).await;

    for (booking, created_at) in [(&first, 1_000_i64), (&second, 2_000_i64)] {
        sqlx::query("UPDATE bookings SET created_at = ? WHERE id = ?")
            .bind(created_at)
            .bind(booking["id"].as_str().unwrap())
            .execute(&app.pool)
            .await
            .unwrap();
    }

    let (status, by_event) = app.get(&format!("/api/v1/events/{}/bookings", event_id), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = by_event.as_array().unwrap().iter().map(|b| b["id"].as_str().unwrap()).collect();
    assert_eq!(ids, [second["id"].as_str().unwrap(), first["id"].as_str().unwrap()]);
}

#[tokio::test]
async fn test_reconcile_repairs_counter_drift() {
    let app = TestApp::new().await;
    let (admin, guest, event_id) = setup(&app, 100).await;
    app.book(&guest, &event_id, 4).await;
    let cancelled = app.book(&guest, &event_id, 6).await;
    app.post(&format!("/api/v1/bookings/{}/cancel", cancelled["id"].as_str().unwrap()), Some(&guest), json!({})).await;

    sqlx::query("UPDATE events SET current_attendees = 42 WHERE id = ?")
        .bind(&event_id)
        .execute(&app.pool)
        .await
        .unwrap();

    let uri = format!("/api/v1/events/{}/reconcile", event_id);
    let (status, body) = app.post(&uri, Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["corrected"], true);
    assert_eq!(body["before"], 42);
    assert_eq!(body["current_attendees"], 4);

    let (_, again) = app.post(&uri, Some(&admin), json!({})).await;
    assert_eq!(again["corrected"], false);
    assert_eq!(again["current_attendees"], 4);
}
