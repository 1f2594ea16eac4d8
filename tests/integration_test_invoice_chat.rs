mod common;

use axum::http::StatusCode;
use common::{MockInvoiceService, TestApp};
use serde_json::{json, Value};

fn invoice_body(booking_id: &str) -> Value {
    json!({
        "customerEmail": "guest@example.com",
        "customerName": "Guest",
        "amount": 13500,
        "eventTitle": "Full Moon Sound Bath",
        "bookingId": booking_id,
        "numberOfGuests": 3
    })
}

#[tokio::test]
async fn test_invoice_created_and_customer_remembered() {
    let app = TestApp::new().await;
    let guest = app.sign_in("payer").await;

    let (status, body) = app.post("/api/v1/invoices", Some(&guest), invoice_body("bk_1")).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["invoiceId"], "in_bk_1");
    assert_eq!(body["invoiceUrl"], "https://invoice.test/bk_1");
    assert_eq!(body["customerId"], "cus_test");

    let sent = app.invoices.requests.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].line_item_description(), "Full Moon Sound Bath - 3 guest(s)");

    let (_, me) = app.get("/api/v1/users/me", Some(&guest)).await;
    assert_eq!(me["payment_customer_id"], "cus_test");
}

#[tokio::test]
async fn test_invoice_then_status_update_records_refs() {
    let app = TestApp::new().await;
    let admin = app.sign_in_admin("inv_admin").await;
    let guest = app.sign_in("inv_guest").await;
    let event = app.create_event(&admin, json!({})).await;
    let booking = app.book(&guest, event["id"].as_str().unwrap(), 3).await;
    let booking_id = booking["id"].as_str().unwrap();

    let (_, invoice) = app.post("/api/v1/invoices", Some(&guest), invoice_body(booking_id)).await;

    let (status, updated) = app.put(&format!("/api/v1/bookings/{}/status", booking_id), Some(&guest), json!({
        "status": "invoiced",
        "invoice_id": invoice["invoiceId"],
        "invoice_url": invoice["invoiceUrl"]
    })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["invoice_id"], invoice["invoiceId"]);
    assert!(updated["invoice_sent_at"].is_i64());
}

#[tokio::test]
async fn test_provider_failure_is_generic_500() {
    let failing = MockInvoiceService { fail: true, ..Default::default() };
    let app = TestApp::with_services(failing, true).await;
    let guest = app.sign_in("unlucky").await;

    let (status, body) = app.post("/api/v1/invoices", Some(&guest), invoice_body("bk_2")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to create invoice" }));
}

#[tokio::test]
async fn test_invoice_requires_auth_and_positive_amount() {
    let app = TestApp::new().await;
    let guest = app.sign_in("careful").await;

    let (status, _) = app.post("/api/v1/invoices", None, invoice_body("bk_3")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut body = invoice_body("bk_3");
    body["amount"] = json!(0);
    let (status, _) = app.post("/api/v1/invoices", Some(&guest), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.invoices.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_forwards_history_with_venue_prompt() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/v1/chat", None, json!({
        "messages": [
            { "role": "user", "content": "Hi" },
            { "role": "assistant", "content": "Welcome to Airloft!" },
            { "role": "user", "content": "How many guests fit?" }
        ]
    })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "assistant");
    assert_eq!(body["content"], "echo:How many guests fit?:grounded=true");
}

#[tokio::test]
async fn test_chat_rejects_bad_history() {
    let app = TestApp::new().await;

    let (status, _) = app.post("/api/v1/chat", None, json!({ "messages": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/v1/chat", None, json!({
        "messages": [{ "role": "assistant", "content": "Hello" }]
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_unavailable_without_model() {
    let app = TestApp::with_services(MockInvoiceService::default(), false).await;

    let (status, body) = app.post("/api/v1/chat", None, json!({
        "messages": [{ "role": "user", "content": "Hi" }]
    })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}
