mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

fn field(body: &Value, name: &str) -> Vec<String> {
    body.as_array().unwrap().iter().map(|i| i[name].as_str().unwrap().to_string()).collect()
}

async fn add_image(app: &TestApp, admin: &str, body: Value) -> Value {
    let (status, created) = app.post("/api/v1/gallery", Some(admin), body).await;
    assert_eq!(status, StatusCode::CREATED, "image create failed: {}", created);
    created
}

#[tokio::test]
async fn test_gallery_sort_order_defaults_to_count() {
    let app = TestApp::new().await;
    let admin = app.sign_in_admin("curator").await;

    let first = add_image(&app, &admin, json!({ "image_url": "https://img.test/1.jpg", "alt": "dome" })).await;
    let second = add_image(&app, &admin, json!({ "image_url": "https://img.test/2.jpg", "alt": "crowd" })).await;
    let pinned = add_image(&app, &admin, json!({ "image_url": "https://img.test/3.jpg", "alt": "stage", "sort_order": 99 })).await;

    assert_eq!(first["sort_order"], 0);
    assert_eq!(second["sort_order"], 1);
    assert_eq!(pinned["sort_order"], 99);
}

#[tokio::test]
async fn test_gallery_listing_sources() {
    let app = TestApp::new().await;
    let admin = app.sign_in_admin("curator").await;

    add_image(&app, &admin, json!({ "image_url": "a", "alt": "A", "is_featured": true, "sort_order": 2, "event_type": "sound_bath" })).await;
    add_image(&app, &admin, json!({ "image_url": "b", "alt": "B", "is_featured": true, "sort_order": 1 })).await;
    add_image(&app, &admin, json!({ "image_url": "c", "alt": "C", "sort_order": 5, "event_type": "sound_bath" })).await;

    let (_, featured) = app.get("/api/v1/gallery?featured=true", None).await;
    assert_eq!(field(&featured, "alt"), ["B", "A"]);

    let (_, by_type) = app.get("/api/v1/gallery?event_type=sound_bath", None).await;
    assert_eq!(field(&by_type, "alt"), ["A", "C"]);

    let (_, all) = app.get("/api/v1/gallery", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, limited) = app.get("/api/v1/gallery?featured=true&limit=1", None).await;
    assert_eq!(field(&limited, "alt"), ["B"]);

    let (status, _) = app.get("/api/v1/gallery?event_type=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_gallery_update_delete_and_event_link() {
    let app = TestApp::new().await;
    let admin = app.sign_in_admin("curator").await;
    let event = app.create_event(&admin, json!({})).await;
    let event_id = event["id"].as_str().unwrap();

    let image = add_image(&app, &admin, json!({ "image_url": "x", "alt": "X", "event_id": event_id })).await;
    let id = image["id"].as_str().unwrap();

    let (_, linked) = app.get(&format!("/api/v1/events/{}/gallery", event_id), None).await;
    assert_eq!(field(&linked, "id"), [id]);

    let (status, updated) = app.put(&format!("/api/v1/gallery/{}", id), Some(&admin), json!({ "title": "Night", "is_featured": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Night");
    assert_eq!(updated["is_featured"], true);
    assert_eq!(updated["alt"], "X");

    let (status, _) = app.request(Method::DELETE, &format!("/api/v1/gallery/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.request(Method::DELETE, &format!("/api/v1/gallery/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn inquiry_body(name: &str) -> Value {
    json!({
        "name": name,
        "email": format!("{}@example.com", name),
        "event_type": "corporate_event",
        "estimated_guests": 180,
        "message": "Can we rent the balloon for an offsite?"
    })
}

#[tokio::test]
async fn test_inquiry_links_signed_in_user() {
    let app = TestApp::new().await;
    let member = app.sign_in("member").await;

    let (status, anonymous) = app.post("/api/v1/inquiries", None, inquiry_body("anon")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(anonymous["status"], "new");
    assert!(anonymous["user_id"].is_null());

    let (status, linked) = app.post("/api/v1/inquiries", Some(&member), inquiry_body("member")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(linked["user_id"].is_string());

    let (status, _) = app.post("/api/v1/inquiries", None, json!({ "name": "", "email": "e@x", "message": "hi" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inquiry_status_workflow() {
    let app = TestApp::new().await;
    let admin = app.sign_in_admin("host").await;
    let guest = app.sign_in("visitor").await;

    let (_, first) = app.post("/api/v1/inquiries", None, inquiry_body("first")).await;
    let (_, second) = app.post("/api/v1/inquiries", None, inquiry_body("second")).await;
    let id = first["id"].as_str().unwrap();
    let uri = format!("/api/v1/inquiries/{}/status", id);

    let (status, _) = app.get("/api/v1/inquiries", Some(&guest)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, contacted) = app.put(&uri, Some(&admin), json!({ "status": "contacted", "admin_notes": "Called back" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contacted["status"], "contacted");
    assert_eq!(contacted["admin_notes"], "Called back");
    assert!(contacted["responded_at"].is_i64());

    let (_, closed) = app.put(&uri, Some(&admin), json!({ "status": "closed" })).await;
    assert_eq!(closed["admin_notes"], "Called back");

    let (_, new_only) = app.get("/api/v1/inquiries?status=new", Some(&admin)).await;
    assert_eq!(field(&new_only, "id"), [second["id"].as_str().unwrap()]);

    let (_, all) = app.get("/api/v1/inquiries?limit=1", Some(&admin)).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = app.put(&uri, Some(&admin), json!({ "status": "spam" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request(Method::DELETE, &format!("/api/v1/inquiries/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&format!("/api/v1/inquiries/{}", id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
