use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCreatedResponse {
    pub success: bool,
    pub invoice_id: String,
    pub invoice_url: String,
    pub customer_id: String,
}

#[derive(Serialize)]
pub struct ReconcileResponse {
    pub event_id: String,
    pub corrected: bool,
    pub before: Option<i32>,
    pub current_attendees: i32,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub role: &'static str,
    pub content: String,
}
