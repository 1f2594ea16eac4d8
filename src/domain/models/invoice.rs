use serde::{Deserialize, Serialize};

/// Everything the payment provider needs to bill one booking.
#[derive(Debug, Clone)]
pub struct InvoiceRequest {
    pub user_id: String,
    pub customer_email: String,
    pub customer_name: String,
    /// Smallest currency unit.
    pub amount: i64,
    pub description: Option<String>,
    pub event_title: String,
    pub booking_id: String,
    pub number_of_guests: i32,
}

impl InvoiceRequest {
    pub fn line_item_description(&self) -> String {
        format!("{} - {} guest(s)", self.event_title, self.number_of_guests)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssuedInvoice {
    pub invoice_id: String,
    pub invoice_url: String,
    pub customer_id: String,
}
