use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{EventType, now_millis, text_enum};

text_enum!(InquiryStatus, "inquiry status", {
    New => "new",
    Contacted => "contacted",
    Converted => "converted",
    Closed => "closed",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Inquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub event_type: Option<EventType>,
    pub preferred_date: Option<i64>,
    pub estimated_guests: Option<i32>,
    pub message: String,
    pub status: InquiryStatus,
    pub admin_notes: Option<String>,
    pub user_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub responded_at: Option<i64>,
}

pub struct NewInquiryParams {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub event_type: Option<EventType>,
    pub preferred_date: Option<i64>,
    pub estimated_guests: Option<i32>,
    pub message: String,
    pub user_id: Option<String>,
}

impl Inquiry {
    pub fn new(params: NewInquiryParams) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            email: params.email,
            phone: params.phone,
            company_name: params.company_name,
            event_type: params.event_type,
            preferred_date: params.preferred_date,
            estimated_guests: params.estimated_guests,
            message: params.message,
            status: InquiryStatus::New,
            admin_notes: None,
            user_id: params.user_id,
            created_at: now,
            updated_at: now,
            responded_at: None,
        }
    }

    /// Moves the inquiry to `status`; reaching `contacted` records when the
    /// venue responded.
    pub fn apply_status(&mut self, status: InquiryStatus, admin_notes: Option<String>, now: i64) {
        self.status = status;
        self.updated_at = now;
        if let Some(notes) = admin_notes {
            self.admin_notes = Some(notes);
        }
        if status == InquiryStatus::Contacted {
            self.responded_at = Some(now);
        }
    }
}
