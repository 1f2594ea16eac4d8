use crate::domain::models::{
    booking::{Booking, BookingStatus, PaymentRefs},
    chat::ChatMessage,
    event::{Event, EventStatus},
    gallery::GalleryImage,
    inquiry::{Inquiry, InquiryStatus},
    invoice::{InvoiceRequest, IssuedInvoice},
    user::{User, UserRole},
    EventType,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user, or refreshes the profile of the one with the same
    /// `external_id`. Identity and role of an existing user are kept.
    async fn upsert_by_external_id(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn update_role(&self, id: &str, role: UserRole, now: i64) -> Result<Option<User>, AppError>;
    async fn set_payment_customer_id(&self, id: &str, customer_id: &str, now: i64) -> Result<(), AppError>;
}

/// Drift found and corrected by a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendeeDrift {
    pub before: i32,
    pub after: i32,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;
    /// All events, earliest date first.
    async fn list_by_date(&self) -> Result<Vec<Event>, AppError>;
    /// Events whose featured flag equals `featured`, earliest date first.
    async fn list_featured(&self, featured: bool) -> Result<Vec<Event>, AppError>;
    /// Events with `status`, oldest record first.
    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, AppError>;
    /// Published events dated at or after `from`, earliest first.
    async fn list_upcoming(&self, from: i64) -> Result<Vec<Event>, AppError>;
    async fn list_ids(&self) -> Result<Vec<String>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Recomputes the attendee counter from the event's non-cancelled
    /// bookings. Returns the correction when the stored value was off.
    async fn reconcile_attendees(&self, id: &str, now: i64) -> Result<Option<AttendeeDrift>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and adds its guests to the event counter in one
    /// transaction. A missing event leaves the counter untouched.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_all(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, AppError>;
    /// Persists status, lifecycle stamps and payment references.
    async fn update_status(&self, booking: &Booking) -> Result<Booking, AppError>;
    /// Cancels the booking, stores any given payment references and releases
    /// its guests from the event counter (floored at zero) in one
    /// transaction. An already cancelled booking is returned untouched.
    /// `None` when no booking has this id.
    async fn cancel(
        &self,
        id: &str,
        reason: Option<&str>,
        refs: &PaymentRefs,
        now: i64,
    ) -> Result<Option<Booking>, AppError>;
}

#[async_trait]
pub trait GalleryRepository: Send + Sync {
    async fn create(&self, image: &GalleryImage) -> Result<GalleryImage, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<GalleryImage>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn list_featured(&self, featured: bool) -> Result<Vec<GalleryImage>, AppError>;
    async fn list_by_event_type(&self, event_type: EventType) -> Result<Vec<GalleryImage>, AppError>;
    /// Newest upload first.
    async fn list_recent(&self) -> Result<Vec<GalleryImage>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<GalleryImage>, AppError>;
    async fn update(&self, image: &GalleryImage) -> Result<GalleryImage, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait InquiryRepository: Send + Sync {
    async fn create(&self, inquiry: &Inquiry) -> Result<Inquiry, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>, AppError>;
    /// Newest first.
    async fn list(&self, status: Option<InquiryStatus>) -> Result<Vec<Inquiry>, AppError>;
    async fn update(&self, inquiry: &Inquiry) -> Result<Inquiry, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// Finds or creates the provider customer, bills the booking, then
    /// finalizes and sends the invoice.
    async fn create_and_send(&self, request: &InvoiceRequest) -> Result<IssuedInvoice, AppError>;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn chat(
        &self,
        system_instruction: &str,
        messages: &[ChatMessage],
    ) -> Result<String, AppError>;
}
