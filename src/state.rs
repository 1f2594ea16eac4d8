use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, EventRepository, GalleryRepository, InquiryRepository, InvoiceService,
    LlmService, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking_service::BookingService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub gallery_repo: Arc<dyn GalleryRepository>,
    pub inquiry_repo: Arc<dyn InquiryRepository>,
    pub auth_service: Arc<AuthService>,
    pub booking_service: Arc<BookingService>,
    pub invoice_service: Arc<dyn InvoiceService>,
    /// Absent when no model API key is configured.
    pub llm_service: Option<Arc<dyn LlmService>>,
}
