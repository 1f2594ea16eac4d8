pub mod sqlite_booking_repo;
pub mod sqlite_event_repo;
pub mod sqlite_gallery_repo;
pub mod sqlite_inquiry_repo;
pub mod sqlite_user_repo;

pub mod postgres_booking_repo;
pub mod postgres_event_repo;
pub mod postgres_gallery_repo;
pub mod postgres_inquiry_repo;
pub mod postgres_user_repo;
