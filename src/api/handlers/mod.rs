pub mod booking;
pub mod chat;
pub mod event;
pub mod gallery;
pub mod health;
pub mod inquiry;
pub mod invoice;
pub mod user;
