pub mod assistant;
pub mod auth_service;
pub mod booking_service;
pub mod catalog;
pub mod reconciliation;
