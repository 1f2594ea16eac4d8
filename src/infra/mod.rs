pub mod ai;
pub mod factory;
pub mod payments;
pub mod repositories;
