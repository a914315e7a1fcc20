pub mod address_service;
pub mod admin_service;
pub mod auth_service;
pub mod availability;
pub mod booking_service;
pub mod guards;
pub mod provider_service;
pub mod quote_service;
pub mod review_service;
pub mod schedule_service;
pub mod support_service;
