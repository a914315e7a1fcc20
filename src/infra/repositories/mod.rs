pub mod sqlite_user_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_address_repo;
pub mod sqlite_provider_repo;
pub mod sqlite_schedule_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_quote_repo;
pub mod sqlite_review_repo;
pub mod sqlite_support_repo;
pub mod sqlite_change_request_repo;
