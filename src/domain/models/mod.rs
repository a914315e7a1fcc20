pub mod auth;
pub mod booking;
pub mod change_request;
pub mod provider;
pub mod quote;
pub mod review;
pub mod schedule;
pub mod support;
pub mod user;
