use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    address, admin, auth, booking, change_request, health, provider, quote, review, schedule, support,
};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/logout-all", post(auth::logout_everywhere))
        .route("/api/v1/auth/me", get(auth::me))

        // Addresses
        .route("/api/v1/addresses", get(address::list_addresses).post(address::create_address))
        .route("/api/v1/addresses/{address_id}", delete(address::delete_address))

        // Providers & Catalog
        .route("/api/v1/providers", post(provider::create_provider))
        .route("/api/v1/providers/{provider_id}", get(provider::get_provider))
        .route("/api/v1/providers/{provider_id}/services", get(provider::list_services).post(provider::create_service))
        .route("/api/v1/services/{service_id}", delete(provider::deactivate_service))

        // Schedule
        .route("/api/v1/providers/{provider_id}/schedule", get(schedule::get_weekly_schedule))
        .route("/api/v1/schedule/{day}", put(schedule::update_weekly_schedule))
        .route("/api/v1/providers/{provider_id}/blocked-dates", get(schedule::list_blocked_dates))
        .route("/api/v1/schedule/blocked-dates", post(schedule::add_blocked_date))
        .route("/api/v1/schedule/blocked-dates/{date}", delete(schedule::remove_blocked_date))

        // Availability
        .route("/api/v1/providers/{provider_id}/slots", get(schedule::get_slots))
        .route("/api/v1/providers/{provider_id}/availability", get(schedule::check_availability))

        // Bookings
        .route("/api/v1/bookings", post(booking::create_booking))
        .route("/api/v1/bookings/mine", get(booking::list_my_bookings))
        .route("/api/v1/bookings/provider", get(booking::list_provider_bookings))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))
        .route("/api/v1/bookings/{booking_id}/confirm", post(booking::confirm_booking))
        .route("/api/v1/bookings/{booking_id}/complete", post(booking::complete_booking))
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking::cancel_booking))

        // Quotes
        .route("/api/v1/quotes", post(quote::create_quote_request))
        .route("/api/v1/quotes/mine", get(quote::list_my_quote_requests))
        .route("/api/v1/quotes/open", get(quote::list_open_quote_requests))
        .route("/api/v1/quotes/{quote_request_id}", get(quote::get_quote_request))
        .route("/api/v1/quotes/{quote_request_id}/responses", post(quote::respond_to_quote))
        .route("/api/v1/quotes/{quote_request_id}/cancel", post(quote::cancel_quote_request))
        .route("/api/v1/quote-responses/mine", get(quote::list_my_responses))
        .route("/api/v1/quote-responses/{response_id}/accept", post(quote::accept_quote_response))
        .route("/api/v1/quote-responses/{response_id}/book", post(quote::book_accepted_quote))

        // Reviews
        .route("/api/v1/reviews", post(review::create_review))
        .route("/api/v1/providers/{provider_id}/reviews", get(review::list_provider_reviews))

        // Support
        .route("/api/v1/support/tickets", get(support::list_my_tickets).post(support::create_ticket))
        .route("/api/v1/support/tickets/{ticket_id}", get(support::get_ticket))
        .route("/api/v1/support/tickets/{ticket_id}/responses", post(support::respond_to_ticket))

        // Provider change requests
        .route("/api/v1/change-requests", get(change_request::list_my_change_requests).post(change_request::submit_change_request))

        // Admin
        .route("/api/v1/admin/stats", get(admin::dashboard_stats))
        .route("/api/v1/admin/providers/{provider_id}/approve", post(admin::approve_provider))
        .route("/api/v1/admin/providers/{provider_id}/reject", post(admin::reject_provider))
        .route("/api/v1/admin/change-requests", get(admin::list_change_requests))
        .route("/api/v1/admin/change-requests/{id}/approve", post(admin::approve_change_request))
        .route("/api/v1/admin/change-requests/{id}/reject", post(admin::reject_change_request))
        .route("/api/v1/admin/support/tickets", get(admin::list_tickets))
        .route("/api/v1/admin/support/tickets/{ticket_id}/status", put(admin::set_ticket_status))
        .route("/api/v1/admin/bookings/{booking_id}/refund-fee", post(admin::refund_cancellation_fee))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
