mod common;

use axum::http::StatusCode;
use chrono::{Duration, SecondsFormat, Utc};
use common::{oslo, parse_body, rfc3339, upcoming_monday, AuthHeaders, TestApp};
use marketplace_backend::domain::models::booking::{Booking, NewBookingParams, BookingLineItem, BookingStatus, PaymentMethod};
use serde_json::{json, Value};

struct Setup {
    customer: AuthHeaders,
    address_id: String,
    provider: AuthHeaders,
    provider_id: String,
    service_id: String,
}

async fn setup(app: &TestApp) -> Setup {
    let (provider, provider_id) = app.approved_provider().await;
    let service_id = app.add_service(&provider, &provider_id, "Hovedrengjøring", 1000, 60).await;
    app.set_schedule(&provider, 1, "09:00", "12:00").await;
    let (customer, address_id) = app.customer_with_address().await;
    Setup { customer, address_id, provider, provider_id, service_id }
}

async fn book(app: &TestApp, s: &Setup, customer: &AuthHeaders, address_id: &str, hhmm: &str) -> axum::response::Response {
    app.send("POST", "/api/v1/bookings", Some(customer), Some(json!({
        "provider_id": s.provider_id,
        "address_id": address_id,
        "service_ids": [s.service_id],
        "scheduled_at": rfc3339(oslo(upcoming_monday(), hhmm)),
        "payment_method": "vipps",
        "notes": "Nøkkel under matta"
    }))).await
}

/// Stores a confirmed booking directly so the start time can be any distance from now.
async fn confirmed_booking_in(app: &TestApp, s: &Setup, hours: i64) -> Booking {
    let booking = Booking::new(NewBookingParams {
        customer_id: s.customer.user_id.clone(),
        provider_id: s.provider_id.clone(),
        address_id: s.address_id.clone(),
        scheduled_at: Utc::now() + Duration::hours(hours),
        services: vec![BookingLineItem {
            service_id: Some(s.service_id.clone()),
            name: "Hovedrengjøring".into(),
            price: 1000,
            duration_min: 60,
        }],
        payment_method: PaymentMethod::Card,
        platform_fee_percent: 15,
        recipient_name: None,
        recipient_phone: None,
        notes: None,
        quote_response_id: None,
    });
    let created = app.state.booking_repo.create(&booking).await.unwrap();
    app.state.booking_repo.update_status(&created.id, BookingStatus::Confirmed, None).await.unwrap()
}

#[tokio::test]
async fn test_create_booking_prices_and_confirms() {
    let app = TestApp::new().await;
    let s = setup(&app).await;

    let res = book(&app, &s, &s.customer, &s.address_id, "10:00").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = parse_body(res).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["payment_status"], "pending");
    assert_eq!(body["total_price"], 1000);
    assert_eq!(body["platform_fee"], 150);
    assert_eq!(body["provider_payout"], 850);
    assert_eq!(body["notes"], "Nøkkel under matta");
    assert_eq!(body["services"][0]["name"], "Hovedrengjøring");
    assert_eq!(body["services"][0]["price"], 1000);
    assert!(body["cancellation"].is_null());

    // The booked slot disappears from the calendar.
    let res = app.send("GET", &format!("/api/v1/providers/{}/slots?date={}", s.provider_id, upcoming_monday()), None, None).await;
    assert_eq!(parse_body(res).await["slots"], json!(["09:00", "09:30", "10:30", "11:00", "11:30"]));

    let at = rfc3339(oslo(upcoming_monday(), "10:00"));
    let res = app.send("GET", &format!("/api/v1/providers/{}/availability?at={}", s.provider_id, at), None, None).await;
    let check = parse_body(res).await;
    assert_eq!(check["available"], false);
    assert_eq!(check["reason"], "Tidspunktet er allerede booket");
}

#[tokio::test]
async fn test_double_booking_same_instant_conflicts() {
    let app = TestApp::new().await;
    let s = setup(&app).await;

    let res = book(&app, &s, &s.customer, &s.address_id, "10:00").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let (other, other_address) = app.customer_with_address().await;
    let res = book(&app, &s, &other, &other_address, "10:00").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = book(&app, &s, &other, &other_address, "10:30").await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_fractional_seconds_cannot_dodge_conflicts() {
    let app = TestApp::new().await;
    let s = setup(&app).await;

    let fractional = (oslo(upcoming_monday(), "10:00") + Duration::milliseconds(500))
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let res = app.send("POST", "/api/v1/bookings", Some(&s.customer), Some(json!({
        "provider_id": s.provider_id,
        "address_id": s.address_id,
        "service_ids": [s.service_id],
        "scheduled_at": fractional,
        "payment_method": "vipps"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("GET", &format!("/api/v1/providers/{}/slots?date={}", s.provider_id, upcoming_monday()), None, None).await;
    assert_eq!(parse_body(res).await["slots"], json!(["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]));

    let res = book(&app, &s, &s.customer, &s.address_id, "10:00").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let (other, other_address) = app.customer_with_address().await;
    let res = book(&app, &s, &other, &other_address, "10:00").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_store_rejects_second_active_booking_at_instant() {
    let app = TestApp::new().await;
    let s = setup(&app).await;

    let first = confirmed_booking_in(&app, &s, 72).await;
    let mut second = Booking::new(NewBookingParams {
        customer_id: s.customer.user_id.clone(),
        provider_id: s.provider_id.clone(),
        address_id: s.address_id.clone(),
        scheduled_at: first.scheduled_at,
        services: first.services.clone(),
        payment_method: PaymentMethod::Vipps,
        platform_fee_percent: 15,
        recipient_name: None,
        recipient_phone: None,
        notes: None,
        quote_response_id: None,
    });
    second.status = BookingStatus::Pending;

    let err = app.state.booking_repo.create(&second).await.unwrap_err();
    assert!(matches!(err, marketplace_backend::error::AppError::Conflict(_)));
}

#[tokio::test]
async fn test_booking_preconditions() {
    let app = TestApp::new().await;
    let s = setup(&app).await;

    // Outside working hours.
    let res = book(&app, &s, &s.customer, &s.address_id, "13:00").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Off the half-hour grid.
    let res = book(&app, &s, &s.customer, &s.address_id, "10:15").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Someone else's address.
    let (other, _) = app.customer_with_address().await;
    let res = book(&app, &s, &other, &s.address_id, "10:00").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Providers cannot book.
    let res = book(&app, &s, &s.provider, &s.address_id, "10:00").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // No services.
    let res = app.send("POST", "/api/v1/bookings", Some(&s.customer), Some(json!({
        "provider_id": s.provider_id,
        "address_id": s.address_id,
        "service_ids": [],
        "scheduled_at": rfc3339(oslo(upcoming_monday(), "10:00")),
        "payment_method": "card"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // In the past.
    let res = app.send("POST", "/api/v1/bookings", Some(&s.customer), Some(json!({
        "provider_id": s.provider_id,
        "address_id": s.address_id,
        "service_ids": [s.service_id],
        "scheduled_at": rfc3339(Utc::now() - Duration::days(1)),
        "payment_method": "card"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unauthenticated.
    let res = app.send("POST", "/api/v1/bookings", None, Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unapproved_provider_cannot_be_booked() {
    let app = TestApp::new().await;
    let provider = app.register_and_login("PROVIDER").await;
    let res = app.send("POST", "/api/v1/providers", Some(&provider), Some(json!({ "business_name": "Ny AS" }))).await;
    let provider_id = parse_body(res).await["id"].as_str().unwrap().to_string();
    let service_id = app.add_service(&provider, &provider_id, "Vask", 500, 30).await;
    app.set_schedule(&provider, 1, "09:00", "12:00").await;
    let (customer, address_id) = app.customer_with_address().await;

    let res = app.send("POST", "/api/v1/bookings", Some(&customer), Some(json!({
        "provider_id": provider_id,
        "address_id": address_id,
        "service_ids": [service_id],
        "scheduled_at": rfc3339(oslo(upcoming_monday(), "10:00")),
        "payment_method": "card"
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_pending_booking_confirm_and_complete() {
    let app = TestApp::with_auto_confirm(false).await;
    let s = setup(&app).await;

    let res = book(&app, &s, &s.customer, &s.address_id, "09:30").await;
    let booking = parse_body(res).await;
    assert_eq!(booking["status"], "pending");
    let id = booking["id"].as_str().unwrap();

    // Pending bookings hold the slot too.
    let res = app.send("GET", &format!("/api/v1/providers/{}/slots?date={}", s.provider_id, upcoming_monday()), None, None).await;
    let slots = parse_body(res).await;
    assert!(!slots["slots"].as_array().unwrap().contains(&json!("09:30")));

    // Only the owning provider confirms.
    let res = app.send("POST", &format!("/api/v1/bookings/{}/confirm", id), Some(&s.customer), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let (other_provider, _) = app.approved_provider().await;
    let res = app.send("POST", &format!("/api/v1/bookings/{}/confirm", id), Some(&other_provider), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("POST", &format!("/api/v1/bookings/{}/confirm", id), Some(&s.provider), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "confirmed");

    // Confirming again is a no-op.
    let res = app.send("POST", &format!("/api/v1/bookings/{}/confirm", id), Some(&s.provider), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.send("POST", &format!("/api/v1/bookings/{}/complete", id), Some(&s.provider), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let completed = parse_body(res).await;
    assert_eq!(completed["status"], "completed");
    assert!(!completed["completed_at"].is_null());

    let res = app.send("POST", &format!("/api/v1/bookings/{}/confirm", id), Some(&s.provider), None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let res = app.send("POST", &format!("/api/v1/bookings/{}/complete", id), Some(&s.provider), None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let res = app.send("POST", &format!("/api/v1/bookings/{}/cancel", id), Some(&s.customer), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_late_cancellation_costs_half() {
    let app = TestApp::new().await;
    let s = setup(&app).await;
    let booking = confirmed_booking_in(&app, &s, 10).await;

    let res = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking.id), Some(&s.customer), Some(json!({
        "reason": "Blir bortreist"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["cancellation"]["cancelled_by"], "customer");
    assert_eq!(body["cancellation"]["was_within_24_hours"], true);
    assert_eq!(body["cancellation"]["cancellation_fee"], 500);
    assert_eq!(body["cancellation"]["reason"], "Blir bortreist");

    let res = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking.id), Some(&s.customer), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_early_cancellation_is_free() {
    let app = TestApp::new().await;
    let s = setup(&app).await;
    let booking = confirmed_booking_in(&app, &s, 48).await;

    let res = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking.id), Some(&s.provider), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["cancellation"]["cancelled_by"], "provider");
    assert_eq!(body["cancellation"]["was_within_24_hours"], false);
    assert_eq!(body["cancellation"]["cancellation_fee"], 0);

    let admin = app.admin().await;
    let res = app.send("POST", &format!("/api/v1/admin/bookings/{}/refund-fee", booking.id), Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_stranger_cannot_cancel() {
    let app = TestApp::new().await;
    let s = setup(&app).await;
    let booking = confirmed_booking_in(&app, &s, 48).await;

    let (stranger, _) = app.customer_with_address().await;
    let res = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking.id), Some(&stranger), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("GET", &format!("/api/v1/bookings/{}", booking.id), Some(&s.customer), None).await;
    assert_eq!(parse_body(res).await["status"], "confirmed");
}

#[tokio::test]
async fn test_admin_refunds_late_fee_once() {
    let app = TestApp::new().await;
    let s = setup(&app).await;
    let booking = confirmed_booking_in(&app, &s, 2).await;

    app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking.id), Some(&s.customer), Some(json!({}))).await;

    let res = app.send("POST", &format!("/api/v1/admin/bookings/{}/refund-fee", booking.id), Some(&s.customer), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin = app.admin().await;
    let res = app.send("POST", &format!("/api/v1/admin/bookings/{}/refund-fee", booking.id), Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["payment_status"], "refunded");
    assert_eq!(body["cancellation"]["fee_refunded"], true);
    assert!(!body["cancellation"]["fee_refunded_at"].is_null());

    let res = app.send("POST", &format!("/api/v1/admin/bookings/{}/refund-fee", booking.id), Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_booking_visibility_and_lists() {
    let app = TestApp::new().await;
    let s = setup(&app).await;
    let res = book(&app, &s, &s.customer, &s.address_id, "11:00").await;
    let id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.send("GET", "/api/v1/bookings/mine", Some(&s.customer), None).await;
    let mine: Value = parse_body(res).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["id"], id.as_str());

    let res = app.send("GET", "/api/v1/bookings/provider", Some(&s.provider), None).await;
    let theirs: Value = parse_body(res).await;
    assert_eq!(theirs[0]["id"], id.as_str());

    let res = app.send("GET", &format!("/api/v1/bookings/{}", id), Some(&s.provider), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let admin = app.admin().await;
    let res = app.send("GET", &format!("/api/v1/bookings/{}", id), Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let (stranger, _) = app.customer_with_address().await;
    let res = app.send("GET", &format!("/api/v1/bookings/{}", id), Some(&stranger), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("GET", "/api/v1/bookings/does-not-exist", Some(&s.customer), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
