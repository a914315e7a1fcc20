mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{parse_body, TestApp, PASSWORD};
use serde_json::json;
use tower::ServiceExt;

fn registration(email: &str, password: &str, confirm: &str, role: &str) -> serde_json::Value {
    json!({
        "email": email,
        "name": "Kari Nordmann",
        "password": password,
        "confirm_password": confirm,
        "role": role
    })
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    let res = app.send("POST", "/api/v1/auth/register", None, Some(registration("kari@example.no", PASSWORD, "annet-passord", "CUSTOMER"))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", "/api/v1/auth/register", None, Some(registration("kari@example.no", "kort", "kort", "CUSTOMER"))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", "/api/v1/auth/register", None, Some(registration("ikke-epost", PASSWORD, PASSWORD, "CUSTOMER"))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", "/api/v1/auth/register", None, Some(registration("kari@example.no", PASSWORD, PASSWORD, "ADMIN"))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", "/api/v1/auth/register", None, Some(registration("Kari@Example.no", PASSWORD, PASSWORD, "CUSTOMER"))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let user = parse_body(res).await;
    assert_eq!(user["email"], "kari@example.no");
    assert_eq!(user["role"], "CUSTOMER");
    assert!(user.get("password_hash").is_none());

    let res = app.send("POST", "/api/v1/auth/register", None, Some(registration("kari@example.no", PASSWORD, PASSWORD, "PROVIDER"))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new().await;
    app.send("POST", "/api/v1/auth/register", None, Some(registration("ola@example.no", PASSWORD, PASSWORD, "PROVIDER"))).await;

    let res = app.send("POST", "/api/v1/auth/login", None, Some(json!({
        "email": "ola@example.no", "password": "feil-passord"
    }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.send("POST", "/api/v1/auth/login", None, Some(json!({
        "email": "ingen@example.no", "password": PASSWORD
    }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let auth = app.login("ola@example.no", PASSWORD).await;
    let res = app.send("GET", "/api/v1/auth/me", Some(&auth), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let me = parse_body(res).await;
    assert_eq!(me["id"], auth.user_id.as_str());
    assert_eq!(me["role"], "PROVIDER");

    let res = app.send("GET", "/api/v1/auth/me", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mutations_require_csrf_header() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("CUSTOMER").await;

    let body = json!({ "street": "Storgata 1", "postal_code": "0155", "city": "Oslo" });

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/addresses")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/addresses")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", "feil")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Reads do not need the header.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/addresses")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("CUSTOMER").await;

    let refresh = |token: String| {
        Request::builder().method("POST").uri("/api/v1/auth/refresh")
            .header(header::COOKIE, format!("refresh_token={}", token))
            .body(Body::empty()).unwrap()
    };

    let res = app.router.clone().oneshot(refresh(auth.refresh_token.clone())).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["user"]["id"], auth.user_id.as_str());
    assert!(body["csrf_token"].as_str().is_some());

    // The presented token is single use.
    let res = app.router.clone().oneshot(refresh(auth.refresh_token.clone())).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.send("POST", "/api/v1/auth/refresh", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let app = TestApp::new().await;
    app.send("POST", "/api/v1/auth/register", None, Some(registration("per@example.no", PASSWORD, PASSWORD, "CUSTOMER"))).await;

    let laptop = app.login("per@example.no", PASSWORD).await;
    let phone = app.login("per@example.no", PASSWORD).await;

    let res = app.send("POST", "/api/v1/auth/logout-all", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.send("POST", "/api/v1/auth/logout-all", Some(&laptop), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["revoked"], 2);

    for session in [&laptop, &phone] {
        let res = app.router.clone().oneshot(
            Request::builder().method("POST").uri("/api/v1/auth/refresh")
                .header(header::COOKIE, format!("refresh_token={}", session.refresh_token))
                .body(Body::empty()).unwrap()
        ).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_addresses_belong_to_their_owner() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("CUSTOMER").await;

    let res = app.send("POST", "/api/v1/addresses", Some(&auth), Some(json!({
        "street": "Storgata 1", "postal_code": "12", "city": "Oslo"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", "/api/v1/addresses", Some(&auth), Some(json!({
        "label": "Hjem", "street": "Storgata 1", "postal_code": "0155", "city": "Oslo"
    }))).await;
    let first = parse_body(res).await;
    assert_eq!(first["is_default"], true);

    let res = app.send("POST", "/api/v1/addresses", Some(&auth), Some(json!({
        "label": "Hytta", "street": "Fjellveien 3", "postal_code": "3580", "city": "Geilo"
    }))).await;
    let second = parse_body(res).await;
    assert_eq!(second["is_default"], false);

    let res = app.send("GET", "/api/v1/addresses", Some(&auth), None).await;
    let list = parse_body(res).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[0]["label"], "Hjem");

    let other = app.register_and_login("CUSTOMER").await;
    let res = app.send("DELETE", &format!("/api/v1/addresses/{}", second["id"].as_str().unwrap()), Some(&other), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("DELETE", &format!("/api/v1/addresses/{}", second["id"].as_str().unwrap()), Some(&auth), None).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.send("DELETE", &format!("/api/v1/addresses/{}", second["id"].as_str().unwrap()), Some(&auth), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_provider_profile_visibility() {
    let app = TestApp::new().await;
    let provider = app.register_and_login("PROVIDER").await;

    let res = app.send("POST", "/api/v1/providers", Some(&provider), Some(json!({ "business_name": "Flink Frisør" }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = parse_body(res).await;
    assert_eq!(created["status"], "PENDING");
    let provider_id = created["id"].as_str().unwrap().to_string();

    let res = app.send("POST", "/api/v1/providers", Some(&provider), Some(json!({ "business_name": "Igjen" }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let customer = app.register_and_login("CUSTOMER").await;
    let res = app.send("POST", "/api/v1/providers", Some(&customer), Some(json!({ "business_name": "Kunde AS" }))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Hidden from the public until approved.
    let res = app.send("GET", &format!("/api/v1/providers/{}", provider_id), None, None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = app.send("GET", &format!("/api/v1/providers/{}", provider_id), Some(&customer), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = app.send("GET", &format!("/api/v1/providers/{}", provider_id), Some(&provider), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let admin = app.admin().await;
    let res = app.send("POST", &format!("/api/v1/admin/providers/{}/approve", provider_id), Some(&admin), None).await;
    let approved = parse_body(res).await;
    assert_eq!(approved["status"], "APPROVED");
    assert!(!approved["approved_at"].is_null());

    let res = app.send("GET", &format!("/api/v1/providers/{}", provider_id), None, None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.send("POST", &format!("/api/v1/admin/providers/{}/reject", provider_id), Some(&admin), None).await;
    let rejected = parse_body(res).await;
    assert_eq!(rejected["status"], "REJECTED");
    assert!(rejected["approved_at"].is_null());
}

#[tokio::test]
async fn test_service_catalog() {
    let app = TestApp::new().await;
    let (provider, provider_id) = app.approved_provider().await;

    let res = app.send("POST", &format!("/api/v1/providers/{}/services", provider_id), Some(&provider), Some(json!({
        "category_id": "frisor", "name": "Dameklipp", "price": 0, "duration_min": 45
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let cut = app.add_service(&provider, &provider_id, "Dameklipp", 690, 45).await;
    app.add_service(&provider, &provider_id, "Farging", 1290, 90).await;

    let (other, _) = app.approved_provider().await;
    let res = app.send("DELETE", &format!("/api/v1/services/{}", cut), Some(&other), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("DELETE", &format!("/api/v1/services/{}", cut), Some(&provider), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["is_active"], false);

    let res = app.send("GET", &format!("/api/v1/providers/{}/services", provider_id), None, None).await;
    let services = parse_body(res).await;
    assert_eq!(services.as_array().unwrap().len(), 1);
    assert_eq!(services[0]["name"], "Farging");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let res = app.send("GET", "/health", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "ok");
}
