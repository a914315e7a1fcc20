mod common;

use axum::http::StatusCode;
use common::{parse_body, AuthHeaders, TestApp};
use serde_json::{json, Value};

async fn submit(app: &TestApp, provider: &AuthHeaders, change: Value) -> axum::response::Response {
    app.send("POST", "/api/v1/change-requests", Some(provider), Some(change)).await
}

async fn profile(app: &TestApp, provider_id: &str) -> Value {
    let res = app.send("GET", &format!("/api/v1/providers/{}", provider_id), None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

async fn approve(app: &TestApp, admin: &AuthHeaders, request: &Value) {
    let id = request["id"].as_str().unwrap();
    let res = app.send("POST", &format!("/api/v1/admin/change-requests/{}/approve", id), Some(admin), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_approval_applies_change_once() {
    let app = TestApp::new().await;
    let (provider, provider_id) = app.approved_provider().await;
    let admin = app.admin().await;

    let res = submit(&app, &provider, json!({
        "change_type": "ADD_LANGUAGE",
        "data": { "language": "norsk" }
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let request = parse_body(res).await;
    assert_eq!(request["status"], "PENDING");
    assert_eq!(request["change_type"], "ADD_LANGUAGE");
    assert_eq!(request["payload"]["data"]["language"], "norsk");
    let request_id = request["id"].as_str().unwrap().to_string();

    // Nothing changes until an admin approves.
    assert_eq!(profile(&app, &provider_id).await["languages"], json!([]));

    let res = app.send("GET", "/api/v1/admin/change-requests?status=PENDING", Some(&admin), None).await;
    let pending = parse_body(res).await;
    assert!(pending.as_array().unwrap().iter().any(|r| r["id"] == request_id.as_str()));

    let res = app.send("POST", &format!("/api/v1/admin/change-requests/{}/approve", request_id), Some(&admin), Some(json!({
        "note": "Dokumentert"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let approved = parse_body(res).await;
    assert_eq!(approved["status"], "APPROVED");
    assert_eq!(approved["reviewed_by"], admin.user_id.as_str());
    assert_eq!(approved["admin_note"], "Dokumentert");

    let languages = profile(&app, &provider_id).await["languages"].clone();
    assert_eq!(languages.as_array().unwrap().len(), 1);
    assert_eq!(languages[0]["language"], "norsk");

    let res = app.send("POST", &format!("/api/v1/admin/change-requests/{}/approve", request_id), Some(&admin), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let res = app.send("POST", &format!("/api/v1/admin/change-requests/{}/reject", request_id), Some(&admin), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rejection_leaves_profile_alone() {
    let app = TestApp::new().await;
    let (provider, provider_id) = app.approved_provider().await;
    let admin = app.admin().await;

    let res = submit(&app, &provider, json!({
        "change_type": "UPDATE_BIO",
        "data": { "bio": "Beste i byen" }
    })).await;
    let request_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.send("POST", &format!("/api/v1/admin/change-requests/{}/reject", request_id), Some(&admin), Some(json!({
        "note": "Kan ikke dokumenteres"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "REJECTED");

    assert_eq!(profile(&app, &provider_id).await["bio"], "Erfarne fagfolk");

    let res = app.send("GET", "/api/v1/change-requests", Some(&provider), None).await;
    let mine = parse_body(res).await;
    assert_eq!(mine[0]["status"], "REJECTED");
}

#[tokio::test]
async fn test_certificate_and_compliance_changes() {
    let app = TestApp::new().await;
    let (provider, provider_id) = app.approved_provider().await;
    let admin = app.admin().await;

    let res = submit(&app, &provider, json!({
        "change_type": "ADD_CERTIFICATE",
        "data": { "name": "Fagbrev elektriker", "issuer": "Udir", "year": 2015 }
    })).await;
    approve(&app, &admin, &parse_body(res).await).await;

    let res = submit(&app, &provider, json!({
        "change_type": "UPDATE_POLICE_CHECK",
        "data": { "has_police_check": true }
    })).await;
    approve(&app, &admin, &parse_body(res).await).await;

    let current = profile(&app, &provider_id).await;
    assert_eq!(current["has_police_check"], true);
    assert_eq!(current["has_insurance"], false);
    assert_eq!(current["certificates"][0]["name"], "Fagbrev elektriker");
    let certificate_id = current["certificates"][0]["id"].as_str().unwrap().to_string();

    let res = submit(&app, &provider, json!({
        "change_type": "REMOVE_CERTIFICATE",
        "data": { "certificate_id": certificate_id }
    })).await;
    approve(&app, &admin, &parse_body(res).await).await;
    assert_eq!(profile(&app, &provider_id).await["certificates"], json!([]));

    // Removing it again finds nothing, and the request stays pending.
    let res = submit(&app, &provider, json!({
        "change_type": "REMOVE_CERTIFICATE",
        "data": { "certificate_id": certificate_id }
    })).await;
    let request_id = parse_body(res).await["id"].as_str().unwrap().to_string();
    let res = app.send("POST", &format!("/api/v1/admin/change-requests/{}/approve", request_id), Some(&admin), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.send("GET", "/api/v1/change-requests", Some(&provider), None).await;
    let mine = parse_body(res).await;
    let stuck = mine.as_array().unwrap().iter().find(|r| r["id"] == request_id.as_str()).unwrap();
    assert_eq!(stuck["status"], "PENDING");
}

#[tokio::test]
async fn test_malformed_change_is_rejected() {
    let app = TestApp::new().await;
    let (provider, _) = app.approved_provider().await;

    let res = submit(&app, &provider, json!({ "change_type": "DELETE_ACCOUNT", "data": {} })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = submit(&app, &provider, json!({
        "change_type": "ADD_CERTIFICATE",
        "data": { "name": "" }
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let customer = app.register_and_login("CUSTOMER").await;
    let res = submit(&app, &customer, json!({
        "change_type": "ADD_LANGUAGE",
        "data": { "language": "engelsk" }
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_admins_review_changes() {
    let app = TestApp::new().await;
    let (provider, _) = app.approved_provider().await;

    let res = submit(&app, &provider, json!({
        "change_type": "UPDATE_INSURANCE",
        "data": { "has_insurance": true }
    })).await;
    let request_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.send("POST", &format!("/api/v1/admin/change-requests/{}/approve", request_id), Some(&provider), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("GET", "/api/v1/admin/change-requests", Some(&provider), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_language_renames_in_place() {
    let app = TestApp::new().await;
    let (provider, provider_id) = app.approved_provider().await;
    let admin = app.admin().await;

    let added = parse_body(submit(&app, &provider, json!({
        "change_type": "ADD_LANGUAGE", "data": { "language": "engelsk" }
    })).await).await;
    approve(&app, &admin, &added).await;

    let res = submit(&app, &provider, json!({
        "change_type": "UPDATE_LANGUAGE", "data": { "language": "engelsk", "new_language": "engelsk" }
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = submit(&app, &provider, json!({
        "change_type": "UPDATE_LANGUAGE", "data": { "language": "engelsk", "new_language": "svensk" }
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let renamed = parse_body(res).await;
    assert_eq!(renamed["change_type"], "UPDATE_LANGUAGE");
    approve(&app, &admin, &renamed).await;

    let languages = profile(&app, &provider_id).await["languages"].clone();
    assert_eq!(languages.as_array().unwrap().len(), 1);
    assert_eq!(languages[0]["language"], "svensk");

    // Renaming a language the provider does not have leaves the request pending.
    let missing = parse_body(submit(&app, &provider, json!({
        "change_type": "UPDATE_LANGUAGE", "data": { "language": "fransk", "new_language": "tysk" }
    })).await).await;
    let missing_id = missing["id"].as_str().unwrap();
    let res = app.send("POST", &format!("/api/v1/admin/change-requests/{}/approve", missing_id), Some(&admin), Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.send("GET", "/api/v1/admin/change-requests?status=PENDING", Some(&admin), None).await;
    let pending = parse_body(res).await;
    assert!(pending.as_array().unwrap().iter().any(|r| r["id"] == missing_id));
    assert_eq!(profile(&app, &provider_id).await["languages"][0]["language"], "svensk");
}
