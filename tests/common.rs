#![allow(dead_code)]

use marketplace_backend::{
    api::router::create_router,
    config::Config,
    infra::factory::{seed_admin, sqlite_repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc, Weekday};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@marketplace.test";
pub const ADMIN_PASSWORD: &str = "admin-passord-123";
pub const PASSWORD: &str = "hemmelig123";

pub struct AuthHeaders {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
    pub user_id: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_auto_confirm(true).await
    }

    pub async fn with_auto_confirm(auto_confirm_bookings: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            timezone: "Europe/Oslo".to_string(),
            platform_fee_percent: 15,
            auto_confirm_bookings,
            quote_request_ttl_days: 7,
            quote_response_valid_days: 14,
            expiry_sweep_secs: 300,
            admin_email: Some(ADMIN_EMAIL.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
        };

        let repos = sqlite_repositories(&pool);
        seed_admin(&config, &repos).await.expect("Failed to seed admin");

        let state = Arc::new(AppState::new(config, repos).expect("Failed to build state"));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let response = self.send("POST", "/api/v1/auth/login", None, Some(json!({
            "email": email,
            "password": password
        }))).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token = cookie_value(&cookies, "access_token").expect("No access_token cookie returned");
        let refresh_token = cookie_value(&cookies, "refresh_token").expect("No refresh_token cookie returned");

        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();
        let user_id = body_json["user"]["id"].as_str().expect("No user in body").to_string();

        AuthHeaders {
            access_token,
            refresh_token,
            csrf_token,
            user_id,
        }
    }

    pub async fn admin(&self) -> AuthHeaders {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Registers a fresh account with the given role ("CUSTOMER" or "PROVIDER") and logs it in.
    pub async fn register_and_login(&self, role: &str) -> AuthHeaders {
        let email = format!("{}@marketplace.test", Uuid::new_v4());
        let res = self.send("POST", "/api/v1/auth/register", None, Some(json!({
            "email": email,
            "name": "Test Bruker",
            "password": PASSWORD,
            "confirm_password": PASSWORD,
            "role": role
        }))).await;
        assert_eq!(res.status().as_u16(), 201, "register failed");
        self.login(&email, PASSWORD).await
    }

    pub async fn customer_with_address(&self) -> (AuthHeaders, String) {
        let customer = self.register_and_login("CUSTOMER").await;
        let res = self.send("POST", "/api/v1/addresses", Some(&customer), Some(json!({
            "label": "Hjem",
            "street": "Storgata 1",
            "postal_code": "0155",
            "city": "Oslo"
        }))).await;
        assert_eq!(res.status().as_u16(), 201, "address failed");
        let address_id = parse_body(res).await["id"].as_str().unwrap().to_string();
        (customer, address_id)
    }

    /// A provider account whose profile has been approved by the admin.
    pub async fn approved_provider(&self) -> (AuthHeaders, String) {
        let provider = self.register_and_login("PROVIDER").await;
        let res = self.send("POST", "/api/v1/providers", Some(&provider), Some(json!({
            "business_name": "Rask Service AS",
            "bio": "Erfarne fagfolk"
        }))).await;
        assert_eq!(res.status().as_u16(), 201, "provider profile failed");
        let provider_id = parse_body(res).await["id"].as_str().unwrap().to_string();

        let admin = self.admin().await;
        let res = self.send("POST", &format!("/api/v1/admin/providers/{}/approve", provider_id), Some(&admin), None).await;
        assert_eq!(res.status().as_u16(), 200, "approval failed");

        (provider, provider_id)
    }

    pub async fn add_service(&self, provider: &AuthHeaders, provider_id: &str, name: &str, price: i64, duration_min: i32) -> String {
        let res = self.send("POST", &format!("/api/v1/providers/{}/services", provider_id), Some(provider), Some(json!({
            "category_id": "renhold",
            "name": name,
            "price": price,
            "duration_min": duration_min
        }))).await;
        assert_eq!(res.status().as_u16(), 201, "service failed");
        parse_body(res).await["id"].as_str().unwrap().to_string()
    }

    pub async fn set_schedule(&self, provider: &AuthHeaders, day_of_week: i32, start: &str, end: &str) {
        let res = self.send("PUT", &format!("/api/v1/schedule/{}", day_of_week), Some(provider), Some(json!({
            "slots": [{ "start_time": start, "end_time": end }]
        }))).await;
        assert_eq!(res.status().as_u16(), 200, "schedule failed");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    let cookie = cookies.iter().find(|c| c.starts_with(&prefix))?;
    let start = prefix.len();
    let end = cookie[start..].find(';').map(|i| start + i).unwrap_or(cookie.len());
    Some(cookie[start..end].to_string())
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// First Monday at least three days out, so no slot on it is in the past.
pub fn upcoming_monday() -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(3);
    while date.weekday() != Weekday::Mon {
        date += Duration::days(1);
    }
    date
}

/// UTC instant of a wall-clock time in Oslo.
pub fn oslo(date: NaiveDate, hhmm: &str) -> DateTime<Utc> {
    let time = NaiveTime::parse_from_str(hhmm, "%H:%M").unwrap();
    chrono_tz::Europe::Oslo
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
