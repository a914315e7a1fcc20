use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub timezone: String,
    pub platform_fee_percent: i64,
    pub auto_confirm_bookings: bool,
    pub quote_request_ttl_days: i64,
    pub quote_response_valid_days: i64,
    pub expiry_sweep_secs: u64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://marketplace.db".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.marketplace.local".to_string()),
            timezone: env::var("MARKETPLACE_TIMEZONE").unwrap_or_else(|_| "Europe/Oslo".to_string()),
            platform_fee_percent: env::var("PLATFORM_FEE_PERCENT").unwrap_or_else(|_| "15".to_string()).parse().expect("PLATFORM_FEE_PERCENT must be a number"),
            auto_confirm_bookings: env::var("AUTO_CONFIRM_BOOKINGS").map(|v| v != "false" && v != "0").unwrap_or(true),
            quote_request_ttl_days: env::var("QUOTE_REQUEST_TTL_DAYS").unwrap_or_else(|_| "7".to_string()).parse().expect("QUOTE_REQUEST_TTL_DAYS must be a number"),
            quote_response_valid_days: env::var("QUOTE_RESPONSE_VALID_DAYS").unwrap_or_else(|_| "14".to_string()).parse().expect("QUOTE_RESPONSE_VALID_DAYS must be a number"),
            expiry_sweep_secs: env::var("EXPIRY_SWEEP_SECS").unwrap_or_else(|_| "300".to_string()).parse().expect("EXPIRY_SWEEP_SECS must be a number"),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }

    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::Europe::Oslo)
    }
}
