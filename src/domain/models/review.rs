use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Review {
    pub id: String,
    pub booking_id: String,
    pub customer_id: String,
    pub provider_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(booking_id: String, customer_id: String, provider_id: String, rating: i32, comment: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id,
            customer_id,
            provider_id,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProviderReviews {
    pub provider_id: String,
    pub average_rating: Option<f64>,
    pub count: usize,
    pub reviews: Vec<Review>,
}

impl ProviderReviews {
    pub fn from_reviews(provider_id: String, reviews: Vec<Review>) -> Self {
        let count = reviews.len();
        let average_rating = (count > 0)
            .then(|| reviews.iter().map(|r| r.rating as f64).sum::<f64>() / count as f64);
        Self { provider_id, average_rating, count, reviews }
    }
}
