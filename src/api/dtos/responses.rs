use serde::Serialize;

#[derive(Serialize)]
pub struct SlotsResponse {
    pub provider_id: String,
    pub date: String,
    pub slots: Vec<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct RevokedSessionsResponse {
    pub revoked: u64,
}
