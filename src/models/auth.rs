use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DashboardLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardLoginResponse {
    pub token: String,
    pub email: String,
    /// Seconds until the issued token expires.
    pub expires_in: i64,
}
