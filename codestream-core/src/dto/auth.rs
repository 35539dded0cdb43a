//! Authentication DTOs

use serde::{Deserialize, Serialize};

/// Credentials posted to the identity service login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Login reply carrying a long-lived refresh token
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub refresh_token: String,
}

/// Request exchanging a refresh token for an access token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Short-lived bearer token
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
