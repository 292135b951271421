use serde::{Deserialize, Serialize};

/// Request body for POST /api/users.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for POST /api/auth.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response for successful registration or login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
