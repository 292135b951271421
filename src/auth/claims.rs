use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inner `user` object of the token payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUser {
    pub id: Uuid,
}

/// JWT payload carried in the `x-auth-token` header:
/// `{"user":{"id":"..."},"iat":...,"exp":...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}
