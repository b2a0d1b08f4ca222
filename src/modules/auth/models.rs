use serde::{Deserialize, Serialize};

/// OAuth2 password-grant style form: `username` carries the seller email.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}
