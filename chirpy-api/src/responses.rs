use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user. The password hash never leaves the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

/// Successful login: the user plus a fresh token pair.
///
/// The user fields are flattened so the body stays `{id, ..., email, token, refresh_token}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Body of `POST /api/refresh`.
///
/// `refresh_token` is only present when refresh-token rotation is enabled.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshTokenResponse {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidateChirpResponse {
    pub cleaned_body: String,
}
