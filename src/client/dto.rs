//! Request/Response DTOs
//!
//! Wire shapes that exist only for a single call. Records that the UI
//! renders live in `models`.

use serde::{Deserialize, Serialize};

use crate::models::ChatSource;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body of `POST /api/chats/send`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessageRequest {
    pub source: ChatSource,
    pub user_id: String,
    pub message: String,
}

/// `GET /api/health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
