// src/handlers/auth.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use chirpy_api::{LoginRequest, LoginResponse, RefreshTokenResponse};

use super::run_blocking;
use crate::auth::extractors::bearer_token;
use crate::auth::services::AuthService;
use crate::response::{AppResponse, AppResult};

/// POST /api/login
/// Connexion d'un utilisateur
pub async fn login(
    State(service): State<Arc<AuthService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<LoginResponse> {
    let Json(payload) = payload?;

    let session = run_blocking(move || service.login(&payload.email, &payload.password)).await?;

    Ok(AppResponse::ok(LoginResponse {
        user: session.user.into(),
        token: session.access_token,
        refresh_token: session.refresh_token.token,
    }))
}

/// POST /api/refresh
/// `Authorization: Bearer <refresh token>`
pub async fn refresh(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> AppResult<RefreshTokenResponse> {
    let token = bearer_token(&headers)?.to_string();

    let session = run_blocking(move || service.refresh(&token)).await?;

    Ok(AppResponse::ok(RefreshTokenResponse {
        token: session.access_token,
        refresh_token: session.refresh_token.map(|issued| issued.token),
    }))
}

/// POST /api/revoke
/// `Authorization: Bearer <refresh token>`
pub async fn revoke(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> AppResult<()> {
    let token = bearer_token(&headers)?.to_string();

    run_blocking(move || service.revoke(&token)).await?;

    Ok(AppResponse::no_content())
}
