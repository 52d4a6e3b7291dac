use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use chirpy_api::PolkaWebhookRequest;

use super::run_blocking;
use crate::auth::extractors::verify_api_key;
use crate::auth::services::AuthService;
use crate::error::AppError;
use crate::response::{AppResponse, AppResult};

/// POST /api/polka/webhooks
/// `Authorization: ApiKey <POLKA_KEY>`
///
/// Les événements autres que `user.upgraded` sont acquittés sans effet,
/// de même qu'un `user_id` absent ou qui n'est pas un UUID.
pub async fn polka_webhook(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
    payload: Result<Json<PolkaWebhookRequest>, JsonRejection>,
) -> AppResult<()> {
    let expected = service.polka_key().ok_or_else(|| {
        tracing::warn!("Polka webhook received but POLKA_KEY is not configured");
        AppError::InvalidCredentials
    })?;
    verify_api_key(&headers, expected)?;

    let Json(payload) = payload?;
    if !payload.is_user_upgraded() {
        tracing::debug!(event = %payload.event, "Ignoring Polka event");
        return Ok(AppResponse::no_content());
    }

    let Some(user_id) = payload.user_id() else {
        tracing::debug!(
            user_id = ?payload.data.user_id,
            "Ignoring Polka upgrade without valid user id"
        );
        return Ok(AppResponse::no_content());
    };

    run_blocking(move || service.upgrade_user(user_id)).await?;

    Ok(AppResponse::no_content())
}
