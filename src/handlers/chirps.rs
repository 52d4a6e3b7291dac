use axum::{Json, extract::rejection::JsonRejection};
use chirpy_api::{ValidateChirpRequest, ValidateChirpResponse};

use crate::auth::extractors::AuthClaims;
use crate::moderation::moderate;
use crate::response::{AppResponse, AppResult};

/// POST /api/validate_chirp
/// Valide et expurge le texte d'un chirp sans le persister
pub async fn validate_chirp(
    claims: AuthClaims,
    payload: Result<Json<ValidateChirpRequest>, JsonRejection>,
) -> AppResult<ValidateChirpResponse> {
    let Json(payload) = payload?;

    let cleaned = moderate(&payload.body).inspect_err(|_| {
        tracing::debug!(user_id = %claims.user_id, "Chirp rejected: too long");
    })?;

    Ok(AppResponse::ok(ValidateChirpResponse {
        cleaned_body: cleaned.into_inner(),
    }))
}
