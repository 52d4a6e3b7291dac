use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, header, request::Parts};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::auth::services::AuthService;
use crate::error::AppError;

const BEARER: &str = "Bearer";
const API_KEY: &str = "ApiKey";

/// Lit `Authorization: <scheme> <credential>`.
///
/// Le schéma est comparé littéralement et doit être suivi d'un blanc ;
/// le reste est nettoyé des blancs en bordure.
fn credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::HeaderMissing)?
        .to_str()
        .map_err(|_| AppError::TokenMalformed)?
        .trim();

    if value.is_empty() {
        return Err(AppError::HeaderMissing);
    }

    let rest = value.strip_prefix(scheme).ok_or(AppError::TokenMalformed)?;
    let credential = rest.trim_start();

    // "BearerXYZ" : blanc obligatoire après le schéma
    if credential.len() == rest.len() && !rest.is_empty() {
        return Err(AppError::TokenMalformed);
    }
    if credential.is_empty() {
        return Err(AppError::HeaderMissing);
    }

    Ok(credential)
}

/// Extrait le JWT de `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    credential(headers, BEARER)
}

/// Extrait la clé de `Authorization: ApiKey <key>` (webhooks Polka)
pub fn api_key(headers: &HeaderMap) -> Result<&str, AppError> {
    credential(headers, API_KEY)
}

/// Compare la clé reçue à la clé attendue en temps constant
pub fn verify_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AppError> {
    let key = api_key(headers)?;

    if bool::from(key.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        tracing::warn!("API key rejected");
        Err(AppError::InvalidCredentials)
    }
}

/// Extracteur d'authentification pour les routes protégées.
/// Valide `Authorization: Bearer <JWT>` via `AuthService::authorize`
/// et expose l'identité authentifiée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthClaims {
    pub user_id: Uuid,
}

impl AuthClaims {
    /// `Forbidden` si la ressource appartient à quelqu'un d'autre
    pub fn ensure_owner(&self, owner_id: Uuid) -> Result<(), AppError> {
        if self.user_id == owner_id {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, owner_id = %owner_id, "Ownership check failed");
            Err(AppError::forbidden("You do not own this resource"))
        }
    }
}

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
    Arc<AuthService>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let auth_service = Arc::<AuthService>::from_ref(state);

        let user_id = auth_service.authorize(token)?;

        Ok(Self { user_id })
    }
}
