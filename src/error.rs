// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chirpy_api::ErrorResponse;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    // === Erreurs d'Authentification ===
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    // === Erreurs de Token ===
    #[error("Malformed token")]
    TokenMalformed,
    #[error("Invalid token signature")]
    TokenSignatureInvalid,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token revoked")]
    TokenRevoked,
    #[error("Token not found")]
    TokenNotFound,
    #[error("Invalid token subject")]
    TokenSubjectInvalid,
    #[error("Credentials header missing")]
    HeaderMissing,

    // === Erreurs de Modération ===
    #[error("Text exceeds {max} characters")]
    TextTooLong { max: usize },

    // === Erreurs Repository ===
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Duplicate(String),
    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Erreurs de Validation ===
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // === Erreurs métier ===
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // === Erreurs internes ===
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, internal_detail) = self.get_error_info();

        if let Some(ref detail) = internal_detail {
            tracing::error!(error_code, %status, detail, "Internal server error");
        } else if status == StatusCode::UNAUTHORIZED {
            // La raison précise reste dans les logs, jamais dans la réponse
            tracing::debug!(error_code, reason = %self, "Request rejected");
        }

        let body = Json(ErrorResponse::new(error_code, message));

        (status, body).into_response()
    }
}

impl AppError {
    /// Récupère les informations d'erreur formatées pour la réponse HTTP
    fn get_error_info(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            // 401 Unauthorized
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Incorrect email or password".to_string(),
                None,
            ),
            AppError::TokenMalformed
            | AppError::TokenSignatureInvalid
            | AppError::TokenExpired
            | AppError::TokenRevoked
            | AppError::TokenNotFound
            | AppError::TokenSubjectInvalid => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token".to_string(),
                None,
            ),
            AppError::HeaderMissing => (
                StatusCode::UNAUTHORIZED,
                "MISSING_CREDENTIALS",
                "Missing credentials".to_string(),
                None,
            ),

            // 403 Forbidden
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None),

            // 404 Not Found
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),

            // 409 Conflict
            AppError::Duplicate(msg) => {
                (StatusCode::CONFLICT, "DUPLICATE_ENTRY", msg.clone(), None)
            }

            // 400 Bad Request
            AppError::TextTooLong { .. } => (
                StatusCode::BAD_REQUEST,
                "CHIRP_TOO_LONG",
                "Chirp is too long".to_string(),
                None,
            ),
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone(), None)
            }

            // 500 Internal Server Error
            AppError::HashingFailure(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "HASHING_ERROR",
                "An error occurred while processing your request".to_string(),
                Some(msg.clone()),
            ),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An error occurred with the database".to_string(),
                Some(msg.clone()),
            ),
            AppError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                Some(msg.clone()),
            ),
        }
    }

    /// Vrai pour tous les rejets de token, quelle qu'en soit la raison
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AppError::TokenMalformed
                | AppError::TokenSignatureInvalid
                | AppError::TokenExpired
                | AppError::TokenRevoked
                | AppError::TokenNotFound
                | AppError::TokenSubjectInvalid
        )
    }

    // === Constructeurs helpers ===
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        AppError::Duplicate(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        AppError::DatabaseError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::InternalServerError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn hashing_failed(msg: impl Into<String>) -> Self {
        AppError::HashingFailure(msg.into())
    }

    /// Retourne le code de statut HTTP
    pub fn status_code(&self) -> StatusCode {
        self.get_error_info().0
    }
}

// === Conversions automatiques depuis d'autres types d'erreurs ===

// Depuis RepositoryError
impl From<crate::db::error::RepositoryError> for AppError {
    fn from(err: crate::db::error::RepositoryError) -> Self {
        use crate::db::error::RepositoryError;

        match err {
            RepositoryError::NotFound(msg) => AppError::not_found(msg),
            RepositoryError::UniqueViolation(msg) => AppError::duplicate(msg),
            RepositoryError::PoolError(msg)
            | RepositoryError::ForeignKeyViolation(msg)
            | RepositoryError::DatabaseError(msg) => AppError::database(msg),
        }
    }
}

// Depuis PasswordError
impl From<crate::auth::password::PasswordError> for AppError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        AppError::hashing_failed(err.to_string())
    }
}

// Depuis JwtError
impl From<crate::auth::jwt::JwtError> for AppError {
    fn from(err: crate::auth::jwt::JwtError) -> Self {
        use crate::auth::jwt::JwtError;

        match err {
            JwtError::GenerationFailed(e) => {
                AppError::internal(format!("Token generation failed: {e}"))
            }
            JwtError::Malformed => AppError::TokenMalformed,
            JwtError::SignatureInvalid => AppError::TokenSignatureInvalid,
            JwtError::Expired => AppError::TokenExpired,
            JwtError::SubjectInvalid => AppError::TokenSubjectInvalid,
        }
    }
}

// Depuis serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::invalid_input(format!("JSON error: {err}"))
    }
}

// Depuis axum::extract::rejection::JsonRejection
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::invalid_input(format!("Invalid JSON: {err}"))
    }
}
