use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Type générique pour les réponses des handlers
///
/// # Exemples
///
/// ```rust,ignore
/// // Réponse JSON simple
/// AppResponse::ok(user_response)
///
/// // Ressource créée
/// AppResponse::created(new_user)
///
/// // Réponse vide
/// AppResponse::no_content()
/// ```
pub struct AppResponse<T> {
    status: StatusCode,
    body: Option<T>,
}

impl<T> AppResponse<T>
where
    T: Serialize,
{
    /// Crée une nouvelle réponse avec un status code et des données
    pub fn new(status: StatusCode, body: T) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    // === Constructeurs pour les status codes courants ===

    /// 200 OK avec des données
    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// 201 Created avec des données
    pub fn created(body: T) -> Self {
        Self::new(StatusCode::CREATED, body)
    }
}

impl AppResponse<()> {
    /// 204 No Content
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }
}

/// Implémentation du trait IntoResponse pour Axum
impl<T> IntoResponse for AppResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

/// Type alias pour les résultats des handlers
pub type AppResult<T> = Result<AppResponse<T>, crate::error::AppError>;
