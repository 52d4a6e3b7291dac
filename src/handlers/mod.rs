//! Handlers axum minces : extraction, appel du service, mise en forme de la réponse.
//!
//! Aucun routeur n'est fourni ; l'hôte monte les handlers sur ses propres routes
//! avec un state `Arc<AuthService>`.

pub mod auth;
pub mod chirps;
pub mod users;
pub mod webhooks;

use crate::error::AppError;

/// Exécute un appel au service hors de l'exécuteur async
/// (Argon2 et diesel sont bloquants).
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking task failed");
        AppError::internal(format!("Blocking task failed: {e}"))
    })?
}
