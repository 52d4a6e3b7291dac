//! Frontière de persistance consommée par le noyau d'authentification.
//!
//! Les implémentations doivent offrir au moins `read committed` : une révocation
//! commitée avant une lecture doit être visible par cette lecture.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::error::RepositoryError;
use crate::db::models::refresh_token::{NewRefreshToken, RefreshToken};
use crate::db::models::user::{NewUser, UpdateUser, User};

pub trait UserStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// `UniqueViolation` si l'email existe déjà
    fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError>;

    /// `NotFound` si l'utilisateur n'existe pas
    fn update(&self, id: Uuid, changes: &UpdateUser) -> Result<User, RepositoryError>;

    /// Passe le compte en Chirpy Red ; `NotFound` si l'utilisateur n'existe pas
    fn upgrade(&self, id: Uuid) -> Result<User, RepositoryError>;
}

pub trait RefreshTokenStore: Send + Sync {
    fn insert(&self, new_token: &NewRefreshToken) -> Result<RefreshToken, RepositoryError>;

    fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, RepositoryError>;

    /// Écriture unique et idempotente : ne touche pas un token déjà révoqué.
    /// Retourne `true` seulement si cet appel a posé `revoked_at`.
    fn mark_revoked(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, RepositoryError>;
}
