// src/auth/services.rs

use std::sync::{Arc, OnceLock};

use uuid::Uuid;

use crate::auth::jwt::JwtManager;
use crate::auth::password::PasswordManager;
use crate::auth::refresh_token::{IssuedRefreshToken, RefreshTokenLedger};
use crate::config::AuthConfig;
use crate::db::models::user::{NewUser, UpdateUser, User};
use crate::db::store::{RefreshTokenStore, UserStore};
use crate::error::AppError;

/// Mot de passe du hash leurre ; sa valeur est sans importance
const DECOY_PASSWORD: &str = "chirpy-decoy-password";

/// Résultat d'une connexion réussie
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: IssuedRefreshToken,
}

/// `refresh_token` n'est renseigné que si la rotation est activée
#[derive(Debug, Clone)]
pub struct RefreshedSession {
    pub access_token: String,
    pub refresh_token: Option<IssuedRefreshToken>,
}

pub struct AuthService {
    jwt_manager: JwtManager,
    refresh_tokens: RefreshTokenLedger,
    users: Arc<dyn UserStore>,
    rotate_refresh_tokens: bool,
    polka_key: Option<String>,
    decoy_hash: OnceLock<String>,
}

impl AuthService {
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
    ) -> Self {
        Self {
            jwt_manager: JwtManager::new(&config.jwt_secret, config.access_token_ttl),
            refresh_tokens: RefreshTokenLedger::new(refresh_tokens, config.refresh_token_ttl),
            users,
            rotate_refresh_tokens: config.rotate_refresh_tokens,
            polka_key: config.polka_key.clone(),
            decoy_hash: OnceLock::new(),
        }
    }

    pub fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    pub fn polka_key(&self) -> Option<&str> {
        self.polka_key.as_deref()
    }

    /// Inscription d'un nouvel utilisateur
    pub fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        Self::validate_email(email)?;

        let password_hash = PasswordManager::hash(password)?;

        let user = self
            .users
            .create(&NewUser {
                email: email.to_string(),
                password_hash,
            })
            .map_err(|e| match AppError::from(e) {
                AppError::Duplicate(_) => AppError::duplicate("Email already registered"),
                other => other,
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Remplace email et mot de passe de l'utilisateur authentifié
    pub fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        Self::validate_email(email)?;

        let password_hash = PasswordManager::hash(password)?;

        let user = self
            .users
            .update(
                user_id,
                &UpdateUser {
                    email: email.to_string(),
                    password_hash,
                },
            )
            .map_err(|e| match AppError::from(e) {
                AppError::Duplicate(_) => AppError::duplicate("Email already registered"),
                AppError::NotFound(_) => AppError::not_found("User not found"),
                other => other,
            })?;

        tracing::info!(user_id = %user.id, "User credentials updated");
        Ok(user)
    }

    /// Connexion d'un utilisateur
    ///
    /// Email inconnu et mot de passe faux donnent la même erreur, pour le même coût.
    /// Les sessions existantes de l'utilisateur restent valides.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginSession, AppError> {
        let Some(user) = self.users.find_by_email(email)? else {
            return Err(Self::reject_unknown_email(self.decoy_hash(), password));
        };

        match PasswordManager::verify(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(user_id = %user.id, "Login failed: wrong password");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user.id,
                    error = %e,
                    "Stored password hash is unreadable"
                );
                return Err(AppError::InvalidCredentials);
            }
        }

        let access_token = self.jwt_manager.generate_access_token(user.id)?;
        let refresh_token = self.refresh_tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginSession {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Échange un refresh token contre un nouvel access token
    pub fn refresh(&self, refresh_token: &str) -> Result<RefreshedSession, AppError> {
        if !self.rotate_refresh_tokens {
            let user_id = self.refresh_tokens.validate(refresh_token)?;
            let access_token = self.jwt_manager.generate_access_token(user_id)?;

            tracing::debug!(user_id = %user_id, "Access token refreshed");
            return Ok(RefreshedSession {
                access_token,
                refresh_token: None,
            });
        }

        // Rotation : le prédécesseur est révoqué avant l'émission du successeur.
        // Si l'émission échoue ensuite, la session est perdue et le client doit se reconnecter.
        let user_id = self.refresh_tokens.consume(refresh_token)?;
        let access_token = self.jwt_manager.generate_access_token(user_id)?;
        let successor = self.refresh_tokens.issue(user_id).inspect_err(|e| {
            tracing::error!(
                user_id = %user_id,
                error = %e,
                "Refresh token consumed but successor could not be issued"
            );
        })?;

        tracing::debug!(
            user_id = %user_id,
            token_id = %successor.record.id,
            "Refresh token rotated"
        );
        Ok(RefreshedSession {
            access_token,
            refresh_token: Some(successor),
        })
    }

    /// Révoque un refresh token (idempotent)
    pub fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        self.refresh_tokens.revoke(refresh_token)
    }

    /// Vérifie un access token et retourne l'identité qu'il porte
    pub fn authorize(&self, access_token: &str) -> Result<Uuid, AppError> {
        self.jwt_manager.verify(access_token).map_err(AppError::from)
    }

    /// Passe un utilisateur en Chirpy Red (webhook Polka)
    pub fn upgrade_user(&self, user_id: Uuid) -> Result<User, AppError> {
        let user = self.users.upgrade(user_id).map_err(|e| match AppError::from(e) {
            AppError::NotFound(_) => AppError::not_found("User not found"),
            other => other,
        })?;

        tracing::info!(user_id = %user.id, "User upgraded to Chirpy Red");
        Ok(user)
    }

    /// Même coût et même erreur qu'un mauvais mot de passe, y compris si le
    /// hash leurre n'a pas pu être calculé.
    fn reject_unknown_email(decoy: Result<&str, AppError>, password: &str) -> AppError {
        match decoy {
            Ok(decoy) => {
                let _ = PasswordManager::verify(password, decoy);
            }
            Err(e) => tracing::error!(error = %e, "Decoy password hash unavailable"),
        }
        tracing::info!("Login failed: unknown email");
        AppError::InvalidCredentials
    }

    fn decoy_hash(&self) -> Result<&str, AppError> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash);
        }
        let hash = PasswordManager::hash(DECOY_PASSWORD)?;
        Ok(self.decoy_hash.get_or_init(|| hash))
    }

    // === Helpers de validation ===

    fn validate_email(email: &str) -> Result<(), AppError> {
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
            })
            && !email.chars().any(char::is_whitespace);

        if valid {
            Ok(())
        } else {
            Err(AppError::invalid_input("Invalid email address"))
        }
    }
}
