//! # chirpy
//!
//! Noyau d'authentification et de sessions du service Chirpy :
//! hachage Argon2id des mots de passe, access tokens JWT signés HS256,
//! refresh tokens opaques révocables, extraction des credentials,
//! contrôle de propriété et modération du texte des chirps.
//!
//! La persistance passe par les traits [`db::store::UserStore`] et
//! [`db::store::RefreshTokenStore`] (PostgreSQL via diesel, ou en mémoire).
//! Les [`handlers`] axum attendent un state `Arc<AuthService>`.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod moderation;
pub mod response;
pub mod telemetry;

pub use auth::AuthService;
pub use config::{AuthConfig, Config};
pub use error::AppError;
