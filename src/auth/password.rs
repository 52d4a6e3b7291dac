use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(password_hash::Error),
    #[error("Malformed password hash: {0}")]
    MalformedHash(password_hash::Error),
    #[error("Password verification failed: {0}")]
    VerificationFailed(password_hash::Error),
}

/// Argon2id, paramètres par défaut de la crate (m=19 MiB, t=2, p=1)
pub struct PasswordManager;

impl PasswordManager {
    /// Produit une chaîne PHC `$argon2id$v=19$...` avec un sel aléatoire
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(PasswordError::HashingFailed)
    }

    /// `Ok(false)` sur mot de passe incorrect, `Err` uniquement si le hash est illisible.
    /// La comparaison du digest est en temps constant.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(PasswordError::MalformedHash)?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e)),
        }
    }
}
