//! Refresh Token Management
//!
//! Refresh tokens are:
//! - 32 random bytes from a CSPRNG, hex-encoded (opaque, carry no claims)
//! - Hashed with SHA-256 before storage (the plaintext is returned once, at issue)
//! - Valid exactly while `now < expires_at` and `revoked_at` is unset

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::models::refresh_token::{NewRefreshToken, RefreshToken};
use crate::db::store::RefreshTokenStore;
use crate::error::AppError;

const TOKEN_BYTES: usize = 32;

/// Token en clair remis au client, accompagné de l'enregistrement persisté
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub record: RefreshToken,
}

pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Clé de recherche en base ; le token en clair n'est jamais stocké
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Les deux conditions sont évaluées à chaque appel et toutes deux journalisées ;
/// la révocation l'emporte dans le résultat.
pub fn check_validity(record: &RefreshToken, now: DateTime<Utc>) -> Result<Uuid, AppError> {
    let revoked = record.is_revoked();
    let expired = record.is_expired_at(now);

    if revoked {
        tracing::warn!(
            user_id = %record.user_id,
            token_id = %record.id,
            revoked_at = ?record.revoked_at,
            "Attempt to use revoked refresh token"
        );
    }
    if expired {
        tracing::info!(
            user_id = %record.user_id,
            token_id = %record.id,
            expires_at = %record.expires_at,
            "Refresh token expired"
        );
    }

    match (revoked, expired) {
        (true, _) => Err(AppError::TokenRevoked),
        (false, true) => Err(AppError::TokenExpired),
        (false, false) => Ok(record.user_id),
    }
}

pub struct RefreshTokenLedger {
    store: Arc<dyn RefreshTokenStore>,
    ttl: Duration,
}

impl RefreshTokenLedger {
    pub fn new(store: Arc<dyn RefreshTokenStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<IssuedRefreshToken, AppError> {
        let token = generate_refresh_token();
        let now = Utc::now();

        let record = self.store.insert(&NewRefreshToken {
            user_id,
            token_hash: hash_token(&token),
            created_at: now,
            expires_at: now + self.ttl,
        })?;

        tracing::debug!(user_id = %user_id, token_id = %record.id, "Refresh token issued");
        Ok(IssuedRefreshToken { token, record })
    }

    pub fn validate(&self, token: &str) -> Result<Uuid, AppError> {
        let record = self.find(token)?;
        check_validity(&record, Utc::now())
    }

    /// Idempotent : révoquer un token déjà révoqué n'est pas une erreur
    pub fn revoke(&self, token: &str) -> Result<(), AppError> {
        let record = self.find(token)?;

        if record.is_revoked() {
            tracing::debug!(token_id = %record.id, "Refresh token already revoked");
            return Ok(());
        }

        self.store.mark_revoked(&record.token_hash, Utc::now())?;
        tracing::info!(user_id = %record.user_id, token_id = %record.id, "Refresh token revoked");
        Ok(())
    }

    /// Valide puis révoque en une seule écriture conditionnelle ; si un appel
    /// concurrent a révoqué le token entre-temps, celui-ci perd avec `TokenRevoked`.
    pub fn consume(&self, token: &str) -> Result<Uuid, AppError> {
        let record = self.find(token)?;
        let user_id = check_validity(&record, Utc::now())?;

        if !self.store.mark_revoked(&record.token_hash, Utc::now())? {
            tracing::warn!(
                user_id = %user_id,
                token_id = %record.id,
                "Refresh token revoked concurrently"
            );
            return Err(AppError::TokenRevoked);
        }

        Ok(user_id)
    }

    fn find(&self, token: &str) -> Result<RefreshToken, AppError> {
        self.store.find_by_hash(&hash_token(token))?.ok_or_else(|| {
            tracing::warn!("Refresh token not found in database");
            AppError::TokenNotFound
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::error::RepositoryError;
    use crate::db::memory::InMemoryStore;

    fn make_ledger() -> (Arc<InMemoryStore>, RefreshTokenLedger) {
        let store = Arc::new(InMemoryStore::new());
        let ledger = RefreshTokenLedger::new(store.clone(), Duration::days(60));
        (store, ledger)
    }

    /// Insère directement un enregistrement aux dates choisies
    fn seed(store: &InMemoryStore, expires_at: DateTime<Utc>) -> (String, Uuid) {
        let token = generate_refresh_token();
        let user_id = Uuid::new_v4();
        store
            .insert(&NewRefreshToken {
                user_id,
                token_hash: hash_token(&token),
                created_at: expires_at - Duration::days(60),
                expires_at,
            })
            .unwrap();
        (token, user_id)
    }

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token();

        // 32 bytes → 64 hex chars
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_refresh_token());
    }

    #[test]
    fn test_token_hashing() {
        let token = generate_refresh_token();
        let hash1 = hash_token(&token);
        let hash2 = hash_token(&token);

        assert_eq!(hash1, hash2);
        assert_ne!(token, hash1);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn issue_persists_digest_not_plaintext() {
        let (store, ledger) = make_ledger();
        let user_id = Uuid::new_v4();

        let issued = ledger.issue(user_id).unwrap();

        assert_eq!(issued.record.user_id, user_id);
        assert_ne!(issued.record.token_hash, issued.token);
        assert!(issued.record.revoked_at.is_none());
        assert_eq!(
            issued.record.expires_at - issued.record.created_at,
            Duration::days(60)
        );
        assert!(store.find_by_hash(&issued.token).unwrap().is_none());
        assert!(
            store
                .find_by_hash(&hash_token(&issued.token))
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn validate_returns_owner_of_fresh_token() {
        let (_, ledger) = make_ledger();
        let user_id = Uuid::new_v4();
        let issued = ledger.issue(user_id).unwrap();

        assert_eq!(ledger.validate(&issued.token).unwrap(), user_id);
    }

    #[test]
    fn validate_rejects_unknown_token() {
        let (_, ledger) = make_ledger();

        assert_eq!(
            ledger.validate(&generate_refresh_token()),
            Err(AppError::TokenNotFound)
        );
        assert_eq!(ledger.validate(""), Err(AppError::TokenNotFound));
    }

    #[test]
    fn validate_rejects_expired_token() {
        let (store, ledger) = make_ledger();
        let (token, _) = seed(&store, Utc::now() - Duration::minutes(1));

        assert_eq!(ledger.validate(&token), Err(AppError::TokenExpired));
    }

    #[test]
    fn validate_rejects_revoked_token() {
        let (_, ledger) = make_ledger();
        let issued = ledger.issue(Uuid::new_v4()).unwrap();

        ledger.revoke(&issued.token).unwrap();

        assert_eq!(ledger.validate(&issued.token), Err(AppError::TokenRevoked));
    }

    #[test]
    fn revoked_and_expired_reports_revoked() {
        let (store, ledger) = make_ledger();
        let (token, _) = seed(&store, Utc::now() - Duration::minutes(1));

        ledger.revoke(&token).unwrap();

        assert_eq!(ledger.validate(&token), Err(AppError::TokenRevoked));
    }

    #[test]
    fn revoke_is_idempotent() {
        let (store, ledger) = make_ledger();
        let issued = ledger.issue(Uuid::new_v4()).unwrap();

        ledger.revoke(&issued.token).unwrap();
        let first = store
            .find_by_hash(&issued.record.token_hash)
            .unwrap()
            .unwrap();

        ledger.revoke(&issued.token).expect("second revoke must succeed");
        let second = store
            .find_by_hash(&issued.record.token_hash)
            .unwrap()
            .unwrap();

        assert!(first.revoked_at.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn revoke_unknown_token_is_not_found() {
        let (_, ledger) = make_ledger();

        assert_eq!(
            ledger.revoke(&generate_refresh_token()),
            Err(AppError::TokenNotFound)
        );
    }

    #[test]
    fn check_validity_boundary_is_exclusive() {
        let now = Utc::now();
        let record = RefreshToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "digest".to_string(),
            created_at: now - Duration::days(60),
            updated_at: now - Duration::days(60),
            expires_at: now,
            revoked_at: None,
        };

        assert_eq!(
            check_validity(&record, now - Duration::seconds(1)),
            Ok(record.user_id)
        );
        assert_eq!(check_validity(&record, now), Err(AppError::TokenExpired));
    }

    #[test]
    fn consume_succeeds_once() {
        let (_, ledger) = make_ledger();
        let user_id = Uuid::new_v4();
        let issued = ledger.issue(user_id).unwrap();

        assert_eq!(ledger.consume(&issued.token), Ok(user_id));
        assert_eq!(ledger.consume(&issued.token), Err(AppError::TokenRevoked));
        assert_eq!(ledger.validate(&issued.token), Err(AppError::TokenRevoked));
    }

    /// Lecture antérieure à une révocation concurrente : `find_by_hash` voit
    /// encore le token actif alors que l'écriture a déjà eu lieu.
    struct StaleReadStore {
        inner: InMemoryStore,
    }

    impl RefreshTokenStore for StaleReadStore {
        fn insert(&self, new_token: &NewRefreshToken) -> Result<RefreshToken, RepositoryError> {
            self.inner.insert(new_token)
        }

        fn find_by_hash(
            &self,
            token_hash: &str,
        ) -> Result<Option<RefreshToken>, RepositoryError> {
            Ok(self.inner.find_by_hash(token_hash)?.map(|record| RefreshToken {
                revoked_at: None,
                ..record
            }))
        }

        fn mark_revoked(
            &self,
            token_hash: &str,
            at: DateTime<Utc>,
        ) -> Result<bool, RepositoryError> {
            self.inner.mark_revoked(token_hash, at)
        }
    }

    #[test]
    fn consume_loses_to_concurrent_revocation() {
        let store = Arc::new(StaleReadStore {
            inner: InMemoryStore::new(),
        });
        let ledger = RefreshTokenLedger::new(store.clone(), Duration::days(60));
        let issued = ledger.issue(Uuid::new_v4()).unwrap();

        // L'autre appelant a gagné la course
        assert!(
            store
                .inner
                .mark_revoked(&issued.record.token_hash, Utc::now())
                .unwrap()
        );

        assert_eq!(ledger.validate(&issued.token), Ok(issued.record.user_id));
        assert_eq!(ledger.consume(&issued.token), Err(AppError::TokenRevoked));
    }

    #[test]
    fn concurrent_consumes_exchange_token_once() {
        let (_, ledger) = make_ledger();
        let user_id = Uuid::new_v4();
        let issued = ledger.issue(user_id).unwrap();

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| ledger.consume(&issued.token)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| **r == Ok(user_id)).count(), 1);
        assert!(
            results
                .iter()
                .filter(|r| r.is_err())
                .all(|r| *r == Err(AppError::TokenRevoked))
        );
    }

    #[test]
    fn consume_rejects_expired_token_without_revoking() {
        let (store, ledger) = make_ledger();
        let (token, _) = seed(&store, Utc::now() - Duration::minutes(1));

        assert_eq!(ledger.consume(&token), Err(AppError::TokenExpired));

        let record = store.find_by_hash(&hash_token(&token)).unwrap().unwrap();
        assert!(record.revoked_at.is_none());
    }

    #[test]
    fn revoking_one_session_leaves_others_valid() {
        let (_, ledger) = make_ledger();
        let user_id = Uuid::new_v4();
        let first = ledger.issue(user_id).unwrap();
        let second = ledger.issue(user_id).unwrap();

        ledger.revoke(&first.token).unwrap();

        assert_eq!(ledger.validate(&first.token), Err(AppError::TokenRevoked));
        assert_eq!(ledger.validate(&second.token), Ok(user_id));
    }
}
