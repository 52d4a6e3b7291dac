//! Stockage en mémoire, pour les tests et le développement local sans PostgreSQL.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::error::RepositoryError;
use crate::db::models::refresh_token::{NewRefreshToken, RefreshToken};
use crate::db::models::user::{NewUser, UpdateUser, User};
use crate::db::store::{RefreshTokenStore, UserStore};

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    refresh_tokens: RwLock<HashMap<String, RefreshToken>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, RepositoryError> {
        lock.read()
            .map_err(|_| RepositoryError::PoolError("in-memory store poisoned".to_string()))
    }

    fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, RepositoryError> {
        lock.write()
            .map_err(|_| RepositoryError::PoolError("in-memory store poisoned".to_string()))
    }
}

impl UserStore for InMemoryStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = Self::read(&self.users)?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut users = Self::write(&self.users)?;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(RepositoryError::UniqueViolation(format!(
                "email {} already registered",
                new_user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            is_chirpy_red: false,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    fn update(&self, id: Uuid, changes: &UpdateUser) -> Result<User, RepositoryError> {
        let mut users = Self::write(&self.users)?;

        if users.values().any(|u| u.id != id && u.email == changes.email) {
            return Err(RepositoryError::UniqueViolation(format!(
                "email {} already registered",
                changes.email
            )));
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound("Record not found".to_string()))?;
        user.email.clone_from(&changes.email);
        user.password_hash.clone_from(&changes.password_hash);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    fn upgrade(&self, id: Uuid) -> Result<User, RepositoryError> {
        let mut users = Self::write(&self.users)?;

        let user = users
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound("Record not found".to_string()))?;
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

impl RefreshTokenStore for InMemoryStore {
    fn insert(&self, new_token: &NewRefreshToken) -> Result<RefreshToken, RepositoryError> {
        let mut tokens = Self::write(&self.refresh_tokens)?;

        if tokens.contains_key(&new_token.token_hash) {
            return Err(RepositoryError::UniqueViolation(
                "refresh token already exists".to_string(),
            ));
        }

        let record = RefreshToken {
            id: Uuid::new_v4(),
            user_id: new_token.user_id,
            token_hash: new_token.token_hash.clone(),
            created_at: new_token.created_at,
            updated_at: new_token.created_at,
            expires_at: new_token.expires_at,
            revoked_at: None,
        };
        tokens.insert(record.token_hash.clone(), record.clone());
        Ok(record)
    }

    fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, RepositoryError> {
        let tokens = Self::read(&self.refresh_tokens)?;
        Ok(tokens.get(token_hash).cloned())
    }

    fn mark_revoked(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let mut tokens = Self::write(&self.refresh_tokens)?;

        if let Some(record) = tokens.get_mut(token_hash)
            && record.revoked_at.is_none()
        {
            record.revoked_at = Some(at);
            record.updated_at = at;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[test]
    fn create_rejects_duplicate_email() {
        let store = InMemoryStore::new();
        store.create(&new_user("a@example.com")).unwrap();

        let result = store.create(&new_user("a@example.com"));

        assert!(matches!(result, Err(RepositoryError::UniqueViolation(_))));
    }

    #[test]
    fn update_unknown_user_is_not_found() {
        let store = InMemoryStore::new();
        let changes = UpdateUser {
            email: "b@example.com".to_string(),
            password_hash: "hash".to_string(),
        };

        let result = store.update(Uuid::new_v4(), &changes);

        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[test]
    fn upgrade_sets_chirpy_red() {
        let store = InMemoryStore::new();
        let user = store.create(&new_user("c@example.com")).unwrap();
        assert!(!user.is_chirpy_red);

        let upgraded = store.upgrade(user.id).unwrap();

        assert!(upgraded.is_chirpy_red);
        assert!(matches!(
            store.upgrade(Uuid::new_v4()),
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn mark_revoked_keeps_first_timestamp() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store
            .insert(&NewRefreshToken {
                user_id: Uuid::new_v4(),
                token_hash: "digest".to_string(),
                created_at: now,
                expires_at: now + chrono::Duration::days(1),
            })
            .unwrap();

        assert!(store.mark_revoked("digest", now).unwrap());
        assert!(
            !store
                .mark_revoked("digest", now + chrono::Duration::hours(1))
                .unwrap()
        );

        let record = store.find_by_hash("digest").unwrap().unwrap();
        assert_eq!(record.revoked_at, Some(now));
    }
}
