use crate::db::DbPool;
use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::refresh_token::{NewRefreshToken, RefreshToken};
use crate::db::schema::refresh_tokens;
use crate::db::store::RefreshTokenStore;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

pub struct RefreshTokenRepository {
    pool: DbPool,
}

impl RefreshTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RefreshTokenStore for RefreshTokenRepository {
    fn insert(&self, new_token: &NewRefreshToken) -> Result<RefreshToken, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(refresh_tokens::table)
            .values(new_token)
            .returning(RefreshToken::as_returning())
            .get_result(&mut conn)
            .map_err(Into::into)
    }

    // Pas de filtre sur expires_at : le ledger doit voir les tokens expirés pour les rejeter
    fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        refresh_tokens::table
            .filter(refresh_tokens::token_hash.eq(token_hash))
            .select(RefreshToken::as_select())
            .first(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    fn mark_revoked(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        let updated = diesel::update(
            refresh_tokens::table
                .filter(refresh_tokens::token_hash.eq(token_hash))
                .filter(refresh_tokens::revoked_at.is_null()),
        )
        .set((
            refresh_tokens::revoked_at.eq(Some(at)),
            refresh_tokens::updated_at.eq(at),
        ))
        .execute(&mut conn)?;

        Ok(updated == 1)
    }
}
