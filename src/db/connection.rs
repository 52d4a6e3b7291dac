use super::{DbConnection, DbPool};
use crate::db::error::RepositoryError;
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use std::time::Duration;

const DEFAULT_POOL_SIZE: u32 = 5;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Crée le pool de connexions ; aucune connexion n'est ouverte avant le premier `get`
pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    diesel::r2d2::Pool::builder()
        .max_size(DEFAULT_POOL_SIZE)
        .connection_timeout(CONNECTION_TIMEOUT)
        .build_unchecked(manager)
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection, RepositoryError> {
    pool.get().map_err(|e| {
        tracing::error!("Impossible de récupérer une connexion du pool: {e}");
        RepositoryError::from(e)
    })
}
