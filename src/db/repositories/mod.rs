pub mod refresh_token_repository;
pub mod user_repository;

#[cfg(test)]
pub(crate) fn test_pool() -> crate::db::DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    crate::db::connection::create_pool(&database_url)
}
