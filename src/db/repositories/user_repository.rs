use crate::db::DbPool;
use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::user::{NewUser, UpdateUser, User};
use crate::db::schema::users;
use crate::db::store::UserStore;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Supprimer un utilisateur (nettoyage des tests)
    pub fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::delete(users::table.filter(users::id.eq(id))).execute(&mut conn)?;

        Ok(())
    }
}

impl UserStore for UserRepository {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    /// Créer un nouvel utilisateur
    fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(users::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .map_err(Into::into)
    }

    /// Mettre à jour email et mot de passe
    fn update(&self, id: Uuid, changes: &UpdateUser) -> Result<User, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(users::table.filter(users::id.eq(id)))
            .set((changes, users::updated_at.eq(Utc::now())))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .map_err(Into::into)
    }

    fn upgrade(&self, id: Uuid) -> Result<User, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(users::table.filter(users::id.eq(id)))
            .set((
                users::is_chirpy_red.eq(true),
                users::updated_at.eq(Utc::now()),
            ))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .map_err(Into::into)
    }
}
