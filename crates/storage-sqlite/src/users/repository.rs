use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use spendwise_core::users::{NewUser, User, UserRepositoryTrait, UserUpdate};
use spendwise_core::Result;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::users;
use crate::users::model::{UserDB, UserUpdateDB};

/// SQLite repository for user accounts.
pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .find(user_id)
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user.map(User::from))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .filter(users::email.eq(email))
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user.map(User::from))
    }

    fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .filter(users::username.eq(username).or(users::email.eq(email)))
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user.map(User::from))
    }

    fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .order(users::created_at.asc())
            .offset(offset)
            .limit(limit)
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    fn count_non_admin(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = users::table
            .filter(users::role.ne(spendwise_core::constants::ROLE_ADMIN))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count)
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut record = UserDB::from(new_user);
        record.id = Uuid::new_v4().to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                diesel::insert_into(users::table)
                    .values(&record)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let inserted = users::table
                    .find(&record.id)
                    .first::<UserDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(User::from(inserted))
            })
            .await
    }

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<usize> {
        let user_id = user_id.to_string();
        let changeset = UserUpdateDB::from(update);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::update(users::table.find(&user_id))
                    .set(&changeset)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn update_password_by_email(&self, email: &str, password_hash: &str) -> Result<usize> {
        let email = email.to_string();
        let password_hash = password_hash.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(
                    diesel::update(users::table.filter(users::email.eq(&email)))
                        .set((
                            users::password_hash.eq(&password_hash),
                            users::updated_at.eq(chrono::Utc::now().naive_utc()),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?,
                )
            })
            .await
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(users::table.find(&user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
