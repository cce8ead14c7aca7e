use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use spendwise_core::categories::{Category, CategoryRepositoryTrait, CategoryUpdate, NewCategory};
use spendwise_core::Result;

use crate::categories::model::CategoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::categories;
use crate::utils::lower;

/// SQLite repository for spending categories.
pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn find_by_id(&self, user_id: &str, category_id: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let category = categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::user_id.eq(user_id))
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(category.map(Category::from))
    }

    fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let category = categories::table
            .filter(categories::user_id.eq(user_id))
            .filter(lower(categories::name).eq(name.to_lowercase()))
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(category.map(Category::from))
    }

    fn list(&self, user_id: &str, offset: i64, limit: i64) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = categories::table
            .filter(categories::user_id.eq(user_id))
            .order(categories::created_at.asc())
            .offset(offset)
            .limit(limit)
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn list_active(&self, user_id: &str) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = categories::table
            .filter(categories::user_id.eq(user_id))
            .filter(categories::active.eq(true))
            .order(categories::created_at.asc())
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn count(&self, user_id: &str, active_only: bool) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = if active_only {
            categories::table
                .filter(categories::user_id.eq(user_id))
                .filter(categories::active.eq(true))
                .count()
                .get_result::<i64>(&mut conn)
        } else {
            categories::table
                .filter(categories::user_id.eq(user_id))
                .count()
                .get_result::<i64>(&mut conn)
        }
        .map_err(StorageError::from)?;
        Ok(count)
    }

    async fn create(&self, user_id: &str, new_category: NewCategory) -> Result<Category> {
        let mut record = CategoryDB::from_new(user_id, new_category);
        record.id = Uuid::new_v4().to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                diesel::insert_into(categories::table)
                    .values(&record)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let inserted = categories::table
                    .find(&record.id)
                    .first::<CategoryDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Category::from(inserted))
            })
            .await
    }

    async fn update(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                diesel::update(
                    categories::table
                        .filter(categories::id.eq(&category_id))
                        .filter(categories::user_id.eq(&user_id)),
                )
                .set((
                    categories::name.eq(&update.name),
                    categories::active.eq(update.active),
                    categories::updated_at.eq(chrono::Utc::now().naive_utc()),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;
                let updated = categories::table
                    .find(&category_id)
                    .first::<CategoryDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Category::from(updated))
            })
            .await
    }

    async fn set_active(&self, user_id: &str, category_id: &str, active: bool) -> Result<Category> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                diesel::update(
                    categories::table
                        .filter(categories::id.eq(&category_id))
                        .filter(categories::user_id.eq(&user_id)),
                )
                .set((
                    categories::active.eq(active),
                    categories::updated_at.eq(chrono::Utc::now().naive_utc()),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;
                let updated = categories::table
                    .find(&category_id)
                    .first::<CategoryDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Category::from(updated))
            })
            .await
    }

    async fn delete(&self, user_id: &str, category_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    categories::table
                        .filter(categories::id.eq(&category_id))
                        .filter(categories::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
