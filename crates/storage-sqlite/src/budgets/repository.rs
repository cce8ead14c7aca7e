use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use spendwise_core::budgets::{Budget, BudgetRepositoryTrait, BudgetUpsert};
use spendwise_core::constants::MAIN_BUDGET_CATEGORY;
use spendwise_core::Result;

use crate::budgets::model::BudgetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budgets;
use crate::utils::lower;

/// SQLite repository for budget rows.
pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn get_main(&self, user_id: &str) -> Result<Option<Budget>> {
        self.find_by_category(user_id, MAIN_BUDGET_CATEGORY)
    }

    fn find_by_category(&self, user_id: &str, category: &str) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let budget = budgets::table
            .filter(budgets::user_id.eq(user_id))
            .filter(lower(budgets::category).eq(category.to_lowercase()))
            .first::<BudgetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(budget.map(Budget::from))
    }

    fn list(&self, user_id: &str, offset: i64, limit: i64) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .filter(budgets::user_id.eq(user_id))
            .order(budgets::created_at.asc())
            .offset(offset)
            .limit(limit)
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Budget::from).collect())
    }

    fn list_allocations(&self, user_id: &str) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .filter(budgets::user_id.eq(user_id))
            .filter(lower(budgets::category).ne(MAIN_BUDGET_CATEGORY))
            .order(budgets::created_at.asc())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Budget::from).collect())
    }

    async fn upsert(
        &self,
        user_id: &str,
        category: &str,
        amount: Decimal,
    ) -> Result<BudgetUpsert> {
        let user_id = user_id.to_string();
        let category = category.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetUpsert> {
                let existing = budgets::table
                    .filter(budgets::user_id.eq(&user_id))
                    .filter(lower(budgets::category).eq(category.to_lowercase()))
                    .first::<BudgetDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                let now = chrono::Utc::now().naive_utc();
                match existing {
                    Some(row) => {
                        diesel::update(budgets::table.find(&row.id))
                            .set((
                                budgets::budget.eq(amount.to_string()),
                                budgets::updated_at.eq(now),
                            ))
                            .execute(conn)
                            .map_err(StorageError::from)?;
                        let updated = budgets::table
                            .find(&row.id)
                            .first::<BudgetDB>(conn)
                            .map_err(StorageError::from)?;
                        Ok(BudgetUpsert {
                            budget: Budget::from(updated),
                            created: false,
                        })
                    }
                    None => {
                        let record = BudgetDB {
                            id: Uuid::new_v4().to_string(),
                            user_id: user_id.clone(),
                            category: category.clone(),
                            budget: amount.to_string(),
                            created_at: now,
                            updated_at: now,
                        };
                        diesel::insert_into(budgets::table)
                            .values(&record)
                            .execute(conn)
                            .map_err(StorageError::from)?;
                        let inserted = budgets::table
                            .find(&record.id)
                            .first::<BudgetDB>(conn)
                            .map_err(StorageError::from)?;
                        Ok(BudgetUpsert {
                            budget: Budget::from(inserted),
                            created: true,
                        })
                    }
                }
            })
            .await
    }
}
