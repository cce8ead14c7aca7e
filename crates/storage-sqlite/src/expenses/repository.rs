use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use spendwise_core::expenses::{
    CategoryTotal, DailyExpense, Expense, ExpenseInput, ExpenseRepositoryTrait,
};
use spendwise_core::Result;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::expenses::model::ExpenseDB;
use crate::schema::expenses;
use crate::utils::{lower, parse_amount};

/// SQLite repository for expense entries.
///
/// Amount columns hold decimal text, so range sums load the matching
/// rows and add them up in Rust to keep the values exact.
pub struct ExpenseRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ExpenseRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn load_amounts_with<K>(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        key: fn(&ExpenseDB) -> K,
    ) -> Result<BTreeMap<K, Decimal>>
    where
        K: Ord,
    {
        let mut conn = get_connection(&self.pool)?;
        let rows = expenses::table
            .filter(expenses::user_id.eq(user_id))
            .filter(expenses::created_at.ge(start))
            .filter(expenses::created_at.lt(end))
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut totals: BTreeMap<K, Decimal> = BTreeMap::new();
        for row in &rows {
            *totals.entry(key(row)).or_default() += parse_amount(&row.expense, "expense");
        }
        Ok(totals)
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for ExpenseRepository {
    fn find_by_id(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let expense = expenses::table
            .filter(expenses::id.eq(expense_id))
            .filter(expenses::user_id.eq(user_id))
            .first::<ExpenseDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(expense.map(Expense::from))
    }

    fn search(
        &self,
        user_id: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = expenses::table
            .filter(expenses::user_id.eq(user_id))
            .into_boxed();
        if let Some(start) = start {
            query = query.filter(expenses::created_at.ge(start));
        }
        if let Some(end) = end {
            query = query.filter(expenses::created_at.lt(end));
        }

        let rows = query
            .order(expenses::created_at.desc())
            .offset(offset)
            .limit(limit)
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    fn count(
        &self,
        user_id: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let base = expenses::table.filter(expenses::user_id.eq(user_id));
        let count = match (start, end) {
            (Some(start), Some(end)) => base
                .filter(expenses::created_at.ge(start))
                .filter(expenses::created_at.lt(end))
                .count()
                .get_result::<i64>(&mut conn),
            (Some(start), None) => base
                .filter(expenses::created_at.ge(start))
                .count()
                .get_result::<i64>(&mut conn),
            (None, Some(end)) => base
                .filter(expenses::created_at.lt(end))
                .count()
                .get_result::<i64>(&mut conn),
            (None, None) => base.count().get_result::<i64>(&mut conn),
        }
        .map_err(StorageError::from)?;
        Ok(count)
    }

    fn sum_for_category(
        &self,
        user_id: &str,
        category: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;
        let amounts = expenses::table
            .filter(expenses::user_id.eq(user_id))
            .filter(lower(expenses::category).eq(category.to_lowercase()))
            .filter(expenses::created_at.ge(start))
            .filter(expenses::created_at.lt(end))
            .select(expenses::expense)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(amounts
            .iter()
            .map(|value| parse_amount(value, "expense"))
            .sum())
    }

    fn sum_by_category(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CategoryTotal>> {
        let totals = self.load_amounts_with(user_id, start, end, |row| row.category.clone())?;
        Ok(totals
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect())
    }

    fn sum_by_day(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<DailyExpense>> {
        let totals: BTreeMap<NaiveDate, Decimal> =
            self.load_amounts_with(user_id, start, end, |row| row.created_at.date())?;
        Ok(totals
            .into_iter()
            .map(|(date, total)| DailyExpense { date, total })
            .collect())
    }

    async fn create(&self, user_id: &str, input: ExpenseInput) -> Result<Expense> {
        let mut record = ExpenseDB::from_input(user_id, input);
        record.id = Uuid::new_v4().to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                diesel::insert_into(expenses::table)
                    .values(&record)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let inserted = expenses::table
                    .find(&record.id)
                    .first::<ExpenseDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Expense::from(inserted))
            })
            .await
    }

    async fn update(
        &self,
        user_id: &str,
        expense_id: &str,
        input: ExpenseInput,
    ) -> Result<Expense> {
        let user_id = user_id.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                diesel::update(
                    expenses::table
                        .filter(expenses::id.eq(&expense_id))
                        .filter(expenses::user_id.eq(&user_id)),
                )
                .set((
                    expenses::category.eq(&input.category),
                    expenses::description.eq(&input.description),
                    expenses::expense.eq(input.expense.to_string()),
                    expenses::updated_at.eq(chrono::Utc::now().naive_utc()),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;
                let updated = expenses::table
                    .filter(expenses::id.eq(&expense_id))
                    .filter(expenses::user_id.eq(&user_id))
                    .first::<ExpenseDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Expense::from(updated))
            })
            .await
    }

    async fn delete(&self, user_id: &str, expense_id: &str) -> Result<Expense> {
        let user_id = user_id.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let removed = expenses::table
                    .filter(expenses::id.eq(&expense_id))
                    .filter(expenses::user_id.eq(&user_id))
                    .first::<ExpenseDB>(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(
                    expenses::table
                        .filter(expenses::id.eq(&expense_id))
                        .filter(expenses::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(Expense::from(removed))
            })
            .await
    }
}
