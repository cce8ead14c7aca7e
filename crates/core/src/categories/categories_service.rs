use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::errors::{Error, Result, ValidationError};
use crate::expenses::ExpenseRepositoryTrait;
use crate::notifications::{
    notify_detached, NewNotification, NotificationKind, NotificationServiceTrait,
};
use crate::utils::{month_bounds, page_to_offset};

use super::categories_model::{
    Category, CategoryOption, CategoryUpdate, CategoryWithShare, NewCategory,
};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};

/// Service for category management and the month share listing.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepositoryTrait>,
    expenses: Arc<dyn ExpenseRepositoryTrait>,
    notifications: Arc<dyn NotificationServiceTrait>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryRepositoryTrait>,
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        notifications: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        CategoryService {
            categories,
            expenses,
            notifications,
        }
    }

    fn notify(&self, user_id: &str, message: String) {
        notify_detached(
            &self.notifications,
            NewNotification {
                user_id: user_id.to_string(),
                message,
                kind: NotificationKind::Info,
            },
        );
    }

    /// Rounds a spending share the way a calculator would, halves away
    /// from zero.
    fn share_percentage(spent: Decimal, overall: Decimal) -> i64 {
        use rust_decimal::prelude::ToPrimitive;

        if overall.is_zero() {
            return 0;
        }
        ((spent / overall) * dec!(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0)
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    async fn create_category(&self, user_id: &str, new_category: NewCategory) -> Result<Category> {
        if new_category.name.trim().is_empty() {
            return Err(ValidationError::InvalidInput("Invalid category data".to_string()).into());
        }
        if self
            .categories
            .find_by_name(user_id, &new_category.name)?
            .is_some()
        {
            return Err(Error::ConstraintViolation(format!(
                "The category {} already exists!",
                new_category.name
            )));
        }

        let category = self.categories.create(user_id, new_category).await?;
        debug!("Created category {} for {}", category.id, user_id);
        self.notify(
            user_id,
            format!("A new category {} has been created!", category.name),
        );
        Ok(category)
    }

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        self.categories
            .find_by_id(user_id, category_id)?
            .ok_or_else(|| Error::NotFound("Category not found!".to_string()))
    }

    fn list_categories(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Vec<CategoryWithShare>> {
        let (offset, limit) = page_to_offset(page, limit);
        let rows = self.categories.list(user_id, offset, limit)?;

        let (start, end) = month_bounds(Utc::now().date_naive());
        let totals = self.expenses.sum_by_category(user_id, start, end)?;
        let mut by_name: HashMap<String, Decimal> = HashMap::new();
        for entry in &totals {
            *by_name
                .entry(entry.category.to_lowercase())
                .or_insert(Decimal::ZERO) += entry.total;
        }
        let overall: Decimal = by_name.values().copied().sum();

        Ok(rows
            .into_iter()
            .map(|category| {
                let spent = by_name
                    .get(&category.name.to_lowercase())
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                CategoryWithShare {
                    id: category.id,
                    name: category.name,
                    active: category.active,
                    created_at: category.created_at,
                    updated_at: category.updated_at,
                    percentage_expense: Self::share_percentage(spent, overall),
                }
            })
            .collect())
    }

    fn list_active_options(&self, user_id: &str) -> Result<Vec<CategoryOption>> {
        let rows = self.categories.list_active(user_id)?;
        Ok(rows
            .into_iter()
            .map(|category| CategoryOption {
                id: category.id,
                name: category.name,
                active: category.active,
            })
            .collect())
    }

    fn count_categories(&self, user_id: &str, active_only: bool) -> Result<i64> {
        self.categories.count(user_id, active_only)
    }

    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category> {
        if update.name.trim().is_empty() {
            return Err(ValidationError::InvalidInput("Invalid category data".to_string()).into());
        }
        let existing = self.get_category(user_id, category_id)?;

        let updated = self.categories.update(user_id, category_id, update).await?;
        self.notify(
            user_id,
            format!(
                "A category {} has been updated to {}!",
                existing.name, updated.name
            ),
        );
        Ok(updated)
    }

    async fn set_category_active(
        &self,
        user_id: &str,
        category_id: &str,
        active: bool,
    ) -> Result<Category> {
        let existing = self.get_category(user_id, category_id)?;

        let updated = self
            .categories
            .set_active(user_id, category_id, active)
            .await?;
        self.notify(
            user_id,
            format!(
                "A category {} has been {}!",
                existing.name,
                if active { "activated" } else { "deactivated" }
            ),
        );
        Ok(updated)
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        let existing = self.get_category(user_id, category_id)?;

        self.categories.delete(user_id, category_id).await?;
        debug!("Deleted category {} for {}", category_id, user_id);
        self.notify(
            user_id,
            format!("A category {} has been deleted!", existing.name),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expenses::{CategoryTotal, DailyExpense, Expense, ExpenseInput};
    use crate::notifications::Notification;
    use chrono::NaiveDateTime;
    use std::sync::{Mutex, RwLock};

    struct MockCategoryRepository {
        rows: RwLock<Vec<Category>>,
    }

    impl MockCategoryRepository {
        fn new() -> Self {
            MockCategoryRepository {
                rows: RwLock::new(Vec::new()),
            }
        }

        fn with_category(self, id: &str, user_id: &str, name: &str, active: bool) -> Self {
            let now = Utc::now().naive_utc();
            self.rows.write().unwrap().push(Category {
                id: id.to_string(),
                user_id: user_id.to_string(),
                name: name.to_string(),
                active,
                created_at: now,
                updated_at: now,
            });
            self
        }
    }

    #[async_trait]
    impl CategoryRepositoryTrait for MockCategoryRepository {
        fn find_by_id(&self, user_id: &str, category_id: &str) -> Result<Option<Category>> {
            let rows = self.rows.read().unwrap();
            Ok(rows
                .iter()
                .find(|c| c.user_id == user_id && c.id == category_id)
                .cloned())
        }

        fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Category>> {
            let rows = self.rows.read().unwrap();
            Ok(rows
                .iter()
                .find(|c| c.user_id == user_id && c.name.eq_ignore_ascii_case(name))
                .cloned())
        }

        fn list(&self, user_id: &str, offset: i64, limit: i64) -> Result<Vec<Category>> {
            let rows = self.rows.read().unwrap();
            Ok(rows
                .iter()
                .filter(|c| c.user_id == user_id)
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        fn list_active(&self, user_id: &str) -> Result<Vec<Category>> {
            let rows = self.rows.read().unwrap();
            Ok(rows
                .iter()
                .filter(|c| c.user_id == user_id && c.active)
                .cloned()
                .collect())
        }

        fn count(&self, user_id: &str, active_only: bool) -> Result<i64> {
            let rows = self.rows.read().unwrap();
            Ok(rows
                .iter()
                .filter(|c| c.user_id == user_id && (!active_only || c.active))
                .count() as i64)
        }

        async fn create(&self, user_id: &str, new_category: NewCategory) -> Result<Category> {
            let now = Utc::now().naive_utc();
            let mut rows = self.rows.write().unwrap();
            let row = Category {
                id: format!("c{}", rows.len() + 1),
                user_id: user_id.to_string(),
                name: new_category.name,
                active: new_category.active,
                created_at: now,
                updated_at: now,
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn update(
            &self,
            user_id: &str,
            category_id: &str,
            update: CategoryUpdate,
        ) -> Result<Category> {
            let mut rows = self.rows.write().unwrap();
            let row = rows
                .iter_mut()
                .find(|c| c.user_id == user_id && c.id == category_id)
                .ok_or_else(|| Error::NotFound("Category not found!".to_string()))?;
            row.name = update.name;
            row.active = update.active;
            Ok(row.clone())
        }

        async fn set_active(
            &self,
            user_id: &str,
            category_id: &str,
            active: bool,
        ) -> Result<Category> {
            let mut rows = self.rows.write().unwrap();
            let row = rows
                .iter_mut()
                .find(|c| c.user_id == user_id && c.id == category_id)
                .ok_or_else(|| Error::NotFound("Category not found!".to_string()))?;
            row.active = active;
            Ok(row.clone())
        }

        async fn delete(&self, user_id: &str, category_id: &str) -> Result<usize> {
            let mut rows = self.rows.write().unwrap();
            let before = rows.len();
            rows.retain(|c| !(c.user_id == user_id && c.id == category_id));
            Ok(before - rows.len())
        }
    }

    struct MockExpenseRepository {
        totals: Vec<CategoryTotal>,
    }

    #[async_trait]
    impl ExpenseRepositoryTrait for MockExpenseRepository {
        fn find_by_id(&self, _user_id: &str, _expense_id: &str) -> Result<Option<Expense>> {
            unimplemented!("not used in these tests")
        }

        fn search(
            &self,
            _user_id: &str,
            _start: Option<NaiveDateTime>,
            _end: Option<NaiveDateTime>,
            _offset: i64,
            _limit: i64,
        ) -> Result<Vec<Expense>> {
            unimplemented!("not used in these tests")
        }

        fn count(
            &self,
            _user_id: &str,
            _start: Option<NaiveDateTime>,
            _end: Option<NaiveDateTime>,
        ) -> Result<i64> {
            unimplemented!("not used in these tests")
        }

        fn sum_for_category(
            &self,
            _user_id: &str,
            _category: &str,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Decimal> {
            unimplemented!("not used in these tests")
        }

        fn sum_by_category(
            &self,
            _user_id: &str,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Vec<CategoryTotal>> {
            Ok(self.totals.clone())
        }

        fn sum_by_day(
            &self,
            _user_id: &str,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Vec<DailyExpense>> {
            unimplemented!("not used in these tests")
        }

        async fn create(&self, _user_id: &str, _input: ExpenseInput) -> Result<Expense> {
            unimplemented!("not used in these tests")
        }

        async fn update(
            &self,
            _user_id: &str,
            _expense_id: &str,
            _input: ExpenseInput,
        ) -> Result<Expense> {
            unimplemented!("not used in these tests")
        }

        async fn delete(&self, _user_id: &str, _expense_id: &str) -> Result<Expense> {
            unimplemented!("not used in these tests")
        }
    }

    struct MockNotificationService {
        messages: Mutex<Vec<String>>,
    }

    impl MockNotificationService {
        fn new() -> Self {
            MockNotificationService {
                messages: Mutex::new(Vec::new()),
            }
        }

        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationServiceTrait for MockNotificationService {
        async fn notify(&self, notification: NewNotification) {
            self.messages.lock().unwrap().push(notification.message);
        }

        fn list_notifications(
            &self,
            _user_id: &str,
            _page: i64,
            _limit: i64,
        ) -> Result<Vec<Notification>> {
            unimplemented!("not used in these tests")
        }

        fn unread_count(&self, _user_id: &str) -> Result<i64> {
            unimplemented!("not used in these tests")
        }

        async fn mark_all_read(&self, _user_id: &str) -> Result<usize> {
            unimplemented!("not used in these tests")
        }
    }

    fn make_service(
        categories: Arc<MockCategoryRepository>,
        totals: Vec<CategoryTotal>,
    ) -> (CategoryService, Arc<MockNotificationService>) {
        let notifications = Arc::new(MockNotificationService::new());
        let service = CategoryService::new(
            categories,
            Arc::new(MockExpenseRepository { totals }),
            notifications.clone(),
        );
        (service, notifications)
    }

    fn total(category: &str, amount: Decimal) -> CategoryTotal {
        CategoryTotal {
            category: category.to_string(),
            total: amount,
        }
    }

    #[tokio::test]
    async fn test_create_category_rejects_case_insensitive_duplicate() {
        let repository =
            Arc::new(MockCategoryRepository::new().with_category("c1", "u1", "food", true));
        let (service, _notifications) = make_service(repository, Vec::new());

        let err = service
            .create_category(
                "u1",
                NewCategory {
                    name: "Food".to_string(),
                    active: true,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "The category Food already exists!");
    }

    #[tokio::test]
    async fn test_create_category_notifies() {
        let repository = Arc::new(MockCategoryRepository::new());
        let (service, notifications) = make_service(repository, Vec::new());

        service
            .create_category(
                "u1",
                NewCategory {
                    name: "Travel".to_string(),
                    active: true,
                },
            )
            .await
            .unwrap();
        tokio::task::yield_now().await;

        assert_eq!(
            notifications.messages(),
            vec!["A new category Travel has been created!".to_string()]
        );
    }

    #[tokio::test]
    async fn test_list_categories_month_share() {
        let repository = Arc::new(
            MockCategoryRepository::new()
                .with_category("c1", "u1", "Food", true)
                .with_category("c2", "u1", "Travel", true),
        );
        let totals = vec![
            total("food", dec!(200)),
            total("Food", dec!(100)),
            total("travel", dec!(100)),
        ];
        let (service, _notifications) = make_service(repository, totals);

        let listed = service.list_categories("u1", 1, 10).unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Food");
        assert_eq!(listed[0].percentage_expense, 75);
        assert_eq!(listed[1].name, "Travel");
        assert_eq!(listed[1].percentage_expense, 25);
    }

    #[tokio::test]
    async fn test_list_categories_zero_month_is_zero_share() {
        let repository =
            Arc::new(MockCategoryRepository::new().with_category("c1", "u1", "Food", true));
        let (service, _notifications) = make_service(repository, Vec::new());

        let listed = service.list_categories("u1", 1, 10).unwrap();
        assert_eq!(listed[0].percentage_expense, 0);
    }

    #[tokio::test]
    async fn test_set_category_active_wording() {
        let repository =
            Arc::new(MockCategoryRepository::new().with_category("c1", "u1", "Food", true));
        let (service, notifications) = make_service(repository, Vec::new());

        service.set_category_active("u1", "c1", false).await.unwrap();
        tokio::task::yield_now().await;

        assert_eq!(
            notifications.messages(),
            vec!["A category Food has been deactivated!".to_string()]
        );
    }

    #[tokio::test]
    async fn test_update_category_mentions_both_names() {
        let repository =
            Arc::new(MockCategoryRepository::new().with_category("c1", "u1", "Food", true));
        let (service, notifications) = make_service(repository, Vec::new());

        let updated = service
            .update_category(
                "u1",
                "c1",
                CategoryUpdate {
                    name: "Groceries".to_string(),
                    active: true,
                },
            )
            .await
            .unwrap();
        tokio::task::yield_now().await;

        assert_eq!(updated.name, "Groceries");
        assert_eq!(
            notifications.messages(),
            vec!["A category Food has been updated to Groceries!".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_category_absent_is_not_found() {
        let repository = Arc::new(MockCategoryRepository::new());
        let (service, notifications) = make_service(repository, Vec::new());

        let err = service.delete_category("u1", "missing").await.unwrap_err();

        assert_eq!(err.to_string(), "Category not found!");
        assert!(notifications.messages().is_empty());
    }

    #[tokio::test]
    async fn test_list_active_options_excludes_inactive() {
        let repository = Arc::new(
            MockCategoryRepository::new()
                .with_category("c1", "u1", "Food", true)
                .with_category("c2", "u1", "Old", false),
        );
        let (service, _notifications) = make_service(repository, Vec::new());

        let options = service.list_active_options("u1").unwrap();
        assert_eq!(
            options,
            vec![CategoryOption {
                id: "c1".to_string(),
                name: "Food".to_string(),
                active: true,
            }]
        );
    }
}
