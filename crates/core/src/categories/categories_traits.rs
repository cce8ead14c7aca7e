use async_trait::async_trait;

use crate::errors::Result;

use super::categories_model::{
    Category, CategoryOption, CategoryUpdate, CategoryWithShare, NewCategory,
};

/// Trait for category repository operations
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn find_by_id(&self, user_id: &str, category_id: &str) -> Result<Option<Category>>;

    /// Case-insensitive name match within the user's categories.
    fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Category>>;

    fn list(&self, user_id: &str, offset: i64, limit: i64) -> Result<Vec<Category>>;

    fn list_active(&self, user_id: &str) -> Result<Vec<Category>>;

    fn count(&self, user_id: &str, active_only: bool) -> Result<i64>;

    async fn create(&self, user_id: &str, new_category: NewCategory) -> Result<Category>;

    async fn update(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category>;

    async fn set_active(&self, user_id: &str, category_id: &str, active: bool) -> Result<Category>;

    async fn delete(&self, user_id: &str, category_id: &str) -> Result<usize>;
}

/// Trait for category service operations
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    async fn create_category(&self, user_id: &str, new_category: NewCategory) -> Result<Category>;

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category>;

    /// Paginated listing with each category's share of the month's
    /// spending attached.
    fn list_categories(&self, user_id: &str, page: i64, limit: i64)
        -> Result<Vec<CategoryWithShare>>;

    /// Active categories only, trimmed for the expense entry picker.
    fn list_active_options(&self, user_id: &str) -> Result<Vec<CategoryOption>>;

    fn count_categories(&self, user_id: &str, active_only: bool) -> Result<i64>;

    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category>;

    async fn set_category_active(
        &self,
        user_id: &str,
        category_id: &str,
        active: bool,
    ) -> Result<Category>;

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()>;
}
