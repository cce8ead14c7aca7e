use async_trait::async_trait;

use crate::errors::Result;

use super::users_model::{
    AdminUpdateUser, NewUser, RegisterUser, ResetPassword, UpdateUserProfile, User, UserProfile,
    UserUpdate, UsersPage,
};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn find_by_id(&self, user_id: &str) -> Result<Option<User>>;

    fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Option<User>>;

    /// Lists accounts in creation order, admins included.
    fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>>;

    /// Counts accounts, leaving admins out of the total.
    fn count_non_admin(&self) -> Result<i64>;

    async fn create(&self, user: NewUser) -> Result<User>;

    /// Applies the present fields only, returning the rows touched.
    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<usize>;

    async fn update_password_by_email(&self, email: &str, password_hash: &str) -> Result<usize>;

    async fn delete(&self, user_id: &str) -> Result<usize>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Registers an account after checking the emailed code.
    async fn register(&self, registration: RegisterUser) -> Result<User>;

    fn get_profile(&self, user_id: &str) -> Result<UserProfile>;

    fn list_users(&self, page: i64, limit: i64) -> Result<UsersPage>;

    async fn update_profile(&self, user_id: &str, update: UpdateUserProfile) -> Result<()>;

    async fn admin_update_user(&self, user_id: &str, update: AdminUpdateUser) -> Result<()>;

    /// Replaces the password of the account matching the reset payload's
    /// email, gated on the emailed code.
    async fn reset_password(&self, reset: ResetPassword) -> Result<()>;

    async fn delete_user(&self, user_id: &str) -> Result<()>;
}
