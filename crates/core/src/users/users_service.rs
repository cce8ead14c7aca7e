use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::auth::{OtpServiceTrait, PasswordHasherTrait};
use crate::constants::{MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH, OTP_LENGTH, ROLE_USER};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::{is_valid_email, page_to_offset};

use super::users_model::{
    AdminUpdateUser, NewUser, RegisterUser, ResetPassword, UpdateUserProfile, User, UserProfile,
    UserUpdate, UsersPage,
};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};

/// Service for account registration and management.
pub struct UserService {
    users: Arc<dyn UserRepositoryTrait>,
    otp: Arc<dyn OtpServiceTrait>,
    hasher: Arc<dyn PasswordHasherTrait>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        otp: Arc<dyn OtpServiceTrait>,
        hasher: Arc<dyn PasswordHasherTrait>,
    ) -> Self {
        UserService { users, otp, hasher }
    }

    fn validate_registration(registration: &RegisterUser) -> Result<()> {
        let valid = registration.username.len() >= MIN_USERNAME_LENGTH
            && is_valid_email(&registration.email)
            && registration.password.len() >= MIN_PASSWORD_LENGTH
            && registration.otp.len() >= OTP_LENGTH
            && registration
                .role
                .as_deref()
                .map_or(true, |role| role == ROLE_USER);
        if valid {
            Ok(())
        } else {
            Err(ValidationError::InvalidInput("Invalid User data".to_string()).into())
        }
    }

    fn validate_profile_update(update: &UpdateUserProfile) -> Result<()> {
        let valid = update
            .username
            .as_deref()
            .map_or(true, |username| username.len() >= MIN_USERNAME_LENGTH)
            && update.email.as_deref().map_or(true, is_valid_email)
            && update
                .password
                .as_deref()
                .map_or(true, |password| password.len() >= MIN_PASSWORD_LENGTH);
        if valid {
            Ok(())
        } else {
            Err(ValidationError::InvalidInput("Invalid user data".to_string()).into())
        }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, registration: RegisterUser) -> Result<User> {
        Self::validate_registration(&registration)?;

        if !self.otp.verify_otp(&registration.email, &registration.otp) {
            return Err(ValidationError::InvalidInput(
                "Otp expired or Invalid!".to_string(),
            )
            .into());
        }

        if self
            .users
            .find_by_username_or_email(&registration.username, &registration.email)?
            .is_some()
        {
            return Err(Error::ConstraintViolation(
                "User already exists with this username or email!".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&registration.password)?;
        let user = self
            .users
            .create(NewUser {
                username: registration.username,
                email: registration.email,
                role: ROLE_USER.to_string(),
                password_hash,
            })
            .await?;
        debug!("Registered account {}", user.id);
        Ok(user)
    }

    fn get_profile(&self, user_id: &str) -> Result<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)?
            .ok_or_else(|| Error::NotFound("User not Found!".to_string()))?;
        Ok(UserProfile {
            email: user.email,
            username: user.username,
        })
    }

    fn list_users(&self, page: i64, limit: i64) -> Result<UsersPage> {
        let (offset, limit) = page_to_offset(page, limit);
        let users = self.users.list(offset, limit)?;
        let count = self.users.count_non_admin()?;
        Ok(UsersPage { users, count })
    }

    async fn update_profile(&self, user_id: &str, update: UpdateUserProfile) -> Result<()> {
        Self::validate_profile_update(&update)?;

        let password_hash = match update.password.as_deref() {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };
        let touched = self
            .users
            .update(
                user_id,
                UserUpdate {
                    username: update.username,
                    email: update.email,
                    password_hash,
                },
            )
            .await?;
        if touched == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn admin_update_user(&self, user_id: &str, update: AdminUpdateUser) -> Result<()> {
        let valid = update
            .username
            .as_deref()
            .map_or(true, |username| username.len() >= MIN_USERNAME_LENGTH)
            && update.email.as_deref().map_or(true, is_valid_email)
            && (update.username.is_some() || update.email.is_some());
        if !valid {
            return Err(ValidationError::InvalidInput("Invalid user data".to_string()).into());
        }

        let touched = self
            .users
            .update(
                user_id,
                UserUpdate {
                    username: update.username,
                    email: update.email,
                    password_hash: None,
                },
            )
            .await?;
        if touched == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn reset_password(&self, reset: ResetPassword) -> Result<()> {
        if !is_valid_email(&reset.email)
            || reset.password.len() < MIN_PASSWORD_LENGTH
            || reset.otp.len() < OTP_LENGTH
        {
            return Err(ValidationError::InvalidInput("Invalid user data".to_string()).into());
        }

        if !self.otp.verify_otp(&reset.email, &reset.otp) {
            return Err(ValidationError::InvalidInput(
                "Otp invalid or Expired. Please try again!".to_string(),
            )
            .into());
        }

        let password_hash = self.hasher.hash(&reset.password)?;
        let touched = self
            .users
            .update_password_by_email(&reset.email, &password_hash)
            .await?;
        if touched == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let deleted = self.users.delete(user_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        debug!("Deleted account {}", user_id);
        Ok(())
    }
}
