use std::sync::Arc;

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::errors::{Error, Result, ValidationError};
use crate::users::{User, UserRepositoryTrait};
use crate::utils::is_valid_email;

use super::auth_traits::{AuthServiceTrait, PasswordHasherTrait};

/// Service checking login credentials against stored accounts.
pub struct AuthService {
    users: Arc<dyn UserRepositoryTrait>,
    hasher: Arc<dyn PasswordHasherTrait>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepositoryTrait>, hasher: Arc<dyn PasswordHasherTrait>) -> Self {
        AuthService { users, hasher }
    }
}

impl AuthServiceTrait for AuthService {
    fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        if !is_valid_email(email) || password.len() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::InvalidInput(
                "Missing or invalid Login Credentials".to_string(),
            )
            .into());
        }

        // The same answer for an unknown address and a wrong password.
        let user = self
            .users
            .find_by_email(email)?
            .ok_or_else(|| Error::Unauthorized("Invalid email or password".to_string()))?;
        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{NewUser, UserUpdate};
    use async_trait::async_trait;
    use chrono::Utc;

    struct MockUserRepository {
        user: Option<User>,
    }

    impl MockUserRepository {
        fn with_account(email: &str, password_hash: &str) -> Self {
            let now = Utc::now().naive_utc();
            MockUserRepository {
                user: Some(User {
                    id: "u1".to_string(),
                    username: "alice".to_string(),
                    email: email.to_string(),
                    role: "user".to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: now,
                    updated_at: now,
                }),
            }
        }

        fn empty() -> Self {
            MockUserRepository { user: None }
        }
    }

    #[async_trait]
    impl UserRepositoryTrait for MockUserRepository {
        fn find_by_id(&self, _user_id: &str) -> crate::errors::Result<Option<User>> {
            unimplemented!("not used in these tests")
        }

        fn find_by_email(&self, email: &str) -> crate::errors::Result<Option<User>> {
            Ok(self.user.clone().filter(|u| u.email == email))
        }

        fn find_by_username_or_email(
            &self,
            _username: &str,
            _email: &str,
        ) -> crate::errors::Result<Option<User>> {
            unimplemented!("not used in these tests")
        }

        fn list(&self, _offset: i64, _limit: i64) -> crate::errors::Result<Vec<User>> {
            unimplemented!("not used in these tests")
        }

        fn count_non_admin(&self) -> crate::errors::Result<i64> {
            unimplemented!("not used in these tests")
        }

        async fn create(&self, _user: NewUser) -> crate::errors::Result<User> {
            unimplemented!("not used in these tests")
        }

        async fn update(
            &self,
            _user_id: &str,
            _update: UserUpdate,
        ) -> crate::errors::Result<usize> {
            unimplemented!("not used in these tests")
        }

        async fn update_password_by_email(
            &self,
            _email: &str,
            _password_hash: &str,
        ) -> crate::errors::Result<usize> {
            unimplemented!("not used in these tests")
        }

        async fn delete(&self, _user_id: &str) -> crate::errors::Result<usize> {
            unimplemented!("not used in these tests")
        }
    }

    struct MockHasher;

    impl PasswordHasherTrait for MockHasher {
        fn hash(&self, password: &str) -> Result<String> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
            Ok(password_hash == format!("hashed:{password}"))
        }
    }

    fn make_service(repository: MockUserRepository) -> AuthService {
        AuthService::new(Arc::new(repository), Arc::new(MockHasher))
    }

    #[test]
    fn test_authenticate_valid_credentials() {
        let service = make_service(MockUserRepository::with_account(
            "alice@example.com",
            "hashed:secret1",
        ));

        let user = service.authenticate("alice@example.com", "secret1").unwrap();
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let service = make_service(MockUserRepository::with_account(
            "alice@example.com",
            "hashed:secret1",
        ));

        let err = service
            .authenticate("alice@example.com", "wrong-pass")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_authenticate_unknown_email_same_answer() {
        let service = make_service(MockUserRepository::empty());

        let err = service
            .authenticate("ghost@example.com", "secret1")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_authenticate_rejects_malformed_credentials() {
        let service = make_service(MockUserRepository::empty());

        let err = service.authenticate("not-an-email", "secret1").unwrap_err();
        assert_eq!(err.to_string(), "Missing or invalid Login Credentials");

        let err = service.authenticate("alice@example.com", "short").unwrap_err();
        assert_eq!(err.to_string(), "Missing or invalid Login Credentials");
    }
}
