//! Users module - account models, services, and traits.

mod users_model;
mod users_service;
mod users_traits;

pub use users_model::{
    AdminUpdateUser, NewUser, RegisterUser, ResetPassword, UpdateUserProfile, User, UserProfile,
    UserUpdate, UsersPage,
};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
