//! Categories module - spending category models, services, and traits.

mod categories_model;
mod categories_service;
mod categories_traits;

pub use categories_model::{
    Category, CategoryOption, CategoryUpdate, CategoryWithShare, NewCategory,
};
pub use categories_service::CategoryService;
pub use categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
