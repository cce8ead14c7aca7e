//! Budgets module - main budget, category allocations, and overviews.

mod budgets_model;
mod budgets_service;
mod budgets_traits;

pub use budgets_model::{
    AllocationResult, Budget, BudgetAmount, BudgetUpsert, CategoryBudgetOverview,
    CategoryBudgetPage,
};
pub use budgets_service::BudgetService;
pub use budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
