//! Expenses module - expense entry models, services, and traits.

pub mod expenses_model;
pub mod expenses_service;
pub mod expenses_traits;

pub use expenses_model::{
    CategoryExpense, CategoryTotal, DailyExpense, Expense, ExpenseDateFilter, ExpenseInput,
    MonthlyReport, TodayReport,
};
pub use expenses_service::ExpenseService;
pub use expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
