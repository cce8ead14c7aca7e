//! Reconciliation module - holds category spending against allocated budgets after every expense write.

pub mod reconciliation_model;
pub mod reconciliation_service;
pub mod reconciliation_traits;

pub use reconciliation_model::{BudgetStanding, ExpenseChange};
pub use reconciliation_service::{classify_standing, mail_alert, BudgetReconciliationService};
pub use reconciliation_traits::ReconciliationServiceTrait;
