use async_trait::async_trait;

use crate::auth::UserContext;
use crate::errors::Result;

use super::reconciliation_model::ExpenseChange;

/// Trait for budget reconciliation operations
#[async_trait]
pub trait ReconciliationServiceTrait: Send + Sync {
    /// Recomputes the month standing of a category after an expense
    /// change and fans out the resulting notification and mail alert.
    ///
    /// Read failures surface to the caller; the fan-out itself is
    /// detached and best-effort.
    async fn reconcile(
        &self,
        ctx: &UserContext,
        category: &str,
        change: ExpenseChange,
    ) -> Result<()>;
}
