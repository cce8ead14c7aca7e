//! Budget reconciliation types.

use rust_decimal::Decimal;

/// The expense mutation that triggered a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseChange {
    Created { amount: Decimal },
    Updated { previous: Decimal, amount: Decimal },
}

/// A category's month spending held against its allocated budget.
///
/// A category with no budget row stands against zero, so any spending
/// at all reads as an excess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetStanding {
    pub total_expense: Decimal,
    pub category_budget: Decimal,
}

impl BudgetStanding {
    /// Spending past the budget; negative while room remains.
    pub fn diff(&self) -> Decimal {
        self.total_expense - self.category_budget
    }
}
