use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::auth::UserContext;
use crate::budgets::BudgetRepositoryTrait;
use crate::errors::Result;
use crate::expenses::ExpenseRepositoryTrait;
use crate::mail::{excess_expense_mail, send_detached, MailerTrait};
use crate::notifications::{
    notify_detached, NewNotification, NotificationKind, NotificationServiceTrait,
};
use crate::utils::{format_amount, month_bounds};

use super::reconciliation_model::{BudgetStanding, ExpenseChange};
use super::reconciliation_traits::ReconciliationServiceTrait;

/// Picks the notification a standing deserves, if any.
///
/// At the limit the budget figure is shown, past it the excess, and
/// under it the change itself plus the room left. A standing of zero
/// against zero stays quiet.
pub fn classify_standing(
    standing: BudgetStanding,
    change: ExpenseChange,
    category: &str,
) -> Option<(NotificationKind, String)> {
    let diff = standing.diff();

    if diff.is_zero() {
        if standing.category_budget.is_zero() || standing.total_expense.is_zero() {
            return None;
        }
        return Some((
            NotificationKind::Warning,
            format!(
                "You have reached your budget limit of Rs.{} for {}! Please refrain from spending more!",
                format_amount(standing.category_budget.abs()),
                category
            ),
        ));
    }

    if diff > Decimal::ZERO {
        return Some((
            NotificationKind::Error,
            format!(
                "You have exceeded your budget limit of {} by Rs.{} for {}! Please manage your expenses carefully!",
                format_amount(standing.category_budget),
                format_amount(diff.abs()),
                category
            ),
        ));
    }

    let (verb, magnitude) = match change {
        ExpenseChange::Created { amount } => ("increased", amount.abs()),
        ExpenseChange::Updated { previous, amount } => {
            let delta = previous - amount;
            (
                if delta > Decimal::ZERO {
                    "decreased"
                } else {
                    "increased"
                },
                delta.abs(),
            )
        }
    };
    Some((
        NotificationKind::Info,
        format!(
            "Expense for {} has been {} by Rs.{}! Remaining expendable budget is Rs.{}",
            category,
            verb,
            format_amount(magnitude),
            format_amount(diff.abs())
        ),
    ))
}

/// Whether a standing warrants the excess mail, and with what excess.
/// Zero means the budget was hit exactly.
pub fn mail_alert(standing: BudgetStanding) -> Option<Decimal> {
    if standing.total_expense.is_zero() {
        return None;
    }
    if standing.category_budget < standing.total_expense {
        Some(standing.diff())
    } else if standing.category_budget == standing.total_expense {
        Some(Decimal::ZERO)
    } else {
        None
    }
}

/// Service holding category spending against allocated budgets.
pub struct BudgetReconciliationService {
    expenses: Arc<dyn ExpenseRepositoryTrait>,
    budgets: Arc<dyn BudgetRepositoryTrait>,
    notifications: Arc<dyn NotificationServiceTrait>,
    mailer: Arc<dyn MailerTrait>,
}

impl BudgetReconciliationService {
    pub fn new(
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        budgets: Arc<dyn BudgetRepositoryTrait>,
        notifications: Arc<dyn NotificationServiceTrait>,
        mailer: Arc<dyn MailerTrait>,
    ) -> Self {
        BudgetReconciliationService {
            expenses,
            budgets,
            notifications,
            mailer,
        }
    }
}

#[async_trait]
impl ReconciliationServiceTrait for BudgetReconciliationService {
    async fn reconcile(
        &self,
        ctx: &UserContext,
        category: &str,
        change: ExpenseChange,
    ) -> Result<()> {
        let (start, end) = month_bounds(Utc::now().date_naive());
        let total_expense = self
            .expenses
            .sum_for_category(&ctx.user_id, category, start, end)?;
        let category_budget = self
            .budgets
            .find_by_category(&ctx.user_id, category)?
            .map(|b| b.budget)
            .unwrap_or(Decimal::ZERO);
        let standing = BudgetStanding {
            total_expense,
            category_budget,
        };

        if let Some((kind, message)) = classify_standing(standing, change, category) {
            notify_detached(
                &self.notifications,
                NewNotification {
                    user_id: ctx.user_id.clone(),
                    message,
                    kind,
                },
            );
        }
        if let Some(excess) = mail_alert(standing) {
            send_detached(
                &self.mailer,
                ctx.email.clone(),
                excess_expense_mail(excess, category),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budgets::{Budget, BudgetUpsert};
    use crate::expenses::{CategoryTotal, DailyExpense, Expense, ExpenseInput};
    use crate::mail::MockMailer;
    use crate::notifications::Notification;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn standing(total: Decimal, budget: Decimal) -> BudgetStanding {
        BudgetStanding {
            total_expense: total,
            category_budget: budget,
        }
    }

    #[test]
    fn test_classify_at_limit_is_warning() {
        let (kind, message) = classify_standing(
            standing(dec!(8000), dec!(8000)),
            ExpenseChange::Created { amount: dec!(500) },
            "Food",
        )
        .unwrap();

        assert_eq!(kind, NotificationKind::Warning);
        assert_eq!(
            message,
            "You have reached your budget limit of Rs.8000 for Food! Please refrain from spending more!"
        );
    }

    #[test]
    fn test_classify_past_limit_is_error() {
        let (kind, message) = classify_standing(
            standing(dec!(8500), dec!(8000)),
            ExpenseChange::Created { amount: dec!(500) },
            "Food",
        )
        .unwrap();

        assert_eq!(kind, NotificationKind::Error);
        assert_eq!(
            message,
            "You have exceeded your budget limit of 8000 by Rs.500 for Food! Please manage your expenses carefully!"
        );
    }

    #[test]
    fn test_classify_spending_without_budget_is_error() {
        let (kind, message) = classify_standing(
            standing(dec!(500), dec!(0)),
            ExpenseChange::Created { amount: dec!(500) },
            "Food",
        )
        .unwrap();

        assert_eq!(kind, NotificationKind::Error);
        assert_eq!(
            message,
            "You have exceeded your budget limit of 0 by Rs.500 for Food! Please manage your expenses carefully!"
        );
    }

    #[test]
    fn test_classify_under_limit_after_create() {
        let (kind, message) = classify_standing(
            standing(dec!(3000), dec!(8000)),
            ExpenseChange::Created { amount: dec!(300) },
            "Food",
        )
        .unwrap();

        assert_eq!(kind, NotificationKind::Info);
        assert_eq!(
            message,
            "Expense for Food has been increased by Rs.300! Remaining expendable budget is Rs.5000"
        );
    }

    #[test]
    fn test_classify_under_limit_after_shrinking_update() {
        let (_kind, message) = classify_standing(
            standing(dec!(3000), dec!(8000)),
            ExpenseChange::Updated {
                previous: dec!(400),
                amount: dec!(300),
            },
            "Food",
        )
        .unwrap();

        assert_eq!(
            message,
            "Expense for Food has been decreased by Rs.100! Remaining expendable budget is Rs.5000"
        );
    }

    #[test]
    fn test_classify_unchanged_update_reads_increased() {
        let (_kind, message) = classify_standing(
            standing(dec!(3000), dec!(8000)),
            ExpenseChange::Updated {
                previous: dec!(300),
                amount: dec!(300),
            },
            "Food",
        )
        .unwrap();

        assert_eq!(
            message,
            "Expense for Food has been increased by Rs.0! Remaining expendable budget is Rs.5000"
        );
    }

    #[test]
    fn test_classify_zero_against_zero_is_quiet() {
        assert!(classify_standing(
            standing(dec!(0), dec!(0)),
            ExpenseChange::Created { amount: dec!(0) },
            "Food",
        )
        .is_none());
    }

    #[test]
    fn test_mail_alert_cases() {
        assert_eq!(mail_alert(standing(dec!(8500), dec!(8000))), Some(dec!(500)));
        assert_eq!(mail_alert(standing(dec!(8000), dec!(8000))), Some(dec!(0)));
        assert_eq!(mail_alert(standing(dec!(100), dec!(200))), None);
        assert_eq!(mail_alert(standing(dec!(0), dec!(200))), None);
        assert_eq!(mail_alert(standing(dec!(500), dec!(0))), Some(dec!(500)));
    }

    struct MockExpenseRepository {
        month_total: Decimal,
    }

    #[async_trait]
    impl ExpenseRepositoryTrait for MockExpenseRepository {
        fn find_by_id(&self, _user_id: &str, _expense_id: &str) -> Result<Option<Expense>> {
            unimplemented!("not used in these tests")
        }

        fn search(
            &self,
            _user_id: &str,
            _start: Option<NaiveDateTime>,
            _end: Option<NaiveDateTime>,
            _offset: i64,
            _limit: i64,
        ) -> Result<Vec<Expense>> {
            unimplemented!("not used in these tests")
        }

        fn count(
            &self,
            _user_id: &str,
            _start: Option<NaiveDateTime>,
            _end: Option<NaiveDateTime>,
        ) -> Result<i64> {
            unimplemented!("not used in these tests")
        }

        fn sum_for_category(
            &self,
            _user_id: &str,
            _category: &str,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Decimal> {
            Ok(self.month_total)
        }

        fn sum_by_category(
            &self,
            _user_id: &str,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Vec<CategoryTotal>> {
            unimplemented!("not used in these tests")
        }

        fn sum_by_day(
            &self,
            _user_id: &str,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Vec<DailyExpense>> {
            unimplemented!("not used in these tests")
        }

        async fn create(&self, _user_id: &str, _input: ExpenseInput) -> Result<Expense> {
            unimplemented!("not used in these tests")
        }

        async fn update(
            &self,
            _user_id: &str,
            _expense_id: &str,
            _input: ExpenseInput,
        ) -> Result<Expense> {
            unimplemented!("not used in these tests")
        }

        async fn delete(&self, _user_id: &str, _expense_id: &str) -> Result<Expense> {
            unimplemented!("not used in these tests")
        }
    }

    struct MockBudgetRepository {
        food_budget: Option<Decimal>,
    }

    #[async_trait]
    impl BudgetRepositoryTrait for MockBudgetRepository {
        fn get_main(&self, _user_id: &str) -> Result<Option<Budget>> {
            unimplemented!("not used in these tests")
        }

        fn find_by_category(&self, user_id: &str, category: &str) -> Result<Option<Budget>> {
            let now = Utc::now().naive_utc();
            Ok(self.food_budget.map(|amount| Budget {
                id: "b1".to_string(),
                user_id: user_id.to_string(),
                category: category.to_string(),
                budget: amount,
                created_at: now,
                updated_at: now,
            }))
        }

        fn list(&self, _user_id: &str, _offset: i64, _limit: i64) -> Result<Vec<Budget>> {
            unimplemented!("not used in these tests")
        }

        fn list_allocations(&self, _user_id: &str) -> Result<Vec<Budget>> {
            unimplemented!("not used in these tests")
        }

        async fn upsert(
            &self,
            _user_id: &str,
            _category: &str,
            _amount: Decimal,
        ) -> Result<BudgetUpsert> {
            unimplemented!("not used in these tests")
        }
    }

    struct MockNotificationService {
        notified: Mutex<Vec<(NotificationKind, String)>>,
    }

    #[async_trait]
    impl NotificationServiceTrait for MockNotificationService {
        async fn notify(&self, notification: NewNotification) {
            self.notified
                .lock()
                .unwrap()
                .push((notification.kind, notification.message));
        }

        fn list_notifications(
            &self,
            _user_id: &str,
            _page: i64,
            _limit: i64,
        ) -> Result<Vec<Notification>> {
            unimplemented!("not used in these tests")
        }

        fn unread_count(&self, _user_id: &str) -> Result<i64> {
            unimplemented!("not used in these tests")
        }

        async fn mark_all_read(&self, _user_id: &str) -> Result<usize> {
            unimplemented!("not used in these tests")
        }
    }

    fn ctx() -> UserContext {
        UserContext {
            user_id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn test_reconcile_at_limit_notifies_and_mails() {
        let notifications = Arc::new(MockNotificationService {
            notified: Mutex::new(Vec::new()),
        });
        let mailer = Arc::new(MockMailer::new());
        let service = BudgetReconciliationService::new(
            Arc::new(MockExpenseRepository {
                month_total: dec!(8000),
            }),
            Arc::new(MockBudgetRepository {
                food_budget: Some(dec!(8000)),
            }),
            notifications.clone(),
            mailer.clone(),
        );

        service
            .reconcile(&ctx(), "Food", ExpenseChange::Created { amount: dec!(500) })
            .await
            .unwrap();
        tokio::task::yield_now().await;

        let notified = notifications.notified.lock().unwrap().clone();
        assert_eq!(notified.len(), 1);
        assert_eq!(notified[0].0, NotificationKind::Warning);

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
        assert_eq!(sent[0].subject, "Notice: Excess Expense Alert!");
        assert_eq!(sent[0].body, "You have reached your budget limit for Food");
    }

    #[tokio::test]
    async fn test_reconcile_under_limit_notifies_without_mail() {
        let notifications = Arc::new(MockNotificationService {
            notified: Mutex::new(Vec::new()),
        });
        let mailer = Arc::new(MockMailer::new());
        let service = BudgetReconciliationService::new(
            Arc::new(MockExpenseRepository {
                month_total: dec!(3000),
            }),
            Arc::new(MockBudgetRepository {
                food_budget: Some(dec!(8000)),
            }),
            notifications.clone(),
            mailer.clone(),
        );

        service
            .reconcile(&ctx(), "Food", ExpenseChange::Created { amount: dec!(300) })
            .await
            .unwrap();
        tokio::task::yield_now().await;

        let notified = notifications.notified.lock().unwrap().clone();
        assert_eq!(notified.len(), 1);
        assert_eq!(notified[0].0, NotificationKind::Info);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_past_limit_mails_excess() {
        let notifications = Arc::new(MockNotificationService {
            notified: Mutex::new(Vec::new()),
        });
        let mailer = Arc::new(MockMailer::new());
        let service = BudgetReconciliationService::new(
            Arc::new(MockExpenseRepository {
                month_total: dec!(8500),
            }),
            Arc::new(MockBudgetRepository {
                food_budget: Some(dec!(8000)),
            }),
            notifications.clone(),
            mailer.clone(),
        );

        service
            .reconcile(&ctx(), "Food", ExpenseChange::Created { amount: dec!(500) })
            .await
            .unwrap();
        tokio::task::yield_now().await;

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].body,
            "You have exceeded your budget for Food by - - - - 500! Please be mindful of your expenses."
        );
    }
}
