//! Mail subjects and bodies.

use rust_decimal::Decimal;

use crate::auth::OtpPurpose;
use crate::utils::format_amount;

/// A rendered mail ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
}

/// Mail carrying a one-time password issued from the signup screen.
pub fn signup_otp_mail(purpose: OtpPurpose, otp: &str) -> MailMessage {
    let verb = match purpose {
        OtpPurpose::Signup => "register",
        OtpPurpose::PasswordChange => "password change",
    };
    MailMessage {
        subject: "ET: Signup Otp!".to_string(),
        body: otp_body(verb, otp),
    }
}

/// Mail carrying a one-time password for the forgotten password flow.
pub fn password_reset_otp_mail(otp: &str) -> MailMessage {
    MailMessage {
        subject: "ET: Password Reset Otp!".to_string(),
        body: otp_body("password reset", otp),
    }
}

fn otp_body(verb: &str, otp: &str) -> String {
    format!(
        "Ignore if not expecting this mail. your {verb} otp is: ---------- {otp} ---------- . Do not reply!"
    )
}

/// Alert sent when a category's month spending reaches or passes its budget.
///
/// `diff` is the amount spent past the budget; zero means the budget was
/// hit exactly.
pub fn excess_expense_mail(diff: Decimal, category: &str) -> MailMessage {
    let subject = "Notice: Excess Expense Alert!".to_string();
    let body = if diff.is_zero() {
        format!("You have reached your budget limit for {category}")
    } else {
        format!(
            "You have exceeded your budget for {category} by - - - - {}! Please be mindful of your expenses.",
            format_amount(diff)
        )
    };
    MailMessage { subject, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signup_otp_mail_register_wording() {
        let mail = signup_otp_mail(OtpPurpose::Signup, "123456");
        assert_eq!(mail.subject, "ET: Signup Otp!");
        assert_eq!(
            mail.body,
            "Ignore if not expecting this mail. your register otp is: ---------- 123456 ---------- . Do not reply!"
        );
    }

    #[test]
    fn test_signup_otp_mail_password_change_wording() {
        let mail = signup_otp_mail(OtpPurpose::PasswordChange, "654321");
        assert_eq!(mail.subject, "ET: Signup Otp!");
        assert!(mail.body.contains("your password change otp is"));
    }

    #[test]
    fn test_password_reset_otp_mail_wording() {
        let mail = password_reset_otp_mail("000111");
        assert_eq!(mail.subject, "ET: Password Reset Otp!");
        assert_eq!(
            mail.body,
            "Ignore if not expecting this mail. your password reset otp is: ---------- 000111 ---------- . Do not reply!"
        );
    }

    #[test]
    fn test_excess_expense_mail_reached_limit() {
        let mail = excess_expense_mail(dec!(0), "Food");
        assert_eq!(mail.subject, "Notice: Excess Expense Alert!");
        assert_eq!(mail.body, "You have reached your budget limit for Food");
    }

    #[test]
    fn test_excess_expense_mail_exceeded() {
        let mail = excess_expense_mail(dec!(500), "Food");
        assert_eq!(
            mail.body,
            "You have exceeded your budget for Food by - - - - 500! Please be mindful of your expenses."
        );
    }
}
