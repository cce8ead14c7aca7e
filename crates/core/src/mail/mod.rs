//! Mail module - outbound mail transports and message templates.

mod mailer;
mod messages;
mod relay_mailer;

pub use mailer::{send_detached, MailerTrait, MockMailer, NoopMailer, SentMail};
pub use messages::{excess_expense_mail, password_reset_otp_mail, signup_otp_mail, MailMessage};
pub use relay_mailer::HttpRelayMailer;
