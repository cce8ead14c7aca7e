use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::{debug, error};
use rand::Rng;

use crate::constants::{OTP_LENGTH, OTP_RESEND_THRESHOLD_SECONDS, OTP_TTL_SECONDS};
use crate::errors::{Error, Result, ValidationError};
use crate::mail::{password_reset_otp_mail, send_detached, signup_otp_mail, MailerTrait};
use crate::users::UserRepositoryTrait;
use crate::utils::is_valid_email;

use super::auth_model::{NewOtp, OtpPurpose};
use super::auth_traits::{OtpRepositoryTrait, OtpServiceTrait};

/// Service issuing and checking emailed one-time passwords.
pub struct OtpService {
    otps: Arc<dyn OtpRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
    mailer: Arc<dyn MailerTrait>,
}

impl OtpService {
    pub fn new(
        otps: Arc<dyn OtpRepositoryTrait>,
        users: Arc<dyn UserRepositoryTrait>,
        mailer: Arc<dyn MailerTrait>,
    ) -> Self {
        OtpService { otps, users, mailer }
    }

    fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        (0..OTP_LENGTH)
            .map(|_| rng.gen_range(0..10u8).to_string())
            .collect()
    }
}

#[async_trait]
impl OtpServiceTrait for OtpService {
    async fn request_otp(&self, email: &str, purpose: OtpPurpose) -> Result<()> {
        if !email.is_empty() && !is_valid_email(email) {
            return Err(
                ValidationError::InvalidInput("Missing or invalid parameters".to_string()).into(),
            );
        }
        if purpose == OtpPurpose::Signup
            && !email.is_empty()
            && self.users.find_by_email(email)?.is_some()
        {
            return Err(Error::ConstraintViolation(
                "User already exists with this email!".to_string(),
            ));
        }
        if email.is_empty() {
            return Err(Error::NotFound("No email found!".to_string()));
        }

        let now = Utc::now().naive_utc();
        // Refuse a re-issue while the previous code still has more than
        // the resend threshold left to live.
        if let Some(existing) = self.otps.find_by_email(email)? {
            let remaining = existing.expires_at - now;
            if remaining > Duration::seconds(OTP_RESEND_THRESHOLD_SECONDS) {
                return Err(ValidationError::InvalidInput(format!(
                    "Please wait {} more seconds!",
                    remaining.num_seconds()
                ))
                .into());
            }
        }

        let code = Self::generate_code();
        self.otps
            .upsert(NewOtp {
                email: email.to_string(),
                code: code.clone(),
                expires_at: now + Duration::seconds(OTP_TTL_SECONDS),
            })
            .await?;
        debug!("Issued one-time password for {}", email);
        send_detached(
            &self.mailer,
            email.to_string(),
            signup_otp_mail(purpose, &code),
        );
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        if email.is_empty() {
            return Err(ValidationError::InvalidInput("Email is required!".to_string()).into());
        }
        if self.users.find_by_email(email)?.is_none() {
            return Err(ValidationError::InvalidInput(
                "User for this email doesnot exists!".to_string(),
            )
            .into());
        }

        let code = Self::generate_code();
        self.otps
            .upsert(NewOtp {
                email: email.to_string(),
                code: code.clone(),
                expires_at: Utc::now().naive_utc() + Duration::seconds(OTP_TTL_SECONDS),
            })
            .await?;
        debug!("Issued password reset code for {}", email);
        send_detached(&self.mailer, email.to_string(), password_reset_otp_mail(&code));
        Ok(())
    }

    fn verify_otp(&self, email: &str, code: &str) -> bool {
        if email.is_empty() || code.is_empty() {
            return false;
        }
        match self.otps.find_by_email(email) {
            Ok(Some(otp)) => otp.expires_at >= Utc::now().naive_utc() && otp.code == code,
            Ok(None) => false,
            Err(e) => {
                error!("Failed to look up one-time password: {}", e);
                false
            }
        }
    }
}
