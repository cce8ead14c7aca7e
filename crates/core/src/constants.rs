/// Category key of the main (total monthly) budget row.
pub const MAIN_BUDGET_CATEGORY: &str = "main";

/// Number of digits in a one-time password.
pub const OTP_LENGTH: usize = 6;

/// OTP lifetime in seconds.
pub const OTP_TTL_SECONDS: i64 = 300;

/// Remaining OTP lifetime above which a resend request is refused.
pub const OTP_RESEND_THRESHOLD_SECONDS: i64 = 240;

/// Default page number for listings.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size for listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Minimum accepted username length.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Role assigned to self-registered users.
pub const ROLE_USER: &str = "user";

/// Role required for administrative routes.
pub const ROLE_ADMIN: &str = "admin";
