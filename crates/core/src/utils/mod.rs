//! Shared helpers for pagination, amount formatting, and the date windows
//! used by listings and reports.

pub mod time_utils;

pub use time_utils::*;

use rust_decimal::Decimal;

use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Normalizes a 1-based page and page size into an `(offset, limit)` pair.
///
/// Pages below 1 are pulled up to the first page and the size is clamped
/// to `MAX_PAGE_SIZE`.
pub fn page_to_offset(page: i64, limit: i64) -> (i64, i64) {
    let page = if page < 1 { DEFAULT_PAGE } else { page };
    let limit = if limit < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        limit.min(MAX_PAGE_SIZE)
    };
    ((page - 1) * limit, limit)
}

/// Renders a monetary amount for user-facing messages, trimming
/// insignificant trailing zeros ("8000.00" becomes "8000").
pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Loose address check used by the signup and login validators.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
