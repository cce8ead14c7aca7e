//! Shared helpers for SQLite storage operations.

use diesel::define_sql_function;
use diesel::sql_types::Text;
use rust_decimal::Decimal;
use std::str::FromStr;

define_sql_function! {
    /// SQLite's LOWER(), for case-insensitive matching on category names.
    fn lower(value: Text) -> Text;
}

/// Parses an amount column stored as a text decimal.
///
/// A value that fails to parse is logged and read as zero rather than
/// failing the whole row.
pub fn parse_amount(value: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value) {
        Ok(amount) => amount,
        Err(e) => {
            log::error!(
                "Failed to parse {} '{}' as Decimal: {}. Falling back to ZERO.",
                field_name,
                value,
                e
            );
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_round_trips_text() {
        assert_eq!(parse_amount("1234.56", "budget"), dec!(1234.56));
        assert_eq!(parse_amount("-40", "budget"), dec!(-40));
    }

    #[test]
    fn test_parse_amount_falls_back_to_zero() {
        assert_eq!(parse_amount("not-a-number", "expense"), Decimal::ZERO);
        assert_eq!(parse_amount("", "expense"), Decimal::ZERO);
    }
}
