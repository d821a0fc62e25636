//! Checks shared by the ledger and budget stores before anything is written.

use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use crate::ValidationError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Check that `amount` is a finite, non-negative number.
pub(crate) fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonFiniteAmount);
    }

    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount(amount));
    }

    Ok(amount)
}

/// Trim `category` and check that something is left.
pub(crate) fn validate_category(category: &str) -> Result<String, ValidationError> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }

    Ok(category.to_owned())
}

/// Convert a month number (1 = January) to a [Month].
pub(crate) fn validate_month(month: u8) -> Result<Month, ValidationError> {
    Month::try_from(month).map_err(|_| ValidationError::InvalidMonth(month))
}

/// Parse a `YYYY-MM-DD` date string.
///
/// Calendar rules are checked, so "2024-02-30" is rejected.
pub fn parse_date(text: &str) -> Result<Date, ValidationError> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::ValidationError;

    use super::{parse_date, validate_amount, validate_category, validate_month};

    #[test]
    fn amount_accepts_zero_and_positive() {
        assert_eq!(validate_amount(0.0), Ok(0.0));
        assert_eq!(validate_amount(12.5), Ok(12.5));
    }

    #[test]
    fn amount_rejects_negative() {
        assert_eq!(
            validate_amount(-0.01),
            Err(ValidationError::NegativeAmount(-0.01))
        );
    }

    #[test]
    fn amount_rejects_nan_and_infinity() {
        assert_eq!(validate_amount(f64::NAN), Err(ValidationError::NonFiniteAmount));
        assert_eq!(
            validate_amount(f64::INFINITY),
            Err(ValidationError::NonFiniteAmount)
        );
    }

    #[test]
    fn category_is_trimmed() {
        assert_eq!(validate_category("  Food "), Ok("Food".to_owned()));
    }

    #[test]
    fn category_rejects_whitespace() {
        assert_eq!(validate_category("   "), Err(ValidationError::EmptyCategory));
    }

    #[test]
    fn month_range() {
        assert_eq!(validate_month(1), Ok(Month::January));
        assert_eq!(validate_month(12), Ok(Month::December));
        assert_eq!(validate_month(0), Err(ValidationError::InvalidMonth(0)));
        assert_eq!(validate_month(13), Err(ValidationError::InvalidMonth(13)));
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2024-05-01"), Ok(date!(2024 - 05 - 01)));
    }

    #[test]
    fn rejects_impossible_and_malformed_dates() {
        for text in ["2024-02-30", "2024-5-1", "01/05/2024", "2024-05", ""] {
            assert_eq!(
                parse_date(text),
                Err(ValidationError::InvalidDate(text.to_owned())),
                "{text} should be rejected"
            );
        }
    }
}
