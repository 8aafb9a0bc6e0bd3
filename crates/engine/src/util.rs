//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every write path enforces the same invariants.

use chrono::NaiveDate;

use crate::{EngineError, ResultEngine};

pub(crate) fn normalize_title(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_amount(amount: f64) -> ResultEngine<f64> {
    if !amount.is_finite() {
        return Err(EngineError::Validation(
            "amount must be a number".to_string(),
        ));
    }
    if amount < 0.0 {
        return Err(EngineError::Validation("amount must be >= 0".to_string()));
    }
    Ok(amount)
}

/// Keep the date part of `value` and check it is a real calendar date.
pub(crate) fn normalize_expense_date(value: &str) -> ResultEngine<String> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| {
            EngineError::Validation(format!(
                "expense_date must be a YYYY-MM-DD date, got '{value}'"
            ))
        })
}

pub(crate) fn normalize_description(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_required() {
        assert_eq!(normalize_title("  Rent ").unwrap(), "Rent");
        assert!(normalize_title("   ").is_err());
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert_eq!(
            validate_amount(-1.0),
            Err(EngineError::Validation("amount must be >= 0".to_string()))
        );
        assert_eq!(validate_amount(0.0), Ok(0.0));
        assert!(validate_amount(f64::NAN).is_err());
    }

    #[test]
    fn expense_date_keeps_date_part() {
        assert_eq!(
            normalize_expense_date("2025-03-04T10:00:00Z").unwrap(),
            "2025-03-04"
        );
        assert_eq!(normalize_expense_date("2025-03-04").unwrap(), "2025-03-04");
    }

    #[test]
    fn impossible_dates_are_rejected() {
        assert!(normalize_expense_date("2025-02-30").is_err());
        assert!(normalize_expense_date("yesterday").is_err());
        assert!(normalize_expense_date("").is_err());
    }

    #[test]
    fn description_defaults_to_empty() {
        assert_eq!(normalize_description(None), "");
        assert_eq!(normalize_description(Some("  note ")), "note");
    }
}
