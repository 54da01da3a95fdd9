use rust_decimal::Decimal;

use crate::{error::PayrollError, payroll::net::round_money};

/// Largest amount a `DECIMAL(12, 2)` money column holds, 9999999999.99.
// mantissa 999_999_999_999 split into 32-bit words
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Trimmed value of a required text field.
pub fn required(label: &str, value: Option<String>) -> Result<String, PayrollError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PayrollError::validation(format!("{label} is required"))),
    }
}

/// Trimmed value of an optional text field; blank counts as absent.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn max_len(label: &str, value: String, max: usize) -> Result<String, PayrollError> {
    if value.chars().count() > max {
        return Err(PayrollError::validation(format!(
            "{label} must be at most {max} characters"
        )));
    }
    Ok(value)
}

/// Optional text field with a length limit; blank counts as absent.
pub fn bounded(
    label: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, PayrollError> {
    optional(value).map(|v| max_len(label, v, max)).transpose()
}

/// A required money amount, rounded to cents, between zero and [`MAX_AMOUNT`].
pub fn amount(label: &str, value: Option<Decimal>) -> Result<Decimal, PayrollError> {
    let value = value.ok_or_else(|| PayrollError::validation(format!("{label} is required")))?;
    non_negative(label, value)
}

pub fn non_negative(label: &str, value: Decimal) -> Result<Decimal, PayrollError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PayrollError::validation(format!(
            "{label} must not be negative"
        )));
    }
    let value = round_money(value);
    if value > MAX_AMOUNT {
        return Err(PayrollError::validation(format!(
            "{label} must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(value)
}
