//! Field-level input rules applied before a record is created or updated.
//!
//! Rules run in a fixed order and stop at the first failure:
//! empty date, date length, date charset, empty amount, sign placement,
//! numeric amount. `memo` is never checked.

use crate::errors::ValidationError;

use super::Record;

/// Longest accepted date, in characters.
pub const MAX_DATE_LEN: usize = 10;

/// Checks the three raw fields and returns a record with `date` and `amount`
/// trimmed. `memo` is carried through unchanged.
pub fn validate(date: &str, amount: &str, memo: &str) -> Result<Record, ValidationError> {
    let date = check_date(date)?;
    let amount = check_amount(amount)?;
    Ok(Record::from_parts(date, amount, memo))
}

fn check_date(raw: &str) -> Result<&str, ValidationError> {
    let date = raw.trim();
    if date.is_empty() {
        return Err(ValidationError::EmptyDate);
    }
    if date.chars().count() > MAX_DATE_LEN {
        return Err(ValidationError::DateTooLong);
    }
    if !date.chars().all(|c| c.is_ascii_digit() || c == '/') {
        return Err(ValidationError::DateInvalidChars);
    }
    Ok(date)
}

fn check_amount(raw: &str) -> Result<&str, ValidationError> {
    let amount = raw.trim();
    if amount.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }
    if let Some(pos) = amount.find('-') {
        if pos != 0 || amount.matches('-').count() != 1 {
            return Err(ValidationError::AmountBadSign);
        }
    }
    // A lone `-` or a value past i64 would pass a pure charset check but can
    // never be summed.
    if !is_signed_integer(amount) || amount.parse::<i64>().is_err() {
        return Err(ValidationError::AmountNotNumeric);
    }
    Ok(amount)
}

/// Digits with at most one leading `-`, and at least one digit.
pub(crate) fn is_signed_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
