use std::borrow::Cow;

use validator::ValidationError;

use crate::utils::time::current_year;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Accepts international numbers: an optional leading `+` and 7 to 15 digits,
/// with spaces, dashes, dots and parentheses allowed as separators.
pub fn validate_phone(value: &str) -> std::result::Result<(), ValidationError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let mut count = 0usize;
    for c in digits.chars() {
        match c {
            '0'..='9' => count += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(invalid("phone", "Please provide a valid phone number")),
        }
    }
    if (7..=15).contains(&count) {
        Ok(())
    } else {
        Err(invalid("phone", "Please provide a valid phone number"))
    }
}

pub fn validate_graduation_year(year: i32) -> std::result::Result<(), ValidationError> {
    let now = current_year();
    if (now..=now + 10).contains(&year) {
        Ok(())
    } else {
        Err(invalid(
            "graduation_year",
            "Please provide a valid graduation year",
        ))
    }
}
