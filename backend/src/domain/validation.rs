//! Field validation helpers shared by the domain constructors.
//!
//! Every rule failure becomes an [`Error`] with code `invalid_request` and
//! `details` of the form `{"field": "title", "code": "too_long", "max": 100}`.

use serde_json::json;

use super::Error;

/// Machine-readable reasons attached to field validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    Missing,
    TooShort,
    TooLong,
    OutOfRange,
    InvalidCharacters,
    InvalidFormat,
}

impl FieldErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::OutOfRange => "out_of_range",
            Self::InvalidCharacters => "invalid_characters",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

/// Build an `invalid_request` error carrying the field and reason.
pub fn field_error(field: &str, code: FieldErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Trim `value` and require `min..=max` characters.
///
/// # Examples
/// ```
/// use giravent::domain::validation::bounded_text;
///
/// assert_eq!(bounded_text("title", "  Away day  ", 1, 100).unwrap(), "Away day");
/// assert!(bounded_text("title", "   ", 1, 100).is_err());
/// ```
pub fn bounded_text(field: &str, value: &str, min: usize, max: usize) -> Result<String, Error> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();
    if length == 0 && min > 0 {
        return Err(field_error(
            field,
            FieldErrorCode::Missing,
            format!("{field} must not be empty"),
        ));
    }
    if length < min {
        return Err(Error::invalid_request(format!(
            "{field} must be at least {min} characters"
        ))
        .with_details(json!({
            "field": field,
            "code": FieldErrorCode::TooShort.as_str(),
            "min": min,
        })));
    }
    if length > max {
        return Err(Error::invalid_request(format!(
            "{field} must be at most {max} characters"
        ))
        .with_details(json!({
            "field": field,
            "code": FieldErrorCode::TooLong.as_str(),
            "max": max,
        })));
    }
    Ok(trimmed.to_owned())
}

/// Validate an optional free-text field, mapping blank input to `None`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, Error> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let text = bounded_text(field, raw, 0, max)?;
            Ok((!text.is_empty()).then_some(text))
        }
    }
}

/// Require `value` to fall within `min..=max`.
pub fn bounded_number<T>(field: &str, value: T, min: T, max: T) -> Result<T, Error>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(field_error(
            field,
            FieldErrorCode::OutOfRange,
            format!("{field} must be between {min} and {max}"),
        ));
    }
    Ok(value)
}
