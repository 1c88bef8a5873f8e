//! Field extraction helpers for raw API records
//!
//! The API returns camelCase JSON objects with some nested sections
//! (`nameAddress`, `personal`, `assignedManager`). These helpers look up a
//! dotted key path such as `nameAddress.city` and convert the value, so the
//! record mappers stay a flat list of field assignments.
//!
//! JSON `null` is treated the same as an absent key, except by
//! [`nullable_str`], which requires the key but accepts a `null` value.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::{InsperityError, Result};

/// Look up a dotted key path in a JSON object.
///
/// Returns `None` when any segment is missing or the final value is `null`.
///
/// # Example
/// ```
/// use insperity_client::utils::lookup;
/// use serde_json::json;
///
/// let record = json!({"nameAddress": {"city": "Anytown", "address2": null}});
/// assert_eq!(lookup(&record, "nameAddress.city"), Some(&json!("Anytown")));
/// assert_eq!(lookup(&record, "nameAddress.address2"), None);
/// assert_eq!(lookup(&record, "personal.homePhone"), None);
/// ```
#[must_use]
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let value = path
        .split('.')
        .try_fold(record, |current, key| current.get(key))?;
    if value.is_null() { None } else { Some(value) }
}

/// Render a scalar as text. Ids and codes come back as either strings or numbers.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Required text field.
///
/// # Errors
/// `MissingField` if the key is absent or null, `InvalidField` if the value
/// is an object or array.
pub fn required_str(record: &Value, path: &str) -> Result<String> {
    let value = lookup(record, path).ok_or_else(|| InsperityError::missing_field(path))?;
    scalar_to_string(value)
        .ok_or_else(|| InsperityError::invalid_field(path, format!("expected a scalar, got {value}")))
}

/// Text field whose key must be present but whose value may be `null`.
///
/// # Errors
/// `MissingField` if the key is absent, `InvalidField` if the value is an
/// object or array.
///
/// # Example
/// ```
/// use insperity_client::utils::nullable_str;
/// use serde_json::json;
///
/// let record = json!({"nameAddress": {"address2": null}});
/// assert_eq!(nullable_str(&record, "nameAddress.address2").unwrap(), None);
/// assert!(nullable_str(&record, "middleName").is_err());
/// ```
pub fn nullable_str(record: &Value, path: &str) -> Result<Option<String>> {
    let value = path
        .split('.')
        .try_fold(record, |current, key| current.get(key))
        .ok_or_else(|| InsperityError::missing_field(path))?;
    if value.is_null() {
        return Ok(None);
    }
    scalar_to_string(value)
        .map(Some)
        .ok_or_else(|| InsperityError::invalid_field(path, format!("expected a scalar, got {value}")))
}

/// Optional text field; absent, null and non-scalar values all yield `None`.
#[must_use]
pub fn optional_str(record: &Value, path: &str) -> Option<String> {
    lookup(record, path).and_then(scalar_to_string)
}

/// Optional numeric field. Accepts JSON numbers and numeric strings.
///
/// # Errors
/// `InvalidField` if the value is present but not a number.
pub fn optional_f64(record: &Value, path: &str) -> Result<Option<f64>> {
    let Some(value) = lookup(record, path) else {
        return Ok(None);
    };
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .map(Some)
        .ok_or_else(|| InsperityError::invalid_field(path, format!("expected a number, got {value}")))
}

/// Boolean flag, `false` when absent.
///
/// # Errors
/// `InvalidField` if the value is present but not a boolean.
pub fn flag(record: &Value, path: &str) -> Result<bool> {
    match lookup(record, path) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(InsperityError::invalid_field(
            path,
            format!("expected a boolean, got {other}"),
        )),
    }
}

/// Optional date field.
///
/// Absent dates are `None`. A malformed date is also `None`, but is logged at
/// warn level with the field name so bad upstream data does not go unnoticed.
#[must_use]
pub fn optional_date(record: &Value, path: &str) -> Option<NaiveDate> {
    let value = lookup(record, path)?;
    let parsed = value.as_str().and_then(parse_iso_date);
    if parsed.is_none() {
        tracing::warn!(field = path, value = %value, "Unparseable date, treating as absent");
    }
    parsed
}

/// Parse an ISO-8601 date or date-time string into a calendar date.
///
/// Accepts `2019-01-01T00:00:00`, fractional seconds, an RFC 3339 offset,
/// or a plain `2019-01-01`. The time of day is discarded.
///
/// # Example
/// ```
/// use insperity_client::utils::parse_iso_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     parse_iso_date("2019-01-01T00:00:00"),
///     NaiveDate::from_ymd_opt(2019, 1, 1)
/// );
/// assert_eq!(parse_iso_date("not a date"), None);
/// ```
#[must_use]
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = value.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
