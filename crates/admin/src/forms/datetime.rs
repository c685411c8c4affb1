//! Display codec for timestamps on the edit surface.
//!
//! Entities carry RFC 3339 timestamps on the wire. Forms carry them as
//! `YYYY-MM-DDTHH:MM` strings in UTC, which drops seconds and anything finer.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::FormError;

/// Format used for timestamp fields in form raw values.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Also accepted on input; browsers send seconds when the step allows it.
const DATE_TIME_WITH_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a timestamp for display in a form.
#[must_use]
pub fn format(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|value| value.format(DATE_TIME_FORMAT).to_string())
}

/// Parse a form timestamp back into a UTC timestamp.
///
/// Missing or blank input yields `None`.
///
/// # Errors
///
/// Returns `FormError::InvalidTimestamp` if the input is not in
/// [`DATE_TIME_FORMAT`].
pub fn parse(field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, FormError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, DATE_TIME_WITH_SECONDS_FORMAT))
        .map(|naive| Some(naive.and_utc()))
        .map_err(|_| FormError::InvalidTimestamp {
            field: field.to_string(),
            value: raw.to_string(),
        })
}
