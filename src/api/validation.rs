use chrono::NaiveDate;

use super::ApiError;

/// Parse a form-supplied desk id. The error message is shown verbatim
/// by the frontend.
pub fn parse_desk_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::validation("Invalid Desk ID. Enter a valid number."))
}

/// Trim a form field; empty input counts as absent.
#[must_use]
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a reservation date in strict `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("Invalid date format. Use YYYY-MM-DD (e.g., 2025-09-10)."))
}
