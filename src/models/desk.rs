use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Display status of a desk, derived at read time from occupancy and
/// today's date. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeskStatus {
    Vacant,
    Occupied,
    Overdue,
}

impl fmt::Display for DeskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vacant => write!(f, "Vacant"),
            Self::Occupied => write!(f, "Occupied"),
            Self::Overdue => write!(f, "Overdue"),
        }
    }
}

/// Derive the display status for a desk row.
///
/// A desk with no occupant is `Vacant`. An occupied desk is `Occupied`
/// while today is strictly before the leaving date, and `Overdue` from
/// the leaving date onward.
#[must_use]
pub fn derive_status(occupant: Option<&str>, leaving: Option<&str>, today: NaiveDate) -> DeskStatus {
    if occupant.is_none() {
        return DeskStatus::Vacant;
    }

    // Stored dates are validated on write, so a parse failure here means a
    // hand-edited row; treat it as past due rather than hiding the desk.
    match leaving.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()) {
        Some(leaving_date) if today < leaving_date => DeskStatus::Occupied,
        _ => DeskStatus::Overdue,
    }
}

/// Render an optional stored date for display: `YYYY-MM-DD` or `-`.
#[must_use]
pub fn display_date(date: Option<&str>) -> String {
    date.map_or_else(|| "-".to_string(), ToString::to_string)
}
