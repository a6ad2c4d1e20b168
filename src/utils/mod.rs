use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use crate::models::MonthYear;

/// Deserializes a JSON `null` into the type's default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn parse_leave_date(value: &str) -> Option<NaiveDate> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }

    let formats = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
    for fmt in formats.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    // "2025-03-01 00:00:00" and similar timestamp shapes
    raw.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

pub fn falls_in(value: &str, period: MonthYear) -> bool {
    use chrono::Datelike;

    parse_leave_date(value)
        .map(|date| date.month() == period.month && date.year() == period.year)
        .unwrap_or(false)
}

pub fn format_days(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

pub fn is_valid_month(month: u32) -> bool {
    (1..=12).contains(&month)
}

pub fn is_valid_year(year: i32) -> bool {
    (1000..=9999).contains(&year)
}
