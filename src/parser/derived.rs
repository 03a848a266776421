//! Fields computed from the creation date at normalization time.
use chrono::{Datelike, NaiveDate};

use crate::config::MonthNames;

/// "jan/2024"
pub fn month_label(date: NaiveDate, names: &MonthNames) -> String {
    format!("{}/{}", names.abbrev(date.month()), date.year()).to_lowercase()
}

/// "05/jan"
pub fn day_label(date: NaiveDate, names: &MonthNames) -> String {
    format!("{:02}/{}", date.day(), names.abbrev(date.month())).to_lowercase()
}

/// Months elapsed since 1970-01; orders month labels chronologically.
pub fn sort_key(date: NaiveDate) -> i64 {
    (date.year() as i64 - 1970) * 12 + date.month0() as i64
}
