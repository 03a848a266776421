use chrono::{NaiveDate, NaiveDateTime};

/// Formats tried, in order, for the lenient resolution-date parse.
const RESOLVED_DT_FMTS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const RESOLVED_DATE_FMTS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parse a ticket id that may carry spaces, non-breaking spaces or a zero
/// fraction ("5 732 943" → 5732943, "42.0" → 42). Returns None for anything
/// that is not a positive integer.
pub fn parse_ticket_id(s: &str) -> Option<i64> {
    let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    let id = match cleaned.parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            let f = cleaned.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 || f.abs() >= i64::MAX as f64 {
                return None;
            }
            f as i64
        }
    };
    (id > 0).then_some(id)
}

/// Strict date parse with the configured pattern ("05/01/2024" with "%d/%m/%Y").
pub fn parse_created_at(s: &str, fmt: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, fmt).ok()
}

/// Lenient resolution-date parse. The "not resolved" sentinel (compared
/// case-insensitively) and blank cells map to None, as does any text no
/// known format accepts. Date-only values resolve to midnight.
pub fn parse_resolved_at(s: &str, not_resolved: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(not_resolved.trim()) {
        return None;
    }
    RESOLVED_DT_FMTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            RESOLVED_DATE_FMTS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse an optional decimal that may use a comma separator ("" → None, "4,5" → Some(4.5)).
pub fn parse_opt_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Trimmed text, with blank cells mapped to None.
pub fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
