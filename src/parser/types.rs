use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// An already-loaded export: header labels plus string cells, row-major.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        RawTable { headers, rows }
    }

    /// Convenience constructor from string slices, used by callers that
    /// build tables in memory.
    pub fn from_str_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }
}

/// Mapped cell values of one row, before coercion.
#[derive(Debug, Clone, Default)]
pub struct TicketRaw {
    pub id: Option<String>,
    pub ticket_type: Option<String>,
    pub created_at: Option<String>,
    pub resolved_at: Option<String>,
    pub service_duration: Option<String>,
    pub client: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub technician: Option<String>,
    pub rating_score: Option<String>,
    pub rating_description: Option<String>,
    pub desk: Option<String>,
    pub sla_response_status: Option<String>,
    pub sla_solution_status: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// A normalized ticket. Derived fields are computed once from `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    pub ticket_type: String,
    pub created_at: NaiveDate,
    pub resolved_at: Option<NaiveDateTime>,
    pub service_duration: String,
    pub client: String,
    pub category: String,
    pub subcategory: String,
    pub technician: String,
    pub rating_score: Option<f64>,
    pub rating_description: Option<String>,
    pub desk: String,
    pub sla_response_status: String,
    pub sla_solution_status: String,
    pub status: String,
    pub priority: String,
    pub month_label: String,
    pub day_label: String,
    pub sort_key: i64,
    pub count: u32,
    pub response_indicator: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}
