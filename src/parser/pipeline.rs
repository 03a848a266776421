use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use crate::config::{DashboardConfig, DateErrorPolicy, TicketField};
use crate::error::AppError;
use crate::parser::columns::{validate_columns, ColumnMap};
use crate::parser::deserializers::{
    non_blank, parse_created_at, parse_opt_f64, parse_resolved_at, parse_ticket_id,
};
use crate::parser::derived::{day_label, month_label, sort_key};
use crate::parser::types::{ParseWarning, RawTable, Ticket, TicketRaw};

/// Output of a load: the canonical ticket set and its import metadata.
/// Tickets are sorted by `sort_key` ascending (stable).
#[derive(Debug)]
pub struct ParseOutput {
    pub tickets: Vec<Ticket>,
    pub report: LoadReport,
}

/// Import metadata returned alongside the canonical set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub total_tickets: usize,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<ParseWarning>,
    pub detected_columns: Vec<String>,
    pub missing_optional_columns: Vec<String>,
    pub ignored_columns: Vec<String>,
    pub unique_statuses: Vec<String>,
    pub unique_types: Vec<String>,
    pub parse_duration_ms: u64,
}

/// Why a single row could not be normalized.
#[derive(Debug, Clone, PartialEq)]
enum RowError {
    InvalidId(String),
    InvalidCreatedAt(String),
}

/// Parse a ticket export in CSV form from `path`.
pub fn parse_csv(
    path: impl AsRef<Path>,
    config: &DashboardConfig,
) -> Result<ParseOutput, AppError> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_csv_reader(std::io::BufReader::new(file), config)
}

/// CSV parsing from any `Read` source, useful for tests.
pub fn parse_csv_reader<R: Read>(
    reader: R,
    config: &DashboardConfig,
) -> Result<ParseOutput, AppError> {
    let table = read_raw_table(reader, config.csv_delimiter)?;
    normalize_table(&table, config)
}

/// Reads a delimited export into a `RawTable` without interpreting cells.
pub fn read_raw_table<R: Read>(reader: R, delimiter: char) -> Result<RawTable, AppError> {
    if !delimiter.is_ascii() {
        return Err(AppError::InvalidConfig(format!(
            "csvDelimiter {:?} is not ASCII",
            delimiter
        )));
    }
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .double_quote(true)
        .quoting(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

/// Normalizes an already-loaded table into the canonical ticket set.
///
/// Fatal conditions (missing required column, uncoercible or duplicate id,
/// and an unparsable creation date under `DateErrorPolicy::RejectLoad`)
/// abort the load; no partial set is returned.
pub fn normalize_table(
    table: &RawTable,
    config: &DashboardConfig,
) -> Result<ParseOutput, AppError> {
    let start = Instant::now();

    // Phase 1: validate columns
    if table.headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&table.headers, &config.field_map);
    let col_validation = validate_columns(&col_map, &config.field_map)?;

    // Phase 2: coerce and derive
    let mut tickets: Vec<Ticket> = Vec::with_capacity(table.rows.len());
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut seen_ids: HashSet<i64> = HashSet::with_capacity(table.rows.len());
    let mut unique_statuses: BTreeSet<String> = BTreeSet::new();
    let mut unique_types: BTreeSet<String> = BTreeSet::new();

    for (idx, row) in table.rows.iter().enumerate() {
        let line = idx + 2; // +1 for 1-based, +1 for the header row
        let raw = row_to_raw(&col_map, row);

        match normalize_ticket(&raw, config) {
            Ok(ticket) => {
                if !seen_ids.insert(ticket.id) {
                    return Err(AppError::DuplicateTicketId {
                        line,
                        id: ticket.id,
                    });
                }
                unique_statuses.insert(ticket.status.clone());
                unique_types.insert(ticket.ticket_type.clone());
                tickets.push(ticket);
            }
            Err(RowError::InvalidId(value)) => {
                return Err(AppError::InvalidTicketId { line, value });
            }
            Err(RowError::InvalidCreatedAt(value)) => match config.date_error_policy {
                DateErrorPolicy::RejectLoad => {
                    return Err(AppError::InvalidCreatedAt { line, value });
                }
                DateErrorPolicy::SkipRow => {
                    let message = format!("Invalid creation date {:?}, row skipped", value);
                    log::warn!("Line {}: {}", line, message);
                    warnings.push(ParseWarning { line, message });
                }
            },
        }
    }

    tickets.sort_by_key(|t| t.sort_key);

    let report = LoadReport {
        total_tickets: tickets.len(),
        total_rows_processed: table.rows.len(),
        skipped_rows: warnings.len(),
        warnings,
        detected_columns: col_validation.present,
        missing_optional_columns: col_validation.missing_optional,
        ignored_columns: col_validation.ignored,
        unique_statuses: unique_statuses.into_iter().collect(),
        unique_types: unique_types.into_iter().collect(),
        parse_duration_ms: start.elapsed().as_millis() as u64,
    };
    log::info!(
        "Normalized {} tickets from {} rows ({} skipped) in {} ms",
        report.total_tickets,
        report.total_rows_processed,
        report.skipped_rows,
        report.parse_duration_ms
    );
    Ok(ParseOutput { tickets, report })
}

fn row_to_raw(col_map: &ColumnMap, row: &[String]) -> TicketRaw {
    let get = |field: TicketField| col_map.get(row, field).map(str::to_string);
    TicketRaw {
        id: get(TicketField::Id),
        ticket_type: get(TicketField::TicketType),
        created_at: get(TicketField::CreatedAt),
        resolved_at: get(TicketField::ResolvedAt),
        service_duration: get(TicketField::ServiceDuration),
        client: get(TicketField::Client),
        category: get(TicketField::Category),
        subcategory: get(TicketField::Subcategory),
        technician: get(TicketField::Technician),
        rating_score: get(TicketField::RatingScore),
        rating_description: get(TicketField::RatingDescription),
        desk: get(TicketField::Desk),
        sla_response_status: get(TicketField::SlaResponseStatus),
        sla_solution_status: get(TicketField::SlaSolutionStatus),
        status: get(TicketField::Status),
        priority: get(TicketField::Priority),
    }
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").trim().to_string()
}

fn normalize_ticket(raw: &TicketRaw, config: &DashboardConfig) -> Result<Ticket, RowError> {
    // ID (required, fatal)
    let id_str = raw.id.as_deref().unwrap_or("");
    let id = parse_ticket_id(id_str).ok_or_else(|| RowError::InvalidId(id_str.to_string()))?;

    // Creation date (required, strict pattern)
    let created_str = raw.created_at.as_deref().unwrap_or("");
    let created_at = parse_created_at(created_str, &config.created_at_format)
        .ok_or_else(|| RowError::InvalidCreatedAt(created_str.to_string()))?;

    // Resolution date (lenient)
    let resolved_at = raw
        .resolved_at
        .as_deref()
        .and_then(|s| parse_resolved_at(s, &config.not_resolved_sentinel));

    let rating_score = raw.rating_score.as_deref().and_then(|s| {
        let score = parse_opt_f64(s);
        if score.is_none() && !s.trim().is_empty() {
            log::warn!("Ticket {}: unreadable rating score {:?}", id, s);
        }
        score
    });

    Ok(Ticket {
        id,
        ticket_type: trimmed(&raw.ticket_type),
        created_at,
        resolved_at,
        service_duration: raw.service_duration.clone().unwrap_or_default(),
        client: trimmed(&raw.client),
        category: trimmed(&raw.category),
        subcategory: trimmed(&raw.subcategory),
        technician: trimmed(&raw.technician),
        rating_score,
        rating_description: raw.rating_description.as_deref().and_then(non_blank),
        desk: trimmed(&raw.desk),
        sla_response_status: trimmed(&raw.sla_response_status),
        sla_solution_status: trimmed(&raw.sla_solution_status),
        status: trimmed(&raw.status),
        priority: trimmed(&raw.priority),
        month_label: month_label(created_at, &config.month_names),
        day_label: day_label(created_at, &config.month_names),
        sort_key: sort_key(created_at),
        count: 1,
        response_indicator: 0,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
