use std::collections::HashMap;

use crate::config::{FieldMapping, TicketField};
use crate::error::AppError;

/// Maps canonical fields to their column index in a raw row.
pub struct ColumnMap {
    indices: HashMap<TicketField, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// Build a ColumnMap from the header labels and the field mapping.
    /// Header labels are trimmed, and a leading UTF-8 BOM is ignored.
    pub fn from_headers<S: AsRef<str>>(headers: &[S], field_map: &[FieldMapping]) -> Self {
        let header_list: Vec<String> = headers
            .iter()
            .map(|h| h.as_ref().trim_start_matches('\u{FEFF}').trim().to_string())
            .collect();
        let by_label: HashMap<&str, usize> = header_list
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let indices = field_map
            .iter()
            .filter_map(|m| by_label.get(m.column.trim()).map(|&i| (m.field, i)))
            .collect();

        ColumnMap {
            indices,
            headers: header_list,
        }
    }

    /// Cell value of a mapped field. Short rows read as empty cells.
    pub fn get<'a>(&self, row: &'a [String], field: TicketField) -> Option<&'a str> {
        self.indices
            .get(&field)
            .map(|&i| row.get(i).map(String::as_str).unwrap_or(""))
    }

    /// Returns true if the field's column is present in the headers.
    pub fn has(&self, field: TicketField) -> bool {
        self.indices.contains_key(&field)
    }

    /// All header names in order.
    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }
}

/// Result of column validation.
#[derive(Debug)]
pub struct ColumnValidation {
    /// All column names present in the export.
    pub present: Vec<String>,
    /// Optional mapped columns absent from the export.
    pub missing_optional: Vec<String>,
    /// Columns present in the export but not mapped (discarded).
    pub ignored: Vec<String>,
}

/// Validate that every required mapped column is present.
/// Returns `AppError::MissingColumns` if any is absent.
pub fn validate_columns(
    col_map: &ColumnMap,
    field_map: &[FieldMapping],
) -> Result<ColumnValidation, AppError> {
    let missing_required: Vec<String> = field_map
        .iter()
        .filter(|m| m.required && !col_map.has(m.field))
        .map(|m| m.column.clone())
        .collect();

    if !missing_required.is_empty() {
        return Err(AppError::MissingColumns(missing_required));
    }

    let missing_optional = field_map
        .iter()
        .filter(|m| !m.required && !col_map.has(m.field))
        .map(|m| m.column.clone())
        .collect();

    let ignored = col_map
        .all_headers()
        .iter()
        .filter(|h| !field_map.iter().any(|m| m.column.trim() == h.as_str()))
        .cloned()
        .collect();

    Ok(ColumnValidation {
        present: col_map.all_headers().to_vec(),
        missing_optional,
        ignored,
    })
}
