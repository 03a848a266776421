use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Canonical ticket fields a source column can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketField {
    Id,
    TicketType,
    CreatedAt,
    ResolvedAt,
    ServiceDuration,
    Client,
    Category,
    Subcategory,
    Technician,
    RatingScore,
    RatingDescription,
    Desk,
    SlaResponseStatus,
    SlaSolutionStatus,
    Status,
    Priority,
}

impl TicketField {
    pub const ALL: [TicketField; 16] = [
        TicketField::Id,
        TicketField::TicketType,
        TicketField::CreatedAt,
        TicketField::ResolvedAt,
        TicketField::ServiceDuration,
        TicketField::Client,
        TicketField::Category,
        TicketField::Subcategory,
        TicketField::Technician,
        TicketField::RatingScore,
        TicketField::RatingDescription,
        TicketField::Desk,
        TicketField::SlaResponseStatus,
        TicketField::SlaSolutionStatus,
        TicketField::Status,
        TicketField::Priority,
    ];
}

/// One entry of the source label → canonical field table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub column: String,
    pub field: TicketField,
    /// Optional columns may be absent from the export; their values become `None`.
    #[serde(default = "default_true")]
    pub required: bool,
}

fn default_true() -> bool {
    true
}

/// A summary counter: distinct tickets whose status equals `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounter {
    pub key: String,
    pub label: String,
    pub status: String,
}

/// What to do with a row whose creation date does not match `created_at_format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateErrorPolicy {
    /// Abort the whole load with `AppError::InvalidCreatedAt`.
    RejectLoad,
    /// Drop the row and report a `ParseWarning`.
    SkipRow,
}

/// Color assigned to ticket types absent from `type_colors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedColorPolicy {
    Omit,
    Fallback(String),
}

/// Abbreviated month names, January first. Injected instead of relying on
/// the process locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthNames(pub [String; 12]);

impl MonthNames {
    pub fn pt_br() -> Self {
        MonthNames(
            [
                "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
            ]
            .map(String::from),
        )
    }

    pub fn en() -> Self {
        MonthNames(
            [
                "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
            ]
            .map(String::from),
        )
    }

    /// `month` is 1-based, as returned by `chrono::Datelike::month`.
    pub fn abbrev(&self, month: u32) -> &str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        &self.0[idx]
    }
}

impl Default for MonthNames {
    fn default() -> Self {
        MonthNames::pt_br()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub field_map: Vec<FieldMapping>,
    pub select_all_label: String,
    pub not_resolved_sentinel: String,
    pub created_at_format: String,
    pub csv_delimiter: char,
    pub date_error_policy: DateErrorPolicy,
    pub unmapped_color_policy: UnmappedColorPolicy,
    pub month_names: MonthNames,
    pub status_counters: Vec<StatusCounter>,
    pub type_colors: BTreeMap<String, String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let mapping = |column: &str, field: TicketField, required: bool| FieldMapping {
            column: column.to_string(),
            field,
            required,
        };
        let counter = |key: &str, label: &str, status: &str| StatusCounter {
            key: key.to_string(),
            label: label.to_string(),
            status: status.to_string(),
        };

        DashboardConfig {
            field_map: vec![
                mapping("TICKET", TicketField::Id, true),
                mapping("TIPO DO TICKET", TicketField::TicketType, true),
                mapping("DATA DE CRIAÇÃO DO TICKET", TicketField::CreatedAt, true),
                mapping("DATA DA SOLUÇÃO", TicketField::ResolvedAt, true),
                mapping("TEMPO TOTAL DE ATENDIMENTO", TicketField::ServiceDuration, true),
                mapping("NOME FANTASIA DO CLIENTE", TicketField::Client, true),
                mapping("NOME DA CATEGORIA PRIMÁRIA", TicketField::Category, true),
                mapping("NOME DA CATEGORIA SECUNDÁRIA", TicketField::Subcategory, true),
                mapping("NOME DO TÉCNICO", TicketField::Technician, true),
                mapping("NOTA DA AVALIAÇÃO", TicketField::RatingScore, false),
                mapping("DESCRIÇÃO DA AVALIAÇÃO", TicketField::RatingDescription, false),
                mapping("DESCRIÇÃO DA MESA DE TRABALHO", TicketField::Desk, true),
                mapping("STATUS SLA RESPOSTA", TicketField::SlaResponseStatus, true),
                mapping("STATUS SLA SOLUÇÃO", TicketField::SlaSolutionStatus, true),
                mapping("STATUS DO TICKET", TicketField::Status, true),
                mapping("PRIORIDADE", TicketField::Priority, true),
            ],
            select_all_label: "Selecionar Tudo".to_string(),
            not_resolved_sentinel: "nao possui".to_string(),
            created_at_format: "%d/%m/%Y".to_string(),
            csv_delimiter: ';',
            date_error_policy: DateErrorPolicy::SkipRow,
            unmapped_color_policy: UnmappedColorPolicy::Omit,
            month_names: MonthNames::pt_br(),
            status_counters: vec![
                counter("a_fazer", "Tickets a Fazer", "A fazer"),
                counter("atendendo", "Tickets Atendendo", "Atendendo"),
                counter("pausados", "Tickets Pausados", "Pausado"),
                counter("em_conferencia", "Tickets Em Conferência", "Não possui"),
            ],
            type_colors: [
                ("Incidente", "#FF8D02"),
                ("Requisição de Serviço", "#00990D"),
                ("Problema", "#B82601"),
                ("Não possui", "#7E00B8"),
                ("Preventivo Técnico", "#FFBB00"),
                ("Conferência Backup", "#7CBB00"),
                ("Preventivo Cliente", "#0375B4"),
                ("Preventivo", "#0375B4"),
            ]
            .into_iter()
            .map(|(t, c)| (t.to_string(), c.to_string()))
            .collect(),
        }
    }
}

impl DashboardConfig {
    /// Mapping entry for a canonical field, if any.
    pub fn mapping_for(&self, field: TicketField) -> Option<&FieldMapping> {
        self.field_map.iter().find(|m| m.field == field)
    }

    /// Color for a ticket type, applying the unmapped-type policy.
    pub fn color_for(&self, ticket_type: &str) -> Option<String> {
        match self.type_colors.get(ticket_type) {
            Some(color) => Some(color.clone()),
            None => match &self.unmapped_color_policy {
                UnmappedColorPolicy::Omit => None,
                UnmappedColorPolicy::Fallback(color) => Some(color.clone()),
            },
        }
    }

    /// Checks that every canonical field is mapped exactly once and that
    /// the id and creation date columns are required.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut seen: HashSet<TicketField> = HashSet::new();
        let mut columns: HashSet<&str> = HashSet::new();
        for m in &self.field_map {
            if !seen.insert(m.field) {
                return Err(AppError::InvalidConfig(format!(
                    "field {:?} is mapped more than once",
                    m.field
                )));
            }
            if !columns.insert(m.column.trim()) {
                return Err(AppError::InvalidConfig(format!(
                    "column {:?} is mapped more than once",
                    m.column
                )));
            }
        }

        let unmapped: Vec<String> = TicketField::ALL
            .iter()
            .filter(|f| !seen.contains(*f))
            .map(|f| format!("{:?}", f))
            .collect();
        if !unmapped.is_empty() {
            return Err(AppError::InvalidConfig(format!(
                "unmapped fields: {}",
                unmapped.join(", ")
            )));
        }

        for field in [TicketField::Id, TicketField::CreatedAt] {
            if self.mapping_for(field).is_some_and(|m| !m.required) {
                return Err(AppError::InvalidConfig(format!(
                    "field {:?} cannot be optional",
                    field
                )));
            }
        }

        if self.select_all_label.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "selectAllLabel must not be empty".to_string(),
            ));
        }
        if !self.csv_delimiter.is_ascii() {
            return Err(AppError::InvalidConfig(format!(
                "csvDelimiter {:?} is not ASCII",
                self.csv_delimiter
            )));
        }
        if self.month_names.0.iter().any(|n| n.trim().is_empty()) {
            return Err(AppError::InvalidConfig(
                "monthNames must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses a JSON configuration; absent keys take their default value.
    pub fn from_json_str(json: &str) -> Result<DashboardConfig, AppError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Loads and validates a JSON configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<DashboardConfig, AppError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let config = DashboardConfig::from_json_str(&text)?;
    log::info!("Configuration loaded from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        DashboardConfig::default().validate().unwrap();
    }

    #[test]
    fn test_mapping_for() {
        let config = DashboardConfig::default();
        assert_eq!(config.mapping_for(TicketField::Id).unwrap().column, "TICKET");
        assert!(!config.mapping_for(TicketField::RatingScore).unwrap().required);
    }

    #[test]
    fn test_month_names_abbrev() {
        let names = MonthNames::pt_br();
        assert_eq!(names.abbrev(1), "jan");
        assert_eq!(names.abbrev(2), "fev");
        assert_eq!(names.abbrev(12), "dez");
        assert_eq!(MonthNames::en().abbrev(5), "may");
    }

    #[test]
    fn test_color_for_known_type() {
        let config = DashboardConfig::default();
        assert_eq!(config.color_for("Incidente").as_deref(), Some("#FF8D02"));
        assert_eq!(config.color_for("Preventivo").as_deref(), Some("#0375B4"));
    }

    #[test]
    fn test_color_for_unmapped_omit() {
        let config = DashboardConfig::default();
        assert_eq!(config.color_for("Melhoria"), None);
    }

    #[test]
    fn test_color_for_unmapped_fallback() {
        let config = DashboardConfig {
            unmapped_color_policy: UnmappedColorPolicy::Fallback("#999999".into()),
            ..Default::default()
        };
        assert_eq!(config.color_for("Melhoria").as_deref(), Some("#999999"));
        assert_eq!(config.color_for("Problema").as_deref(), Some("#B82601"));
    }

    #[test]
    fn test_from_json_partial_overrides() {
        let json = r##"{
            "selectAllLabel": "All",
            "dateErrorPolicy": "reject_load",
            "unmappedColorPolicy": { "fallback": "#000000" },
            "monthNames": ["jan","feb","mar","apr","may","jun","jul","aug","sep","oct","nov","dec"],
            "typeColors": { "Melhoria": "#00AA55" }
        }"##;
        let config = DashboardConfig::from_json_str(json).unwrap();
        assert_eq!(config.select_all_label, "All");
        assert_eq!(config.date_error_policy, DateErrorPolicy::RejectLoad);
        assert_eq!(
            config.unmapped_color_policy,
            UnmappedColorPolicy::Fallback("#000000".into())
        );
        assert_eq!(config.month_names, MonthNames::en());
        assert_eq!(config.color_for("Melhoria").as_deref(), Some("#00AA55"));
        // untouched keys keep their defaults
        assert_eq!(config.field_map.len(), 16);
        assert_eq!(config.csv_delimiter, ';');
    }

    #[test]
    fn test_validate_duplicate_field() {
        let mut config = DashboardConfig::default();
        config.field_map.push(FieldMapping {
            column: "OUTRO TICKET".into(),
            field: TicketField::Id,
            required: true,
        });
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_unmapped_field() {
        let mut config = DashboardConfig::default();
        config.field_map.retain(|m| m.field != TicketField::Desk);
        match config.validate() {
            Err(AppError::InvalidConfig(msg)) => assert!(msg.contains("Desk")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_optional_id_rejected() {
        let mut config = DashboardConfig::default();
        for m in config.field_map.iter_mut() {
            if m.field == TicketField::Id {
                m.required = false;
            }
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_invalid_syntax() {
        assert!(matches!(
            DashboardConfig::from_json_str("{ not json"),
            Err(AppError::Serde(_))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{ "csvDelimiter": "," }"#).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.csv_delimiter, ',');
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/dashboard.json"),
            Err(AppError::Io(_))
        ));
    }
}
