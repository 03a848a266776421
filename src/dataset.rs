use std::io::Read;
use std::path::Path;

use crate::analyzer::dashboard::{build_dashboard, DashboardReport};
use crate::analyzer::filters::{apply_filters, build_filter_domain, FilterDomain, FilterSelection};
use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::parser::pipeline::{normalize_table, parse_csv, parse_csv_reader, LoadReport, ParseOutput};
use crate::parser::types::{RawTable, Ticket};

/// The canonical ticket set of one load, with its filter domain.
///
/// Immutable once built: every selection change derives a fresh view from
/// `tickets`, and a new load means a new dataset.
#[derive(Debug, Clone)]
pub struct TicketDataset {
    config: DashboardConfig,
    tickets: Vec<Ticket>,
    domain: FilterDomain,
    report: LoadReport,
}

impl TicketDataset {
    pub fn from_table(table: &RawTable, config: DashboardConfig) -> Result<Self, AppError> {
        config.validate()?;
        let output = normalize_table(table, &config)?;
        Ok(Self::from_parse_output(output, config))
    }

    pub fn from_csv_reader<R: Read>(reader: R, config: DashboardConfig) -> Result<Self, AppError> {
        config.validate()?;
        let output = parse_csv_reader(reader, &config)?;
        Ok(Self::from_parse_output(output, config))
    }

    pub fn from_csv_path(
        path: impl AsRef<Path>,
        config: DashboardConfig,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let output = parse_csv(path, &config)?;
        Ok(Self::from_parse_output(output, config))
    }

    fn from_parse_output(output: ParseOutput, config: DashboardConfig) -> Self {
        let domain = build_filter_domain(&output.tickets, &config.select_all_label);
        TicketDataset {
            config,
            tickets: output.tickets,
            domain,
            report: output.report,
        }
    }

    /// Canonical tickets, sorted by `sort_key`.
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn domain(&self) -> &FilterDomain {
        &self.domain
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Selection with the sentinel on every dimension.
    pub fn select_all(&self) -> FilterSelection {
        FilterSelection::select_all(&self.config.select_all_label)
    }

    pub fn filter(&self, selection: &FilterSelection) -> Vec<&Ticket> {
        apply_filters(&self.tickets, selection, &self.config.select_all_label)
    }

    /// Filters, then aggregates the resulting snapshot.
    pub fn dashboard(&self, selection: &FilterSelection) -> DashboardReport {
        let view = self.filter(selection);
        build_dashboard(&view, &self.config)
    }
}
