//! Dashboard report: every aggregate the presentation layer renders, computed
//! from one filtered snapshot.
use std::time::Instant;

use serde::Serialize;

use super::grouping::{group_distinct_counts, type_distribution, GroupBy, GroupedCounts, TypeShare};
use super::summary::{build_summary, SummaryCounters};
use crate::config::DashboardConfig;
use crate::parser::types::Ticket;

// ─── Data Structures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub meta: DashboardMeta,
    pub summary: SummaryCounters,
    pub by_client: GroupedCounts,
    pub by_category: GroupedCounts,
    pub by_subcategory: GroupedCounts,
    pub by_type: Vec<TypeShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub filtered_rows: usize,
    pub first_month: Option<String>,
    pub last_month: Option<String>,
    pub calcul_duration_ms: u64,
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Builds the full report from a filtered view in canonical order.
pub fn build_dashboard(view: &[&Ticket], config: &DashboardConfig) -> DashboardReport {
    let start = Instant::now();

    let summary = build_summary(view, &config.status_counters);
    let by_client = group_distinct_counts(view, GroupBy::Client);
    let by_category = group_distinct_counts(view, GroupBy::Category);
    let by_subcategory = group_distinct_counts(view, GroupBy::Subcategory);
    let by_type = type_distribution(view, config);

    let meta = DashboardMeta {
        filtered_rows: view.len(),
        first_month: view.first().map(|t| t.month_label.clone()),
        last_month: view.last().map(|t| t.month_label.clone()),
        calcul_duration_ms: start.elapsed().as_millis() as u64,
    };

    DashboardReport {
        meta,
        summary,
        by_client,
        by_category,
        by_subcategory,
        by_type,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
