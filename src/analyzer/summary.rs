//! Summary counters (cards): distinct tickets overall, per status, and distinct clients.
use std::collections::HashSet;

use serde::Serialize;

use crate::config::StatusCounter;
use crate::parser::types::Ticket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub key: String,
    pub label: String,
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounters {
    pub total_tickets: usize,
    pub statuses: Vec<StatusCount>,
    pub distinct_clients: usize,
}

impl SummaryCounters {
    /// Count for a configured counter key ("a_fazer", "pausados", ...).
    pub fn status_count(&self, key: &str) -> Option<usize> {
        self.statuses.iter().find(|s| s.key == key).map(|s| s.count)
    }
}

/// Number of distinct ticket ids.
pub fn distinct_ticket_count<'a, I>(tickets: I) -> usize
where
    I: IntoIterator<Item = &'a Ticket>,
{
    tickets.into_iter().map(|t| t.id).collect::<HashSet<_>>().len()
}

pub fn build_summary(tickets: &[&Ticket], counters: &[StatusCounter]) -> SummaryCounters {
    let statuses = counters
        .iter()
        .map(|c| StatusCount {
            key: c.key.clone(),
            label: c.label.clone(),
            status: c.status.clone(),
            count: distinct_ticket_count(
                tickets.iter().copied().filter(|t| t.status == c.status),
            ),
        })
        .collect();

    let distinct_clients = tickets
        .iter()
        .map(|t| t.client.as_str())
        .collect::<HashSet<_>>()
        .len();

    SummaryCounters {
        total_tickets: distinct_ticket_count(tickets.iter().copied()),
        statuses,
        distinct_clients,
    }
}
