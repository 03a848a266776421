//! Grouped aggregates: distinct tickets per bar-chart dimension, and the
//! per-type distribution with display colors.
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::stats::pct;
use crate::config::DashboardConfig;
use crate::parser::types::Ticket;

/// Dimensions available for bar-chart grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Client,
    Category,
    Subcategory,
}

impl GroupBy {
    pub const ALL: [GroupBy; 3] = [GroupBy::Client, GroupBy::Category, GroupBy::Subcategory];

    pub fn value_of<'a>(&self, ticket: &'a Ticket) -> &'a str {
        match self {
            GroupBy::Client => &ticket.client,
            GroupBy::Category => &ticket.category,
            GroupBy::Subcategory => &ticket.subcategory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
}

/// Groups ordered by ascending count, ties by label. Only groups with at
/// least one ticket appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedCounts {
    pub group_by: GroupBy,
    pub groups: Vec<GroupCount>,
}

impl GroupedCounts {
    pub fn get(&self, label: &str) -> Option<usize> {
        self.groups.iter().find(|g| g.label == label).map(|g| g.count)
    }

    pub fn as_map(&self) -> BTreeMap<&str, usize> {
        self.groups.iter().map(|g| (g.label.as_str(), g.count)).collect()
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}

pub fn group_distinct_counts(tickets: &[&Ticket], group_by: GroupBy) -> GroupedCounts {
    let mut ids_by_group: BTreeMap<&str, HashSet<i64>> = BTreeMap::new();
    for t in tickets {
        ids_by_group
            .entry(group_by.value_of(t))
            .or_default()
            .insert(t.id);
    }

    let mut groups: Vec<GroupCount> = ids_by_group
        .into_iter()
        .map(|(label, ids)| GroupCount {
            label: label.to_string(),
            count: ids.len(),
        })
        .collect();
    // stable: equal counts stay in label order
    groups.sort_by_key(|g| g.count);

    GroupedCounts { group_by, groups }
}

/// One slice of the type distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeShare {
    pub ticket_type: String,
    pub count: u64,
    /// `None` when the type has no configured color and the policy is `Omit`.
    pub color: Option<String>,
    pub percentage: f64,
}

/// Row counts per ticket type (the sum of `count`), ordered by type label.
pub fn type_distribution(tickets: &[&Ticket], config: &DashboardConfig) -> Vec<TypeShare> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for t in tickets {
        *counts.entry(t.ticket_type.as_str()).or_insert(0) += u64::from(t.count);
    }
    let total: u64 = counts.values().sum();

    counts
        .into_iter()
        .map(|(ticket_type, count)| {
            let color = config.color_for(ticket_type);
            if color.is_none() {
                log::debug!("No color configured for ticket type {:?}", ticket_type);
            }
            TypeShare {
                ticket_type: ticket_type.to_string(),
                count,
                color,
                percentage: pct(count as usize, total as usize),
            }
        })
        .collect()
}
