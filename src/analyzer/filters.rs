//! Filter domains (choice lists) and the three-dimension filter.
use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::parser::types::Ticket;

/// Dimensions a user can narrow the ticket set by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Month,
    Client,
    Desk,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Month, Dimension::Client, Dimension::Desk];

    pub fn value_of<'a>(&self, ticket: &'a Ticket) -> &'a str {
        match self {
            Dimension::Month => &ticket.month_label,
            Dimension::Client => &ticket.client,
            Dimension::Desk => &ticket.desk,
        }
    }
}

/// Choice lists per dimension, each starting with the "select all" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDomain {
    pub months: Vec<String>,
    pub clients: Vec<String>,
    pub desks: Vec<String>,
}

impl FilterDomain {
    pub fn choices(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Month => &self.months,
            Dimension::Client => &self.clients,
            Dimension::Desk => &self.desks,
        }
    }
}

/// Builds the choice lists from the canonical (sorted) ticket set.
///
/// Months keep first-seen order, which is chronological because the set is
/// sorted by `sort_key`. Clients and desks are sorted lexicographically.
pub fn build_filter_domain(tickets: &[Ticket], select_all: &str) -> FilterDomain {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut months = vec![select_all.to_string()];
    for t in tickets {
        if seen.insert(t.month_label.as_str()) {
            months.push(t.month_label.clone());
        }
    }

    let sorted_distinct = |dimension: Dimension| -> Vec<String> {
        let distinct: BTreeSet<&str> = tickets.iter().map(|t| dimension.value_of(t)).collect();
        std::iter::once(select_all.to_string())
            .chain(distinct.into_iter().map(str::to_string))
            .collect()
    };

    FilterDomain {
        months,
        clients: sorted_distinct(Dimension::Client),
        desks: sorted_distinct(Dimension::Desk),
    }
}

/// The user's current choice per dimension. A list containing the sentinel
/// means "no restriction"; an empty list matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    pub months: Vec<String>,
    pub clients: Vec<String>,
    pub desks: Vec<String>,
}

impl FilterSelection {
    /// Sentinel on every dimension, the initial state of a dashboard.
    pub fn select_all(select_all: &str) -> Self {
        FilterSelection {
            months: vec![select_all.to_string()],
            clients: vec![select_all.to_string()],
            desks: vec![select_all.to_string()],
        }
    }

    pub fn values(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Month => &self.months,
            Dimension::Client => &self.clients,
            Dimension::Desk => &self.desks,
        }
    }

    /// Replaces the selection for one dimension.
    pub fn with<S: Into<String>>(
        mut self,
        dimension: Dimension,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match dimension {
            Dimension::Month => self.months = values,
            Dimension::Client => self.clients = values,
            Dimension::Desk => self.desks = values,
        }
        self
    }
}

enum Constraint<'s> {
    Any,
    OneOf(HashSet<&'s str>),
}

impl<'s> Constraint<'s> {
    fn new(values: &'s [String], select_all: &str) -> Self {
        if values.iter().any(|v| v == select_all) {
            Constraint::Any
        } else {
            Constraint::OneOf(values.iter().map(String::as_str).collect())
        }
    }

    fn accepts(&self, value: &str) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::OneOf(allowed) => allowed.contains(value),
        }
    }
}

/// Keeps the tickets passing all three dimension constraints, in input order.
pub fn apply_filters<'a, I>(
    tickets: I,
    selection: &FilterSelection,
    select_all: &str,
) -> Vec<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let constraints: Vec<(Dimension, Constraint<'_>)> = Dimension::ALL
        .iter()
        .map(|&d| (d, Constraint::new(selection.values(d), select_all)))
        .collect();

    let filtered: Vec<&Ticket> = tickets
        .into_iter()
        .filter(|t| constraints.iter().all(|(d, c)| c.accepts(d.value_of(t))))
        .collect();
    log::debug!("Filter selection kept {} tickets", filtered.len());
    filtered
}
