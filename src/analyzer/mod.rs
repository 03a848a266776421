pub mod dashboard;
pub mod filters;
pub mod grouping;
pub mod stats;
pub mod summary;

pub use dashboard::{build_dashboard, DashboardMeta, DashboardReport};
pub use filters::{apply_filters, build_filter_domain, Dimension, FilterDomain, FilterSelection};
pub use grouping::{group_distinct_counts, type_distribution, GroupBy, GroupCount, GroupedCounts, TypeShare};
pub use summary::{build_summary, distinct_ticket_count, StatusCount, SummaryCounters};
