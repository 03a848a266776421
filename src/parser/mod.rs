pub mod columns;
pub mod derived;
pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{
    normalize_table, parse_csv, parse_csv_reader, read_raw_table, LoadReport, ParseOutput,
};
pub use types::{ParseWarning, RawTable, Ticket, TicketRaw};
