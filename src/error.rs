use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Empty file: no header row")]
    EmptyFile,

    #[error("Line {line}: invalid ticket id {value:?}")]
    InvalidTicketId { line: usize, value: String },

    #[error("Line {line}: duplicate ticket id {id}")]
    DuplicateTicketId { line: usize, id: i64 },

    #[error("Line {line}: invalid creation date {value:?}")]
    InvalidCreatedAt { line: usize, value: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
