// Error types
// Everything that can go wrong before or while reading the table

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the library.
///
/// A payload that is not valid JSON is not an error: such rows are skipped.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("database file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to open database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("SQL parsing error: {0}")]
    Parse(#[from] sqlparser::parser::ParserError),

    #[error("only a single read-only SELECT statement is supported")]
    NotReadOnly,

    #[error("query must return an identifier and a payload column, got {0} column(s)")]
    ColumnCount(usize),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("invalid filter term: {0:?}")]
    InvalidTerm(String),
}

pub type Result<T> = std::result::Result<T, InspectError>;
