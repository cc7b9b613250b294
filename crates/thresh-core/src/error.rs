//! Error types for thresh-core

use crate::expr::EvalError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in thresh-core
#[derive(Debug, Error)]
pub enum Error {
    /// Two input tables were given the same alias
    #[error("repeated aliases detected: {0}")]
    DuplicateAlias(String),

    /// A request names something that resolves to more than one source
    #[error("ambiguous request: {0}")]
    AmbiguousRequest(String),

    /// A request is not an alias, a column, an aliased column or a formula
    #[error("alias/column not found: '{0}'")]
    UnresolvedReference(String),

    /// Column names shadow built-in functions or constants
    #[error("series naming conflict with built-in functions: {}", names.join(", "))]
    NameConflict { names: Vec<String> },

    /// A formula asked to delete a column that is not in the output
    #[error("failed to remove '{0}': not found")]
    ColumnNotFound(String),

    /// A formula token with an empty label or expression
    #[error("malformed formula '{token}': {reason}")]
    MalformedFormula { token: String, reason: String },

    /// The expression itself failed to evaluate
    #[error("failed to evaluate '{expression}': {source}")]
    Eval {
        expression: String,
        #[source]
        source: EvalError,
    },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed tabular data
    #[error("failed to parse '{path}' line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Bad command-line instructions
    #[error("{0}")]
    Usage(String),

    /// More than one source reads from standard input
    #[error("cannot have more than one instance of reading from stdin ('-')")]
    MultipleStdin,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
