use thiserror::Error;

/// Reasons a raw buffer cannot be turned into a grid.
///
/// Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("the input has no line break")]
    NoNewline,

    #[error("expected at least {min} columns, found {found}")]
    TooFewColumns { found: usize, min: usize },

    #[error("expected at least {min} rows, found {found}")]
    TooFewRows { found: usize, min: usize },

    #[error("blank line detected at line {line}")]
    BlankLine { line: usize },

    #[error("invalid row at line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("every cell is missing at line {line}")]
    EmptyRow { line: usize },

    #[error("could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Core error type for ingestion, encoding and matrix slicing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinfitError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("encoding error: value {value:?} of column {column} is not in its dictionary")]
    Encoding {
        column: usize,
        value: Option<String>,
    },

    #[error("invalid range: [{from}, {to})")]
    InvalidRange { from: usize, to: usize },

    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
}

pub type LinfitResult<T> = Result<T, LinfitError>;
