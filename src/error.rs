//! Error types for request validation and policy table loading

use thiserror::Error;

/// Errors raised while parsing or evaluating a calculation request
#[derive(Debug, Error)]
pub enum CalcError {
    /// A required field is absent, null or an empty string
    #[error("missing required field `{0}`")]
    MissingField(String),

    /// A field is present but cannot be read as the expected type
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    /// The route named a calculator that does not exist
    #[error("unknown calculator `{0}`")]
    UnknownCalculator(String),

    /// Monetary correction requested with an index outside the supported set
    #[error("invalid index code `{0}`")]
    UnknownIndex(String),

    /// Anything unexpected during computation or response shaping
    #[error("internal error: {0}")]
    Internal(String),
}

impl CalcError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CalcError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CalcError::MissingField(_)
            | CalcError::InvalidField { .. }
            | CalcError::UnknownIndex(_) => 400,
            CalcError::UnknownCalculator(_) => 404,
            CalcError::Internal(_) => 500,
        }
    }

    /// Field-agnostic message returned to HTTP callers.
    /// The detailed `Display` form goes to the log only.
    pub fn public_message(&self) -> &'static str {
        match self {
            CalcError::MissingField(_) => "Missing required fields",
            CalcError::InvalidField { .. } => "Invalid data format",
            CalcError::UnknownIndex(_) => "Invalid index code",
            CalcError::UnknownCalculator(_) => "Unknown calculator",
            CalcError::Internal(_) => "Internal server error",
        }
    }

    pub fn is_validation(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::Internal(err.to_string())
    }
}

/// Errors raised while loading versioned policy tables from disk
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid date `{value}` in {file}")]
    Date { file: &'static str, value: String },

    #[error("unknown parameter `{0}` in parameters.csv")]
    UnknownParameter(String),

    #[error("{0}")]
    Structure(String),
}

/// Errors building an engine from its configuration
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to load policy tables: {0}")]
    Tables(#[from] TableError),

    #[error("failed to build index client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;
