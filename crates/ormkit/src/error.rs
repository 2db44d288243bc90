//! Error types for ormkit

use thiserror::Error;

/// Result type alias for ormkit operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement construction, decoding and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// The record type does not have the shape of a struct with named fields
    #[error("Unsupported model type: {0}")]
    UnsupportedType(String),

    /// No record was supplied where one was required
    #[error("Unsupported nil input")]
    NilInput,

    /// A field tag pair is not of the form `key=value`
    #[error("Invalid tag syntax: '{0}'")]
    InvalidTagSyntax(String),

    /// Two fields of the same model resolve to one column
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    /// A field identifier is not declared on the model
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// The executor reported a column that no field maps to
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// An expression node cannot be used in the position it appears in
    #[error("Unsupported expression kind: {0}")]
    UnsupportedExpressionKind(String),

    /// INSERT without any record
    #[error("INSERT statement has no VALUES clause")]
    EmptyValuesClause,

    /// UPDATE without any assignment
    #[error("UPDATE statement has no SET clause")]
    EmptySetClause,

    /// A single-row fetch returned no rows
    #[error("No rows in result set")]
    NoRows,

    /// A raw statement with empty SQL text
    #[error("SQL text must not be empty")]
    EmptySql,

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Error reported by the executor
    #[error("Executor error: {0}")]
    Executor(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap an error coming from an executor implementation
    pub fn executor(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Executor(err.into())
    }

    /// Create an unknown field error
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField(name.into())
    }

    /// Create an unknown column error
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn(name.into())
    }

    /// Check if this is an unknown field error
    pub fn is_unknown_field(&self) -> bool {
        matches!(self, Self::UnknownField(_))
    }

    /// Check if this is a no rows error
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Whether the error was raised while building a statement, before any I/O.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType(_)
                | Self::NilInput
                | Self::InvalidTagSyntax(_)
                | Self::DuplicateColumn(_)
                | Self::UnknownField(_)
                | Self::UnsupportedExpressionKind(_)
                | Self::EmptyValuesClause
                | Self::EmptySetClause
                | Self::EmptySql
        )
    }
}
