//! Error taxonomy for the data access layer.

use std::path::PathBuf;

use thiserror::Error;

use super::value::ValueKind;

/// Errors surfaced by [`Dal`](super::Dal) operations.
///
/// Statement resources are always released before one of these reaches the
/// caller.
#[derive(Debug, Error)]
pub enum DalError {
    /// Opening or closing the database failed. Fatal to the engine instance.
    #[error("connection error on {path:?}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The record contract or the call shape does not fit the operation,
    /// e.g. `update` on a record that declares no keys.
    #[error("schema error on table `{table}`: {reason}")]
    Schema { table: String, reason: String },

    #[error("unknown comparison operator `{0}`")]
    UnknownOperator(String),

    #[error("failed to prepare `{sql}`: {source}")]
    Prepare {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to bind `{field}`: {source}")]
    Bind {
        field: String,
        #[source]
        source: BindFailure,
    },

    #[error("statement has {placeholders} placeholders but {values} values were supplied")]
    ParameterMismatch { placeholders: usize, values: usize },

    #[error("failed to execute `{sql}`: {source}")]
    Exec {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to finalize `{sql}`: {source}")]
    Finalize {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A column could not be decoded into the kind its record field declares.
    #[error("failed to materialize `{field}`: {reason}")]
    Materialize { field: String, reason: String },
}

/// Why a single parameter could not be bound.
#[derive(Debug, Error)]
pub enum BindFailure {
    #[error(transparent)]
    Driver(#[from] rusqlite::Error),
    #[error("unsupported value kind `{0}`")]
    Unsupported(ValueKind),
}

impl DalError {
    /// Only connection failures leave the engine unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DalError::Connection { .. })
    }

    pub(crate) fn schema(table: &str, reason: impl Into<String>) -> Self {
        DalError::Schema {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn materialize(field: &str, reason: impl ToString) -> Self {
        DalError::Materialize {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = DalError> = std::result::Result<T, E>;
