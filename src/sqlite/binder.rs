//! Positional parameter binding.

use rusqlite::types::Null;
use rusqlite::Statement;

use super::error::{BindFailure, DalError, Result};
use super::value::{Value, ValueKind};

/// Binds every parameter of a built statement, starting at index 1.
///
/// Fails before binding anything if the statement's placeholder count does
/// not match the number of values.
pub(crate) fn bind_all(stmt: &mut Statement<'_>, params: &[(String, Value)]) -> Result<()> {
    let placeholders = stmt.parameter_count();
    if placeholders != params.len() {
        return Err(DalError::ParameterMismatch {
            placeholders,
            values: params.len(),
        });
    }
    bind_from(stmt, params, 1).map(|_| ())
}

/// Binds `params` at consecutive indexes from `start`, returning the next free index.
pub(crate) fn bind_from(
    stmt: &mut Statement<'_>,
    params: &[(String, Value)],
    start: usize,
) -> Result<usize> {
    let mut index = start;
    for (field, value) in params {
        bind_value(stmt, index, value).map_err(|source| DalError::Bind {
            field: field.clone(),
            source,
        })?;
        index += 1;
    }
    Ok(index)
}

fn bind_value(stmt: &mut Statement<'_>, index: usize, value: &Value) -> Result<(), BindFailure> {
    match value {
        Value::Null => stmt.raw_bind_parameter(index, Null)?,
        Value::Boolean(b) => stmt.raw_bind_parameter(index, i64::from(*b))?,
        Value::Integer(i) => stmt.raw_bind_parameter(index, *i)?,
        Value::Real(f) => stmt.raw_bind_parameter(index, *f)?,
        Value::Text(s) => stmt.raw_bind_parameter(index, s.as_str())?,
        Value::Blob(_) => return Err(BindFailure::Unsupported(ValueKind::Blob)),
    }
    Ok(())
}
