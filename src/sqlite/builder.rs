//! Statement text generation.
//!
//! Identifiers, operator tokens and the ORDER BY expression are written into
//! the statement text; values are always emitted as `?` placeholders. Each
//! builder returns the values in exactly the order of their placeholders.
//!
//! Field names and `order_by` are not escaped. They must not come from
//! untrusted input.

use super::condition::Condition;
use super::error::{DalError, Result};
use super::record::{FieldMap, Record};
use super::value::Value;

/// SQL text with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub statement: String,
    /// `(field name, value)` per placeholder, left to right.
    pub params: Vec<(String, Value)>,
}

impl SqlQuery {
    fn new(statement: String) -> Self {
        Self {
            statement,
            params: Vec::new(),
        }
    }

    fn push(&mut self, field: &str, value: Value) {
        self.params.push((field.to_string(), value));
    }

    pub fn placeholder_count(&self) -> usize {
        self.statement.matches('?').count()
    }
}

/// `INSERT INTO t VALUES (?,...,?);`
///
/// The auto-generated key is bound as NULL so the database assigns it.
pub fn insert<R: Record>(map: &FieldMap) -> SqlQuery {
    let placeholders = vec!["?"; map.len()].join(",");
    let mut query = SqlQuery::new(format!(
        "INSERT INTO {} VALUES ({placeholders});",
        R::TABLE_NAME
    ));
    for (name, value) in map.iter() {
        if R::AUTO_KEY == Some(name) {
            query.push(name, Value::Null);
        } else {
            query.push(name, value.clone());
        }
    }
    query
}

/// `UPDATE t SET c=?,... WHERE 1=1 AND k=?...;` over every non-key column.
pub fn update<R: Record>(map: &FieldMap) -> Result<SqlQuery> {
    require_keys::<R>("update")?;
    let mut query = set_clause::<R>(map)?;
    query.statement.push_str(" WHERE 1=1");
    key_predicates::<R>(&mut query, map)?;
    query.statement.push(';');
    Ok(query)
}

/// `UPDATE t SET c=?,... WHERE 1=1 AND f op ?...;`
pub fn update_where<R: Record>(map: &FieldMap, conditions: &[Condition]) -> Result<SqlQuery> {
    check_conditions::<R>(conditions)?;
    let mut query = set_clause::<R>(map)?;
    query.statement.push_str(" WHERE 1=1");
    condition_predicates(&mut query, conditions);
    query.statement.push(';');
    Ok(query)
}

/// `DELETE FROM t WHERE 1=1 AND k=?...;`
pub fn delete<R: Record>(map: &FieldMap) -> Result<SqlQuery> {
    require_keys::<R>("destroy")?;
    let mut query = SqlQuery::new(format!("DELETE FROM {} WHERE 1=1", R::TABLE_NAME));
    key_predicates::<R>(&mut query, map)?;
    query.statement.push(';');
    Ok(query)
}

/// `DELETE FROM t WHERE 1=1 AND f op ?...;`
///
/// With no conditions this matches every row of the table.
pub fn delete_where<R: Record>(conditions: &[Condition]) -> Result<SqlQuery> {
    check_conditions::<R>(conditions)?;
    let mut query = SqlQuery::new(format!("DELETE FROM {} WHERE 1=1", R::TABLE_NAME));
    condition_predicates(&mut query, conditions);
    query.statement.push(';');
    Ok(query)
}

/// `SELECT c,... FROM t WHERE 1=1 [AND f op ?]... [ORDER BY expr];`
///
/// An empty `columns` projection selects every column. Projection names that
/// are not columns of `R` are ignored.
pub fn select<R: Record>(
    conditions: &[Condition],
    order_by: &str,
    columns: &[&str],
) -> Result<SqlQuery> {
    check_conditions::<R>(conditions)?;
    let selected: Vec<&str> = R::COLUMNS
        .iter()
        .copied()
        .filter(|c| columns.is_empty() || columns.contains(c))
        .collect();
    if selected.is_empty() {
        return Err(DalError::schema(
            R::TABLE_NAME,
            format!("projection {columns:?} selects no columns"),
        ));
    }
    let mut query = SqlQuery::new(format!(
        "SELECT {} FROM {} WHERE 1=1",
        selected.join(","),
        R::TABLE_NAME
    ));
    condition_predicates(&mut query, conditions);
    let order_by = order_by.trim();
    if !order_by.is_empty() {
        query.statement.push_str(&format!(" ORDER BY {order_by}"));
    }
    query.statement.push(';');
    Ok(query)
}

fn require_keys<R: Record>(operation: &str) -> Result<()> {
    if R::KEYS.is_empty() {
        return Err(DalError::schema(
            R::TABLE_NAME,
            format!("{operation} needs a primary key; use the conditional form instead"),
        ));
    }
    Ok(())
}

fn set_clause<R: Record>(map: &FieldMap) -> Result<SqlQuery> {
    let mut query = SqlQuery::new(format!("UPDATE {} SET ", R::TABLE_NAME));
    let mut first = true;
    for (name, value) in map.iter().filter(|(n, _)| !R::KEYS.contains(n)) {
        if !first {
            query.statement.push(',');
        }
        first = false;
        query.statement.push_str(&format!("{name}=?"));
        query.push(name, value.clone());
    }
    if first {
        return Err(DalError::schema(
            R::TABLE_NAME,
            "every column is a key, nothing to update",
        ));
    }
    Ok(query)
}

fn key_predicates<R: Record>(query: &mut SqlQuery, map: &FieldMap) -> Result<()> {
    for key in R::KEYS {
        let value = map
            .get(key)
            .ok_or_else(|| DalError::schema(R::TABLE_NAME, format!("key `{key}` has no value")))?;
        query.statement.push_str(&format!(" AND {key}=?"));
        query.push(key, value.clone());
    }
    Ok(())
}

fn condition_predicates(query: &mut SqlQuery, conditions: &[Condition]) {
    for condition in conditions {
        query.statement.push_str(&format!(
            " AND {} {} ?",
            condition.field, condition.operator
        ));
        query.push(&condition.field, condition.value.clone());
    }
}

fn check_conditions<R: Record>(conditions: &[Condition]) -> Result<()> {
    match conditions
        .iter()
        .find(|c| !R::COLUMNS.contains(&c.field.as_str()))
    {
        Some(c) => Err(DalError::schema(
            R::TABLE_NAME,
            format!("condition field `{}` is not a column", c.field),
        )),
        None => Ok(()),
    }
}
