//! WHERE-clause predicates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DalError;
use super::value::Value;

/// Query operators accepted in a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    NotEqual,
    Like,
}

impl Operator {
    /// SQL token, interpolated verbatim into the statement text.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::NotEqual => "<>",
            Operator::Like => "LIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = DalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" => Ok(Operator::Equal),
            "<" => Ok(Operator::LessThan),
            "<=" => Ok(Operator::LessThanOrEqual),
            ">" => Ok(Operator::GreaterThan),
            ">=" => Ok(Operator::GreaterThanOrEqual),
            "<>" => Ok(Operator::NotEqual),
            other if other.eq_ignore_ascii_case("LIKE") => Ok(Operator::Like),
            other => Err(DalError::UnknownOperator(other.to_string())),
        }
    }
}

/// One `AND <field> <op> ?` predicate. The value is always bound, never
/// interpolated; the field name is interpolated and must be a column of the
/// target record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: &str, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Equal, value)
    }

    /// Builds a condition from an operator token such as `"<="` or `"LIKE"`.
    pub fn parse(field: &str, operator: &str, value: impl Into<Value>) -> Result<Self, DalError> {
        Ok(Self::new(field, operator.parse()?, value))
    }
}
