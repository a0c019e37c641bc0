//! Generic data access layer mapping record types onto SQLite tables.
//!
//! # Intention
//!
//! - One engine builds, binds, executes and materializes every single-table
//!   statement, driven by the [`Record`] contract each mapped type implements.
//! - Keep SQLite-specific types and error handling inside this crate.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here.
//! - No business logic; concrete record types live with their callers.
//! - Single statement per call. No transactions, joins or migrations.

pub mod sqlite;

pub use sqlite::{
    BindFailure, ColumnConstraint, ColumnDefinition, Condition, Dal, DalError, DataType,
    FieldMap, IndexDefinition, KindMismatch, Operator, Record, Result, Schema, SqlQuery,
    SqliteConfig, TableDefinition, Value, ValueKind,
};
