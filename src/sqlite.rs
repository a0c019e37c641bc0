//! SQLite record mapping: values, the record contract, statement building,
//! binding, materialization and the engine that runs them.

mod binder;
pub mod builder;
mod condition;
mod config;
mod engine;
mod error;
mod materialize;
mod record;
mod schema;
mod value;

pub use builder::SqlQuery;
pub use condition::{Condition, Operator};
pub use config::SqliteConfig;
pub use engine::Dal;
pub use error::{BindFailure, DalError, Result};
pub use record::{FieldMap, Record};
pub use schema::{
    ColumnConstraint, ColumnDefinition, DataType, IndexDefinition, Schema, TableDefinition,
};
pub use value::{KindMismatch, Value, ValueKind};
