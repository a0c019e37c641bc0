//! Connection lifecycle and the CRUD operations over [`Record`] types.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Statement};
use tracing::{debug, info, warn};

use super::binder;
use super::builder::{self, SqlQuery};
use super::condition::Condition;
use super::config::SqliteConfig;
use super::error::{DalError, Result};
use super::materialize;
use super::record::{validate, Record};
use super::schema::Schema;

/// Data access engine owning a single SQLite connection.
///
/// Every operation runs one statement to completion on the calling thread:
/// build, prepare, bind, step, finalize. The prepared statement is released
/// on every exit path. The engine is `Send` but not `Sync`; callers sharing
/// it across threads must serialize access themselves.
pub struct Dal {
    conn: Connection,
    path: PathBuf,
}

impl Dal {
    /// Opens the database at `config.db_path` and creates any missing tables
    /// from `config.schema`.
    pub fn open(config: SqliteConfig) -> Result<Self> {
        let path = config.db_path.clone();
        let conn = Connection::open_with_flags(&path, config.open_flags()).map_err(|source| {
            DalError::Connection {
                path: path.clone(),
                source,
            }
        })?;
        info!(path = %path.display(), "opened sqlite database");
        let dal = Self { conn, path };
        dal.initialize_schema(&config.schema)?;
        Ok(dal)
    }

    pub fn open_in_memory(schema: Schema) -> Result<Self> {
        Self::open(SqliteConfig::in_memory(schema))
    }

    /// Closes the connection, surfacing any failure. Dropping the engine
    /// closes it too, but silently.
    pub fn close(self) -> Result<()> {
        let Dal { conn, path } = self;
        conn.close()
            .map_err(|(_, source)| DalError::Connection {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "closed sqlite database");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs one or more semicolon-separated statements without parameters.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        debug!(sql, "executing batch");
        self.conn.execute_batch(sql).map_err(|source| DalError::Exec {
            sql: sql.to_string(),
            source,
        })
    }

    fn initialize_schema(&self, schema: &Schema) -> Result<()> {
        for table in &schema.tables {
            self.execute_batch(&table.create_sql())?;
            info!(table = %table.name, "ensured table exists");
        }
        Ok(())
    }

    /// Inserts `record`, letting the database assign its auto-generated key.
    ///
    /// Returns the assigned key when `R` declares one.
    pub fn insert<R: Record>(&self, record: &R) -> Result<Option<i64>> {
        let map = record.to_field_map();
        validate::<R>(&map)?;
        self.execute(&builder::insert::<R>(&map))?;
        Ok(R::AUTO_KEY.map(|_| self.conn.last_insert_rowid()))
    }

    /// Updates every non-key column of the row(s) matching `record`'s keys.
    pub fn update<R: Record>(&self, record: &R) -> Result<usize> {
        let map = record.to_field_map();
        validate::<R>(&map)?;
        self.execute(&builder::update::<R>(&map)?)
    }

    /// Updates every non-key column of the rows matching all `conditions`.
    ///
    /// No conditions means every row of the table.
    pub fn update_where<R: Record>(&self, record: &R, conditions: &[Condition]) -> Result<usize> {
        let map = record.to_field_map();
        validate::<R>(&map)?;
        if conditions.is_empty() {
            warn!(table = R::TABLE_NAME, "update_where without conditions touches every row");
        }
        self.execute(&builder::update_where::<R>(&map, conditions)?)
    }

    /// Deletes the row(s) matching `record`'s keys.
    pub fn destroy<R: Record>(&self, record: &R) -> Result<usize> {
        let map = record.to_field_map();
        validate::<R>(&map)?;
        self.execute(&builder::delete::<R>(&map)?)
    }

    /// Deletes the rows of `R`'s table matching all `conditions`.
    ///
    /// Use with caution: no conditions deletes every row in the table.
    pub fn destroy_where<R: Record>(&self, record: &R, conditions: &[Condition]) -> Result<usize> {
        validate::<R>(&record.to_field_map())?;
        if conditions.is_empty() {
            warn!(table = R::TABLE_NAME, "destroy_where without conditions deletes every row");
        }
        self.execute(&builder::delete_where::<R>(conditions)?)
    }

    /// Reads the rows matching all `conditions` as fresh records.
    ///
    /// `order_by` is appended verbatim (e.g. `"price DESC"`); empty means
    /// driver order. `columns` restricts the projection; fields outside it
    /// keep their [`Record::blank`] value, never `record`'s. Empty selects
    /// every column.
    pub fn select_where<R: Record + Default>(
        &self,
        record: &R,
        conditions: &[Condition],
        order_by: &str,
        columns: &[&str],
    ) -> Result<Vec<R>> {
        let template = record.to_field_map();
        validate::<R>(&template)?;
        let query = builder::select::<R>(conditions, order_by, columns)?;
        let mut stmt = self.prepare(&query)?;
        binder::bind_all(&mut stmt, &query.params)?;
        let records =
            materialize::read_rows::<R>(&mut stmt, &template, &R::blank(), &query.statement)?;
        finalize(stmt, &query)?;
        debug!(table = R::TABLE_NAME, rows = records.len(), "selected rows");
        Ok(records)
    }

    /// Every row of `R`'s table, in driver order.
    pub fn select_all<R: Record + Default>(&self) -> Result<Vec<R>> {
        self.select_where(&R::default(), &[], "", &[])
    }

    fn prepare(&self, query: &SqlQuery) -> Result<Statement<'_>> {
        debug!(sql = %query.statement, params = query.params.len(), "preparing statement");
        self.conn
            .prepare(&query.statement)
            .map_err(|source| DalError::Prepare {
                sql: query.statement.clone(),
                source,
            })
    }

    /// Single-step execution for mutations. Returns the number of changed rows.
    fn execute(&self, query: &SqlQuery) -> Result<usize> {
        let mut stmt = self.prepare(query)?;
        binder::bind_all(&mut stmt, &query.params)?;
        let changed = stmt.raw_execute().map_err(|source| DalError::Exec {
            sql: query.statement.clone(),
            source,
        })?;
        finalize(stmt, query)?;
        Ok(changed)
    }
}

// Error paths release the statement by dropping it; the success path
// finalizes explicitly so a failure there is reported.
fn finalize(stmt: Statement<'_>, query: &SqlQuery) -> Result<()> {
    stmt.finalize().map_err(|source| DalError::Finalize {
        sql: query.statement.clone(),
        source,
    })
}

impl std::fmt::Debug for Dal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dal")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
