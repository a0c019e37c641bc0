//! Engine configuration.

use std::path::PathBuf;

use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};

use super::schema::Schema;

const IN_MEMORY: &str = ":memory:";

/// SQLite data access configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
    /// Create the file if it does not exist yet.
    #[serde(default = "default_create")]
    pub create_if_missing: bool,
    /// Tables created on open if they are missing.
    #[serde(default)]
    pub schema: Schema,
}

fn default_create() -> bool {
    true
}

impl SqliteConfig {
    /// Create a new SQLite config with path and schema
    pub fn new(db_path: impl Into<PathBuf>, schema: Schema) -> Self {
        Self {
            db_path: db_path.into(),
            create_if_missing: true,
            schema,
        }
    }

    pub fn in_memory(schema: Schema) -> Self {
        Self::new(IN_MEMORY, schema)
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub(crate) fn open_flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        flags
    }
}
