//! Table definitions used to bootstrap a database on open.

use serde::{Deserialize, Serialize};

/// Schema definition for the SQLite database
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub constraints: Vec<ColumnConstraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Real,
    Text,
    Blob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnConstraint {
    NotNull,
    Unique,
    /// `INTEGER PRIMARY KEY AUTOINCREMENT`. Only valid on a single-column primary key.
    AutoIncrement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    fn auto_increment_column(&self) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|c| c.constraints.contains(&ColumnConstraint::AutoIncrement))
    }

    /// `CREATE TABLE IF NOT EXISTS` followed by one `CREATE INDEX IF NOT EXISTS` per index.
    pub fn create_sql(&self) -> String {
        let auto = self.auto_increment_column().map(|c| c.name.as_str());
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| c.sql(auto == Some(c.name.as_str())))
            .collect();
        if auto.is_none() && !self.primary_key.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));
        }
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            parts.join(", ")
        );
        for index in &self.indexes {
            sql.push_str(&format!(
                "\nCREATE {}INDEX IF NOT EXISTS {} ON {} ({});",
                if index.unique { "UNIQUE " } else { "" },
                index.name,
                self.name,
                index.columns.join(", ")
            ));
        }
        sql
    }
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn not_null(mut self) -> Self {
        self.constraints.push(ColumnConstraint::NotNull);
        self
    }

    pub fn unique(mut self) -> Self {
        self.constraints.push(ColumnConstraint::Unique);
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.constraints.push(ColumnConstraint::AutoIncrement);
        self
    }

    fn sql(&self, inline_key: bool) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        if inline_key {
            sql.push_str(" PRIMARY KEY AUTOINCREMENT");
        }
        for constraint in &self.constraints {
            match constraint {
                ColumnConstraint::NotNull => sql.push_str(" NOT NULL"),
                ColumnConstraint::Unique => sql.push_str(" UNIQUE"),
                ColumnConstraint::AutoIncrement => {}
            }
        }
        sql
    }
}

impl DataType {
    pub fn as_sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Real => "REAL",
            DataType::Text => "TEXT",
            DataType::Blob => "BLOB",
        }
    }
}

impl IndexDefinition {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            unique: false,
        }
    }
}
