// Shared fixtures for the integration tests. Each test binary uses a subset.
#![allow(dead_code)]

use rust_sqlite_dal::{
    ColumnDefinition, DataType, FieldMap, IndexDefinition, Record, Result, Schema,
    TableDefinition,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
}

impl MenuItem {
    pub fn new(name: &str, price: f64) -> Self {
        Self {
            name: name.to_string(),
            price,
        }
    }
}

impl Record for MenuItem {
    const TABLE_NAME: &'static str = "MenuItem";
    const COLUMNS: &'static [&'static str] = &["name", "price"];
    const KEYS: &'static [&'static str] = &["name"];

    fn to_field_map(&self) -> FieldMap {
        FieldMap::new()
            .with("name", &self.name)
            .with("price", self.price)
    }

    fn from_field_map(mut map: FieldMap) -> Result<Self> {
        Ok(Self {
            name: map.take("name")?,
            price: map.take("price")?,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderMaster {
    pub order_number: i64,
    pub ordered_by: String,
    pub order_date: String,
    pub is_complete: bool,
}

impl OrderMaster {
    pub fn new(ordered_by: &str, order_date: &str) -> Self {
        Self {
            order_number: 0,
            ordered_by: ordered_by.to_string(),
            order_date: order_date.to_string(),
            is_complete: false,
        }
    }
}

impl Record for OrderMaster {
    const TABLE_NAME: &'static str = "OrderMaster";
    const COLUMNS: &'static [&'static str] = &["orderNumber", "orderedBy", "orderDate", "isComplete"];
    const KEYS: &'static [&'static str] = &["orderNumber"];
    const AUTO_KEY: Option<&'static str> = Some("orderNumber");

    fn to_field_map(&self) -> FieldMap {
        FieldMap::new()
            .with("orderNumber", self.order_number)
            .with("orderedBy", &self.ordered_by)
            .with("orderDate", &self.order_date)
            .with("isComplete", self.is_complete)
    }

    fn from_field_map(mut map: FieldMap) -> Result<Self> {
        Ok(Self {
            order_number: map.take("orderNumber")?,
            ordered_by: map.take("orderedBy")?,
            order_date: map.take("orderDate")?,
            is_complete: map.take("isComplete")?,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AuthToken {
    pub token_id: String,
    pub created_date: String,
}

impl Record for AuthToken {
    const TABLE_NAME: &'static str = "AuthToken";
    const COLUMNS: &'static [&'static str] = &["tokenID", "createdDate"];
    const KEYS: &'static [&'static str] = &["tokenID"];

    fn to_field_map(&self) -> FieldMap {
        FieldMap::new()
            .with("tokenID", &self.token_id)
            .with("createdDate", &self.created_date)
    }

    fn from_field_map(mut map: FieldMap) -> Result<Self> {
        Ok(Self {
            token_id: map.take("tokenID")?,
            created_date: map.take("createdDate")?,
        })
    }
}

/// Keyless table: only the conditional update/delete forms apply.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AuditLog {
    pub message: String,
    pub level: i64,
    pub note: Option<String>,
}

impl Record for AuditLog {
    const TABLE_NAME: &'static str = "AuditLog";
    const COLUMNS: &'static [&'static str] = &["message", "level", "note"];
    const KEYS: &'static [&'static str] = &[];

    fn to_field_map(&self) -> FieldMap {
        FieldMap::new()
            .with("message", &self.message)
            .with("level", self.level)
            .with("note", self.note.clone())
    }

    fn from_field_map(mut map: FieldMap) -> Result<Self> {
        Ok(Self {
            message: map.take("message")?,
            level: map.take("level")?,
            note: map.take_optional("note")?,
        })
    }
}

/// Carries a blob, which the data access layer refuses to bind.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Attachment {
    pub id: i64,
    pub data: Vec<u8>,
}

impl Record for Attachment {
    const TABLE_NAME: &'static str = "Attachment";
    const COLUMNS: &'static [&'static str] = &["id", "data"];
    const KEYS: &'static [&'static str] = &["id"];

    fn to_field_map(&self) -> FieldMap {
        FieldMap::new()
            .with("id", self.id)
            .with("data", self.data.clone())
    }

    fn from_field_map(mut map: FieldMap) -> Result<Self> {
        // Blob columns are never decoded.
        Ok(Self {
            id: map.take("id")?,
            data: Vec::new(),
        })
    }
}

pub fn schema() -> Schema {
    Schema::new()
        .add_table(
            TableDefinition::new("MenuItem")
                .column(ColumnDefinition::new("name", DataType::Text).not_null())
                .column(ColumnDefinition::new("price", DataType::Real).not_null())
                .primary_key(&["name"]),
        )
        .add_table(
            TableDefinition::new("OrderMaster")
                .column(ColumnDefinition::new("orderNumber", DataType::Integer).auto_increment())
                .column(ColumnDefinition::new("orderedBy", DataType::Text).not_null())
                .column(ColumnDefinition::new("orderDate", DataType::Text).not_null())
                .column(ColumnDefinition::new("isComplete", DataType::Integer).not_null())
                .primary_key(&["orderNumber"])
                .index(IndexDefinition::new("idx_order_customer", &["orderedBy"])),
        )
        .add_table(
            TableDefinition::new("AuthToken")
                .column(ColumnDefinition::new("tokenID", DataType::Text).not_null())
                .column(ColumnDefinition::new("createdDate", DataType::Text).not_null())
                .primary_key(&["tokenID"]),
        )
        .add_table(
            TableDefinition::new("AuditLog")
                .column(ColumnDefinition::new("message", DataType::Text).not_null())
                .column(ColumnDefinition::new("level", DataType::Integer).not_null())
                .column(ColumnDefinition::new("note", DataType::Text)),
        )
        .add_table(
            TableDefinition::new("Attachment")
                .column(ColumnDefinition::new("id", DataType::Integer))
                .column(ColumnDefinition::new("data", DataType::Blob))
                .primary_key(&["id"]),
        )
}
