//! The record contract and the ordered field map it converts through.

use super::error::{DalError, Result};
use super::value::Value;

/// A type that maps onto the rows of one table.
///
/// Metadata is fixed per type; only field values vary per instance. The
/// order of [`COLUMNS`](Record::COLUMNS) fixes the INSERT value order and the
/// bind order of every generated statement.
///
/// ```
/// use rust_sqlite_dal::{FieldMap, Record, Result};
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct MenuItem {
///     name: String,
///     price: f64,
/// }
///
/// impl Record for MenuItem {
///     const TABLE_NAME: &'static str = "MenuItem";
///     const COLUMNS: &'static [&'static str] = &["name", "price"];
///     const KEYS: &'static [&'static str] = &["name"];
///
///     fn to_field_map(&self) -> FieldMap {
///         FieldMap::new()
///             .with("name", &self.name)
///             .with("price", self.price)
///     }
///
///     fn from_field_map(mut map: FieldMap) -> Result<Self> {
///         Ok(Self {
///             name: map.take("name")?,
///             price: map.take("price")?,
///         })
///     }
/// }
/// ```
pub trait Record: Sized {
    /// Target table. Must not be empty.
    const TABLE_NAME: &'static str;
    /// Every column, in declared order.
    const COLUMNS: &'static [&'static str];
    /// Primary key columns in declared order. Empty means "no primary key".
    const KEYS: &'static [&'static str];
    /// Column whose value the database assigns on insert.
    const AUTO_KEY: Option<&'static str> = None;

    /// All and only the declared columns, in declared order.
    fn to_field_map(&self) -> FieldMap;

    /// Rebuilds a record from a map carrying the keys of [`to_field_map`](Record::to_field_map).
    fn from_field_map(map: FieldMap) -> Result<Self>;

    /// Field values a selected row starts from before its columns are decoded.
    ///
    /// Fields left out of a projection keep these values, whatever instance
    /// the select was called with.
    fn blank() -> FieldMap
    where
        Self: Default,
    {
        Self::default().to_field_map()
    }
}

/// Ordered mapping from field name to [`Value`].
///
/// Iteration follows insertion order, never name order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, Value)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Replaces the value of an existing field in place, or appends a new one.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Moves a field out, converted to `T`.
    ///
    /// A missing field or a value of the wrong kind is a materialization error.
    pub fn take<T>(&mut self, name: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = super::value::KindMismatch>,
    {
        let value = self.take_value(name)?;
        T::try_from(value).map_err(|e| DalError::materialize(name, e))
    }

    /// Like [`take`](Self::take) but maps NULL to `None`.
    pub fn take_optional<T>(&mut self, name: &str) -> Result<Option<T>>
    where
        T: TryFrom<Value, Error = super::value::KindMismatch>,
    {
        match self.take_value(name)? {
            Value::Null => Ok(None),
            value => T::try_from(value)
                .map(Some)
                .map_err(|e| DalError::materialize(name, e)),
        }
    }

    fn take_value(&mut self, name: &str) -> Result<Value> {
        let slot = self
            .entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| DalError::materialize(name, "field missing from row"))?;
        Ok(std::mem::replace(&mut slot.1, Value::Null))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Checks a record type's metadata against one of its field maps.
pub(crate) fn validate<R: Record>(map: &FieldMap) -> Result<()> {
    let table = R::TABLE_NAME;
    if table.is_empty() {
        return Err(DalError::schema(table, "table name is empty"));
    }
    if R::COLUMNS.is_empty() {
        return Err(DalError::schema(table, "record declares no columns"));
    }
    if !map.names().eq(R::COLUMNS.iter().copied()) {
        let found: Vec<&str> = map.names().collect();
        return Err(DalError::schema(
            table,
            format!(
                "field map {found:?} does not match declared columns {:?}",
                R::COLUMNS
            ),
        ));
    }
    if let Some(key) = R::KEYS.iter().find(|k| !R::COLUMNS.contains(*k)) {
        return Err(DalError::schema(
            table,
            format!("key `{key}` is not a column"),
        ));
    }
    if let Some(auto) = R::AUTO_KEY {
        if !R::KEYS.contains(&auto) {
            return Err(DalError::schema(
                table,
                format!("auto-generated key `{auto}` is not a key"),
            ));
        }
    }
    Ok(())
}
