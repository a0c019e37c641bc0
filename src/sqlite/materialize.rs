//! Decoding result rows back into records.

use rusqlite::types::{FromSql, ValueRef};
use rusqlite::{Row, Statement};

use super::error::{DalError, Result};
use super::record::{FieldMap, Record};
use super::value::{Value, ValueKind};

/// Steps `stmt` to completion and decodes each row into a fresh `R`.
///
/// Every row starts as a copy of `blank`, so fields not present in the
/// result set keep their blank value. `template` is a field map of `R`
/// supplying the declared kind of each column; a NULL template field falls
/// back to the kind of its blank value. Result columns that are not fields
/// of `R` are ignored.
pub(crate) fn read_rows<R: Record>(
    stmt: &mut Statement<'_>,
    template: &FieldMap,
    blank: &FieldMap,
    sql: &str,
) -> Result<Vec<R>> {
    let columns: Vec<(usize, String, ValueKind)> = stmt
        .column_names()
        .into_iter()
        .enumerate()
        .filter_map(|(idx, name)| {
            column_kind(template, blank, name).map(|kind| (idx, name.to_string(), kind))
        })
        .collect();

    let mut records = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next().map_err(|source| DalError::Exec {
        sql: sql.to_string(),
        source,
    })? {
        let mut fields = blank.clone();
        for (idx, name, kind) in &columns {
            fields.insert(name, decode(row, *idx, name, *kind)?);
        }
        records.push(R::from_field_map(fields)?);
    }
    Ok(records)
}

fn column_kind(template: &FieldMap, blank: &FieldMap, name: &str) -> Option<ValueKind> {
    let blank_kind = blank.get(name)?.kind();
    match template.get(name).map(Value::kind) {
        Some(ValueKind::Null) | None => Some(blank_kind),
        Some(kind) => Some(kind),
    }
}

fn decode(row: &Row<'_>, idx: usize, name: &str, kind: ValueKind) -> Result<Value> {
    let raw = row
        .get_ref(idx)
        .map_err(|e| DalError::materialize(name, e))?;
    if let ValueRef::Null = raw {
        return Ok(Value::Null);
    }
    let decoded = match kind {
        ValueKind::Boolean => raw.as_i64().map(|i| Value::Boolean(i != 0)),
        ValueKind::Integer => raw.as_i64().map(Value::Integer),
        ValueKind::Real => f64::column_result(raw).map(Value::Real),
        ValueKind::Text => raw.as_str().map(|s| Value::Text(s.to_string())),
        // No declared kind for this field: trust the column.
        ValueKind::Null => return by_storage_class(raw, name),
        ValueKind::Blob => {
            return Err(DalError::materialize(name, "blob fields are not supported"))
        }
    };
    decoded.map_err(|e| DalError::materialize(name, e))
}

fn by_storage_class(raw: ValueRef<'_>, name: &str) -> Result<Value> {
    match raw {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Integer(i)),
        ValueRef::Real(f) => Ok(Value::Real(f)),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .map(|s| Value::Text(s.to_string()))
            .map_err(|e| DalError::materialize(name, e)),
        ValueRef::Blob(_) => Err(DalError::materialize(name, "blob values are not supported")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[derive(Debug, Default, PartialEq)]
    struct Reading {
        flag: bool,
        count: i64,
        ratio: f64,
        label: String,
        note: Option<String>,
    }

    impl Record for Reading {
        const TABLE_NAME: &'static str = "Reading";
        const COLUMNS: &'static [&'static str] = &["flag", "count", "ratio", "label", "note"];
        const KEYS: &'static [&'static str] = &[];

        fn to_field_map(&self) -> FieldMap {
            FieldMap::new()
                .with("flag", self.flag)
                .with("count", self.count)
                .with("ratio", self.ratio)
                .with("label", &self.label)
                .with("note", self.note.clone())
        }

        fn from_field_map(mut map: FieldMap) -> Result<Self> {
            Ok(Self {
                flag: map.take("flag")?,
                count: map.take("count")?,
                ratio: map.take("ratio")?,
                label: map.take("label")?,
                note: map.take_optional("note")?,
            })
        }
    }

    fn read(sql: &str, template: &Reading) -> Result<Vec<Reading>> {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare(sql).unwrap();
        read_rows(&mut stmt, &template.to_field_map(), &Reading::blank(), sql)
    }

    #[test]
    fn decodes_each_kind_by_declared_field_type() {
        let rows = read(
            "SELECT 1 AS flag, 9 AS count, 3 AS ratio, 'x' AS label, 'n' AS note, 0 AS extra",
            &Reading::default(),
        )
        .unwrap();
        assert_eq!(
            rows,
            vec![Reading {
                flag: true,
                count: 9,
                ratio: 3.0,
                label: "x".into(),
                note: Some("n".into()),
            }]
        );
    }

    #[test]
    fn missing_columns_ignore_template_values() {
        let filled = Reading {
            flag: true,
            count: 5,
            ratio: 1.0,
            label: "old".into(),
            note: Some("old".into()),
        };
        let rows = read("SELECT 2.5 AS ratio", &filled).unwrap();
        assert_eq!(
            rows,
            vec![Reading {
                ratio: 2.5,
                ..Reading::default()
            }]
        );
    }

    #[test]
    fn text_in_integer_column_names_the_field() {
        let err = read("SELECT 'many' AS count", &Reading::default()).unwrap_err();
        assert!(matches!(err, DalError::Materialize { ref field, .. } if field == "count"));
    }

    #[test]
    fn untyped_field_rejects_blob_cells() {
        let err = read("SELECT X'FF' AS note", &Reading::default()).unwrap_err();
        assert!(matches!(err, DalError::Materialize { ref field, .. } if field == "note"));
    }

    #[test]
    fn untyped_field_rejects_invalid_utf8() {
        let err = read("SELECT CAST(X'FF' AS TEXT) AS note", &Reading::default()).unwrap_err();
        assert!(matches!(err, DalError::Materialize { ref field, .. } if field == "note"));
    }
}
