//! Row/column output tables shared by every query shape.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

use serde::Serialize;

use crate::core::value::Value;

/// A field the service refused to return for one security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldException {
    pub security: String,
    pub field_id: String,
    pub category: Option<String>,
    pub message: Option<String>,
}

/// A security the service could not resolve or serve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityError {
    pub security: String,
    pub category: Option<String>,
    pub message: Option<String>,
}

/// A row key that can be spelled out as leading index columns.
pub trait TableKey {
    /// Names of the index columns, in order.
    fn index_names() -> &'static [&'static str];
    /// Values of the index columns, in the same order as [`TableKey::index_names`].
    fn index_values(&self) -> Vec<Value>;
}

impl TableKey for String {
    fn index_names() -> &'static [&'static str] {
        &["security"]
    }

    fn index_values(&self) -> Vec<Value> {
        vec![Value::String(self.clone())]
    }
}

/// One table row: its key and the cells present for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row<K> {
    pub key: K,
    pub cells: BTreeMap<String, Value>,
}

impl<K> Row<K> {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }
}

/// A table keyed by `K` with one column per field the service returned.
///
/// There is exactly one row per distinct key. Cells that were absent or excepted are
/// simply not present; they are never errors.
#[derive(Debug, Clone, Serialize)]
pub struct Table<K> {
    rows: Vec<Row<K>>,
    columns: BTreeSet<String>,
    pub field_exceptions: Vec<FieldException>,
    pub security_errors: Vec<SecurityError>,
    #[serde(skip)]
    index: HashMap<K, usize>,
}

impl<K> Default for Table<K> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            columns: BTreeSet::new(),
            field_exceptions: Vec::new(),
            security_errors: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: PartialEq> PartialEq for Table<K> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.columns == other.columns
            && self.field_exceptions == other.field_exceptions
            && self.security_errors == other.security_errors
    }
}

impl<K: Clone + Eq + Hash> Table<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or merges cells for `key`. A key seen before keeps its position and
    /// later cells overwrite earlier ones column by column.
    pub fn upsert<I>(&mut self, key: K, cells: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let idx = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.rows.push(Row {
                    key: key.clone(),
                    cells: BTreeMap::new(),
                });
                self.index.insert(key, self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        let row = &mut self.rows[idx];
        for (column, value) in cells {
            self.columns.insert(column.clone());
            row.cells.insert(column, value);
        }
    }

    /// Appends every row of `other`, merging rows whose key is already present.
    pub fn extend(&mut self, other: Table<K>) {
        for row in other.rows {
            self.upsert(row.key, row.cells);
        }
        self.columns.extend(other.columns);
        self.field_exceptions.extend(other.field_exceptions);
        self.security_errors.extend(other.security_errors);
    }

    pub fn get(&self, key: &K, column: &str) -> Option<&Value> {
        self.index
            .get(key)
            .and_then(|&i| self.rows[i].cells.get(column))
    }

    pub fn row(&self, key: &K) -> Option<&Row<K>> {
        self.index.get(key).map(|&i| &self.rows[i])
    }
}

impl<K> Table<K> {
    pub fn rows(&self) -> &[Row<K>] {
        &self.rows
    }

    /// Column names in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The values of one column in row order; `None` where a row has no cell.
    pub fn column(&self, name: &str) -> Vec<Option<&Value>> {
        self.rows.iter().map(|r| r.cells.get(name)).collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|r| &r.key)
    }
}
