use std::sync::Arc;

use crate::data_type::DataType;
use crate::value::Value;
use bitvec::prelude::*;

/// Physical storage for column data.
/// Each variant wraps a collection of a specific type to ensure contiguous memory
/// allocation (columnar storage).
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Vector of 64-bit integers.
    Int(Vec<i64>),
    /// Compact bit-vector for boolean values.
    Bool(BitVec),
    /// Vector of thread-safe atomic reference-counted strings.
    Varchar(Vec<Arc<str>>),
}

/// The values of one table column, stored contiguously.
///
/// A `ColumnStore` never validates sizes or constraints: the owning
/// [crate::Table] checks every value against the schema first. Handing it a
/// value of the wrong kind is a programming error and panics.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStore {
    /// The name of the column.
    pub name: String,
    /// The actual values stored in the column.
    pub data: ColumnData,
}

impl ColumnStore {
    /// Creates a new, empty column with the specified name and data type.
    /// The underlying data storage is initialized according to the data type.
    pub fn new(name: String, data_type: DataType) -> Self {
        let data = match data_type {
            DataType::Int => ColumnData::Int(vec![]),
            DataType::Bool => ColumnData::Bool(bitvec!()),
            DataType::Varchar(_) => ColumnData::Varchar(vec![]),
        };
        Self { name, data }
    }

    /// Appends a new value to the end of the column.
    pub fn push(&mut self, value: Value) {
        match (&mut self.data, value) {
            (ColumnData::Int(col), Value::Number(v)) => col.push(v),
            (ColumnData::Bool(col), Value::Bool(v)) => col.push(v),
            (ColumnData::Varchar(col), Value::String(v)) => col.push(v),
            (_, value) => unreachable!(
                "value {value} reached storage of column {} unchecked",
                self.name
            ),
        }
    }

    /// Returns the number of rows currently stored in the column.
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Int(col) => col.len(),
            ColumnData::Bool(col) => col.len(),
            ColumnData::Varchar(col) => col.len(),
        }
    }

    /// Returns true if there is no row in the column, else false.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieves the value at the specified row index.
    ///
    /// Returns `Some(Value)` if the index is valid, or `None` if it is out of bounds.
    pub fn get(&self, row_idx: usize) -> Option<Value> {
        if row_idx >= self.len() {
            return None;
        }
        match &self.data {
            ColumnData::Int(col) => Some(Value::Number(col[row_idx])),
            ColumnData::Bool(col) => Some(Value::Bool(col[row_idx])),
            ColumnData::Varchar(col) => Some(Value::String(Arc::clone(&col[row_idx]))),
        }
    }

    /// Returns `true` if some row holds a value equal to `value`.
    pub fn contains(&self, value: &Value) -> bool {
        match (&self.data, value) {
            (ColumnData::Int(col), Value::Number(v)) => col.contains(v),
            (ColumnData::Bool(col), Value::Bool(v)) => col.iter().any(|b| *b == *v),
            (ColumnData::Varchar(col), Value::String(v)) => col.iter().any(|s| s == v),
            _ => false,
        }
    }

    /// Removes the values at the given row indices.
    ///
    /// `sorted_desc` must be sorted in descending order so removing one row
    /// doesn't shift the position of the ones still to remove.
    pub fn remove_rows(&mut self, sorted_desc: &[usize]) {
        debug_assert!(sorted_desc.windows(2).all(|w| w[0] > w[1]));
        for &row_idx in sorted_desc {
            match &mut self.data {
                ColumnData::Int(col) => {
                    col.remove(row_idx);
                }
                ColumnData::Bool(col) => {
                    col.remove(row_idx);
                }
                ColumnData::Varchar(col) => {
                    col.remove(row_idx);
                }
            }
        }
    }

    /// Replaces the value at `row_idx`.
    pub fn set(&mut self, row_idx: usize, value: Value) {
        match (&mut self.data, value) {
            (ColumnData::Int(col), Value::Number(v)) => col[row_idx] = v,
            (ColumnData::Bool(col), Value::Bool(v)) => {
                col.replace(row_idx, v);
            }
            (ColumnData::Varchar(col), Value::String(v)) => col[row_idx] = v,
            (_, value) => unreachable!(
                "value {value} reached storage of column {} unchecked",
                self.name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────
    // Test 1 : Creation
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_column_new() {
        let col = ColumnStore::new("age".into(), DataType::Int);

        assert_eq!(col.name, "age");
        assert!(matches!(col.data, ColumnData::Int(_)));
        assert!(col.is_empty());

        let col = ColumnStore::new("flag".into(), DataType::Bool);
        assert!(matches!(col.data, ColumnData::Bool(_)));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 2 : Basic Push & Get
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_push_and_get() {
        let mut col = ColumnStore::new("name".into(), DataType::Varchar(10));

        col.push(Value::string("bob"));

        assert_eq!(col.len(), 1);
        assert_eq!(col.get(0), Some(Value::string("bob")));
    }

    #[test]
    fn test_bool_column() {
        let mut col = ColumnStore::new("active".into(), DataType::Bool);
        col.push(Value::Bool(true));
        col.push(Value::Bool(false));
        col.push(Value::Bool(true));

        assert_eq!(col.get(1), Some(Value::Bool(false)));
        assert!(col.contains(&Value::Bool(false)));

        col.set(1, Value::Bool(true));
        assert!(!col.contains(&Value::Bool(false)));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 3 : Out of bounds
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_out_of_bounds() {
        let col = ColumnStore::new("test".into(), DataType::Int);

        assert_eq!(col.get(0), None);
        assert_eq!(col.get(100), None);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 4 : Large Column
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_large_column() {
        let mut col = ColumnStore::new("big".into(), DataType::Int);

        for i in 0..10_000 {
            col.push(Value::Number(i));
        }

        assert_eq!(col.len(), 10_000);
        assert_eq!(col.get(5_000), Some(Value::Number(5_000)));
        assert!(col.contains(&Value::Number(9_999)));
        assert!(!col.contains(&Value::Number(10_000)));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 5 : remove values
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_remove_rows() {
        let mut col = ColumnStore::new("test".into(), DataType::Int);

        for v in [42, 59, 7, 13] {
            col.push(Value::Number(v));
        }

        col.remove_rows(&[2, 0]);
        assert_eq!(col.len(), 2);
        assert_eq!(col.get(0), Some(Value::Number(59)));
        assert_eq!(col.get(1), Some(Value::Number(13)));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 6 : change a value
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_column_set() {
        let mut col = ColumnStore::new("age".into(), DataType::Int);
        col.push(Value::Number(30));

        col.set(0, Value::Number(31));
        assert_eq!(col.get(0), Some(Value::Number(31)));
    }

    #[test]
    #[should_panic]
    fn test_push_wrong_kind_panics() {
        let mut col = ColumnStore::new("age".into(), DataType::Int);
        col.push(Value::string("thirty"));
    }

    #[test]
    fn test_contains_other_kind() {
        let mut col = ColumnStore::new("age".into(), DataType::Int);
        col.push(Value::Number(1));
        assert!(!col.contains(&Value::string("1")));
    }
}
