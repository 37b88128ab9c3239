use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::column::ColumnStore;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::schema::{Column, Constraint, Schema};
use crate::value::Value;

/// A table: its schema plus the rows, stored column by column.
///
/// Every write goes through [Table::insert], [Table::update_rows] or
/// [Table::delete_rows], which keep two invariants: each cell conforms to its
/// column type, and no two rows share a value in a `PRIMARY KEY` or `UNIQUE`
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    schema: Schema,
    columns: Vec<ColumnStore>,
    row_count: usize,
    /// Column names in schema order, shared with every materialized [Row].
    names: Arc<[String]>,
}

impl Table {
    pub fn new(name: String, schema: Schema) -> Self {
        let columns = schema
            .columns()
            .iter()
            .map(|column| ColumnStore::new(column.name().to_string(), column.data_type()))
            .collect();
        let names = schema.names().map(str::to_string).collect::<Vec<_>>().into();
        Self {
            name,
            schema,
            columns,
            row_count: 0,
            names,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Appends a row given in schema order.
    ///
    /// # Errors
    /// - [Error::ColumnValueCountMismatch] if the row width differs from the schema.
    /// - [Error::TypeMismatch] / [Error::ValueTooLong] if a value doesn't fit its column.
    /// - [Error::ConstraintViolation] if a unique column already holds the value.
    ///
    /// Nothing is stored when an error is returned.
    pub fn insert(&mut self, values: Vec<Value>) -> Result<()> {
        self.check_row(&values)?;

        for ((column, store), value) in self.schema.columns().iter().zip(&self.columns).zip(&values)
        {
            if let Some(constraint) = column.uniqueness_constraint() {
                if store.contains(value) {
                    return Err(Error::ConstraintViolation {
                        column: column.name().to_string(),
                        constraint,
                        value: value.clone(),
                    });
                }
            }
        }

        for (store, value) in self.columns.iter_mut().zip(values) {
            store.push(value);
        }
        self.row_count += 1;
        Ok(())
    }

    pub fn get_row(&self, row_idx: usize) -> Option<Row> {
        if self.row_count <= row_idx {
            return None;
        }
        let values = self
            .columns
            .iter()
            .map(|col| col.get(row_idx)) // -> Option<Value>
            .collect::<Option<Vec<_>>>()?;
        Some(Row::new(Arc::clone(&self.names), values))
    }

    /// Iterates over all rows in storage order.
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.row_count).filter_map(|idx| self.get_row(idx))
    }

    pub fn get_col(&self, name: &str) -> Option<&ColumnStore> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Replaces whole rows, given as `(row index, new values in schema order)`.
    ///
    /// Every new row is checked and uniqueness is verified on the table as it
    /// would look after the update, so either all rows change or none does.
    /// Returns the number of updated rows.
    pub fn update_rows(&mut self, updates: Vec<(usize, Vec<Value>)>) -> Result<usize> {
        for (_, values) in &updates {
            self.check_row(values)?;
        }

        let updated: HashMap<usize, &[Value]> = updates
            .iter()
            .map(|(idx, values)| (*idx, values.as_slice()))
            .collect();
        for (col_idx, column) in self.schema.columns().iter().enumerate() {
            if let Some(constraint) = column.uniqueness_constraint() {
                self.check_unique_after_update(col_idx, column, constraint, &updated)?;
            }
        }

        let count = updates.len();
        for (row_idx, values) in updates {
            for (store, value) in self.columns.iter_mut().zip(values) {
                store.set(row_idx, value);
            }
        }
        Ok(count)
    }

    /// Removes the rows at the given indices and returns how many were removed.
    pub fn delete_rows(&mut self, mut indices: Vec<usize>) -> usize {
        indices.retain(|idx| *idx < self.row_count);
        // descending, so each removal leaves the pending indices in place
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();

        for store in &mut self.columns {
            store.remove_rows(&indices);
        }
        self.row_count -= indices.len();
        indices.len()
    }

    fn check_row(&self, values: &[Value]) -> Result<()> {
        if values.len() != self.schema.len() {
            return Err(Error::ColumnValueCountMismatch {
                columns: self.schema.len(),
                values: values.len(),
            });
        }
        for (column, value) in self.schema.columns().iter().zip(values) {
            column.check(value)?;
        }
        Ok(())
    }

    fn check_unique_after_update(
        &self,
        col_idx: usize,
        column: &Column,
        constraint: Constraint,
        updated: &HashMap<usize, &[Value]>,
    ) -> Result<()> {
        let store = &self.columns[col_idx];
        let mut seen = HashSet::with_capacity(self.row_count);
        for row_idx in 0..self.row_count {
            let value = match updated.get(&row_idx) {
                Some(values) => values[col_idx].clone(),
                None => match store.get(row_idx) {
                    Some(value) => value,
                    None => continue,
                },
            };
            if seen.contains(&value) {
                return Err(Error::ConstraintViolation {
                    column: column.name().to_string(),
                    constraint,
                    value,
                });
            }
            seen.insert(value);
        }
        Ok(())
    }
}
