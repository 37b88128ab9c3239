use std::collections::HashSet;
use std::fmt;

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

/// A rule on a column, enforced every time a row is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constraint {
    PrimaryKey,
    Unique,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryKey => write!(f, "PRIMARY KEY"),
            Self::Unique => write!(f, "UNIQUE"),
        }
    }
}

/// Column definition in the schema.
///
/// Columns are immutable once built. Use [Column::new], [Column::primary_key]
/// or [Column::unique]:
///
/// ```
/// use csvsql::{Column, Constraint, DataType};
///
/// let id = Column::primary_key("id", DataType::Int);
/// assert!(id.is_primary_key());
/// assert!(id.is_unique());
/// assert_eq!(id.constraints(), &[Constraint::PrimaryKey]);
/// assert_eq!(id.to_string(), "id INT PRIMARY KEY");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    data_type: DataType,
    /// Sorted and free of duplicates.
    constraints: Vec<Constraint>,
}

impl Column {
    /// Builds a column carrying an arbitrary set of constraints.
    pub(crate) fn with_constraints(
        name: impl Into<String>,
        data_type: DataType,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        let mut constraints: Vec<Constraint> = constraints.into_iter().collect();
        constraints.sort_unstable();
        constraints.dedup();
        Self {
            name: name.into(),
            data_type,
            constraints,
        }
    }

    /// A column without constraints.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self::with_constraints(name, data_type, [])
    }

    /// A `PRIMARY KEY` column.
    pub fn primary_key(name: impl Into<String>, data_type: DataType) -> Self {
        Self::with_constraints(name, data_type, [Constraint::PrimaryKey])
    }

    /// A `UNIQUE` column.
    pub fn unique(name: impl Into<String>, data_type: DataType) -> Self {
        Self::with_constraints(name, data_type, [Constraint::Unique])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_primary_key(&self) -> bool {
        self.constraints.contains(&Constraint::PrimaryKey)
    }

    /// Returns `true` when no two rows may share a value in this column.
    pub fn is_unique(&self) -> bool {
        !self.constraints.is_empty()
    }

    /// The constraint reported when a duplicate value is found.
    pub(crate) fn uniqueness_constraint(&self) -> Option<Constraint> {
        self.constraints.first().copied()
    }

    /// Checks that `value` may be stored in this column.
    ///
    /// # Errors
    /// - [Error::TypeMismatch] if the value kind differs from the column type.
    /// - [Error::ValueTooLong] if a string exceeds the `Varchar` size.
    pub fn check(&self, value: &Value) -> Result<()> {
        if value.conforms(&self.data_type) {
            return Ok(());
        }
        match (value, self.data_type) {
            (Value::String(s), DataType::Varchar(max)) => Err(Error::ValueTooLong {
                column: self.name.clone(),
                max,
                len: s.chars().count(),
            }),
            _ => Err(Error::TypeMismatch {
                expected: format!("{} for column {}", self.data_type, self.name),
                found: format!("{} {value}", value.kind()),
            }),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        for constraint in &self.constraints {
            write!(f, " {constraint}")?;
        }
        Ok(())
    }
}

/// Ordered column definitions of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Checks the schema of table `table` before it is registered:
    /// at least one column, unique column names, at most one primary key and
    /// `Varchar` sizes in `1..=max_varchar_size`.
    pub fn validate(&self, table: &str, max_varchar_size: usize) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::EmptySchema(table.to_string()));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name()) {
                return Err(Error::DuplicateColumn(column.name().to_string()));
            }
            if let DataType::Varchar(size) = column.data_type() {
                if size == 0 || size > max_varchar_size {
                    return Err(Error::InvalidDataType {
                        column: column.name().to_string(),
                        reason: format!("VARCHAR size must be in 1..={max_varchar_size}, got {size}"),
                    });
                }
            }
        }

        if self.columns.iter().filter(|c| c.is_primary_key()).count() > 1 {
            return Err(Error::MultiplePrimaryKeys(table.to_string()));
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of column `name` in schema order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name())
    }
}
