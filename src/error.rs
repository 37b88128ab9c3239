//! Error types for the query engine

use thiserror::Error;

use crate::ast::StatementKind;
use crate::schema::Constraint;
use crate::value::Value;

pub type Result<T> = std::result::Result<T, Error>;

/// Every semantic failure a statement can hit.
///
/// All of them are recoverable: the failing statement leaves no visible
/// change behind and the error is handed back to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Catalog errors
    #[error("Table not found: {0}")]
    UnknownTable(String),

    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),

    // Schema errors
    #[error("Column already exists: {0}")]
    DuplicateColumn(String),

    #[error("Column not found: {0}")]
    UnknownColumn(String),

    #[error("Table {0} declares more than one PRIMARY KEY column")]
    MultiplePrimaryKeys(String),

    #[error("Table {0} must have at least one column")]
    EmptySchema(String),

    #[error("Invalid data type for column {column}: {reason}")]
    InvalidDataType { column: String, reason: String },

    // Type errors
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Value too long for column {column}: {len} characters, maximum is {max}")]
    ValueTooLong {
        column: String,
        max: usize,
        len: usize,
    },

    // Write errors
    #[error("Expected {columns} values, got {values}")]
    ColumnValueCountMismatch { columns: usize, values: usize },

    #[error("No value provided for column {0}")]
    MissingValue(String),

    #[error("{constraint} violation on column {column}: duplicate value {value}")]
    ConstraintViolation {
        column: String,
        constraint: Constraint,
        value: Value,
    },

    // Evaluation errors
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow in {0}")]
    ArithmeticOverflow(String),

    #[error("Wildcard is only allowed as a SELECT projection")]
    InvalidWildcardUse,
}

/// A failure tagged with the kind of statement that raised it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{statement} failed: {error}")]
pub struct StatementError {
    pub statement: StatementKind,
    #[source]
    pub error: Error,
}

impl StatementError {
    pub fn new(statement: StatementKind, error: Error) -> Self {
        Self { statement, error }
    }
}
