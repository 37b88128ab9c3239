pub mod ast;
pub mod catalog;
pub mod column;
pub mod config;
pub mod data_type;
pub mod database;
pub mod error;
pub mod eval;
pub mod logging;
pub mod row;
pub mod schema;
pub mod table;
pub mod value;

pub use ast::{Expression, Statement, StatementKind};
pub use catalog::{Catalog, MemoryCatalog};
pub use config::Config;
pub use data_type::{DataType, TypeKind};
pub use database::{Database, ExecResult, QueryResult, SharedDatabase};
pub use error::{Error, Result, StatementError};
pub use row::Row;
pub use schema::{Column, Constraint, Schema};
pub use table::Table;
pub use value::Value;
