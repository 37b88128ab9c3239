use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::table::Table;

/// The set of tables the executor works on.
///
/// Implementations own the tables; the executor borrows one for the duration
/// of a single statement. A backend that persists tables (e.g. to CSV files)
/// plugs in here.
pub trait Catalog {
    /// Retrieves a reference to a table by name.
    fn lookup(&self, name: &str) -> Option<&Table>;

    /// Retrieves a mutable reference to a table by name.
    fn lookup_mut(&mut self, name: &str) -> Option<&mut Table>;

    /// Registers a new, empty table.
    ///
    /// # Errors
    /// Returns [Error::TableAlreadyExists] if the name is taken.
    fn create_table(&mut self, name: &str, schema: Schema) -> Result<()>;

    /// Removes a table and returns it.
    ///
    /// # Errors
    /// Returns [Error::UnknownTable] if the table does not exist.
    fn drop_table(&mut self, name: &str) -> Result<Table>;

    /// Names of all tables currently registered.
    fn table_names(&self) -> Vec<&str>;
}

/// A catalog keeping every table in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Catalog for MemoryCatalog {
    fn lookup(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    fn create_table(&mut self, name: &str, schema: Schema) -> Result<()> {
        if self.tables.contains_key(name) {
            return Err(Error::TableAlreadyExists(name.to_string()));
        }
        self.tables
            .insert(name.to_string(), Table::new(name.to_string(), schema));
        Ok(())
    }

    fn drop_table(&mut self, name: &str) -> Result<Table> {
        self.tables
            .remove(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::schema::Column;

    fn simple_schema() -> Schema {
        Schema::new(vec![
            Column::primary_key("id", DataType::Int),
            Column::new("name", DataType::Varchar(20)),
        ])
    }

    #[test]
    fn test_create_and_drop_table() {
        let mut catalog = MemoryCatalog::new();

        assert!(catalog.create_table("users", simple_schema()).is_ok());
        assert!(catalog.lookup("users").is_some());

        let dropped = catalog.drop_table("users").unwrap();
        assert_eq!(dropped.name(), "users");
        assert!(catalog.lookup("users").is_none());
    }

    #[test]
    fn test_duplicate_table_error() {
        let mut catalog = MemoryCatalog::new();

        catalog.create_table("users", simple_schema()).unwrap();
        assert_eq!(
            catalog.create_table("users", simple_schema()),
            Err(Error::TableAlreadyExists("users".into()))
        );
    }

    #[test]
    fn test_drop_nonexistent_table() {
        let mut catalog = MemoryCatalog::new();

        assert!(matches!(
            catalog.drop_table("unknown"),
            Err(Error::UnknownTable(_))
        ));
    }

    #[test]
    fn test_table_names() {
        let mut catalog = MemoryCatalog::new();

        catalog.create_table("users", simple_schema()).unwrap();
        catalog.create_table("posts", simple_schema()).unwrap();

        let mut tables = catalog.table_names();
        tables.sort();

        assert_eq!(tables, vec!["posts", "users"]);
    }
}
