use crate::{
    Value,
    ast::{
        Assignment, CreateTable, Delete, DropTable, Expression, InsertInto, OrderBy, Select,
        SortDirection, Statement, StatementKind, Update,
    },
    catalog::{Catalog, MemoryCatalog},
    config::Config,
    error::{Error, Result, StatementError},
    eval::{evaluate, evaluate_predicate, validate_scalar},
    row::Row,
    schema::Schema,
    table::Table,
};
use log::{debug, info, trace};
use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, PoisonError},
};

/// The main entry point for the query engine.
/// It owns a [Catalog] of tables and executes statements against it, one at a time.
pub struct Database<C: Catalog = MemoryCatalog> {
    catalog: C,
    config: Config,
}

/// Represents the result of a successful `SELECT` query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// The names of the columns included in the result set.
    pub columns: Vec<String>,
    /// The actual data, returned as a vector of rows, where each row is a vector of [Value].
    pub rows: Vec<Vec<Value>>,
}

/// What a successfully executed statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    Created(String),
    Dropped(String),
    Inserted(usize),
    Updated(usize),
    Deleted(usize),
    Rows(QueryResult),
}

impl ExecResult {
    /// Number of rows written by a mutating statement.
    pub fn affected_rows(&self) -> Option<usize> {
        match self {
            Self::Inserted(n) | Self::Updated(n) | Self::Deleted(n) => Some(*n),
            Self::Created(_) | Self::Dropped(_) | Self::Rows(_) => None,
        }
    }

    pub fn into_rows(self) -> Option<QueryResult> {
        match self {
            Self::Rows(result) => Some(result),
            _ => None,
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates a new, empty in-memory database with the default [Config].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_catalog(MemoryCatalog::new(), config)
    }
}

impl<C: Catalog> Database<C> {
    /// Creates a database on top of an existing catalog.
    pub fn with_catalog(catalog: C, config: Config) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Retrieves a reference to a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.catalog.lookup(name)
    }

    /// Returns a list of all table names currently stored in the database.
    pub fn table_names(&self) -> Vec<&str> {
        self.catalog.table_names()
    }

    /// Executes one statement.
    ///
    /// A statement is validated completely before anything is written, so a
    /// failed statement leaves the catalog and every table exactly as they were.
    ///
    /// # Errors
    /// Returns a [StatementError] naming the statement kind and the cause.
    ///
    /// # Example
    /// ```
    /// use csvsql::ast::{CreateTable, Expression, InsertInto, Select, Statement};
    /// use csvsql::{Column, DataType, Database, ExecResult, Value};
    ///
    /// let mut db = Database::new();
    /// db.execute(&Statement::Create(CreateTable {
    ///     name: "users".into(),
    ///     columns: vec![
    ///         Column::primary_key("id", DataType::Int),
    ///         Column::new("name", DataType::Varchar(10)),
    ///     ],
    /// }))
    /// .unwrap();
    /// db.execute(&Statement::Insert(InsertInto {
    ///     into: "users".into(),
    ///     columns: vec![],
    ///     values: vec![Expression::number(1), Expression::string("bob")],
    /// }))
    /// .unwrap();
    ///
    /// let select = Select::new(vec![Expression::ident("name")], "users")
    ///     .filter(Expression::ident("id").equals(Expression::number(1)));
    /// let result = db.execute(&Statement::Select(select)).unwrap();
    /// let ExecResult::Rows(rows) = result else { panic!("expected rows") };
    /// assert_eq!(rows.rows, vec![vec![Value::string("bob")]]);
    /// ```
    pub fn execute(&mut self, statement: &Statement) -> std::result::Result<ExecResult, StatementError> {
        debug!("executing: {statement}");

        let result = match statement {
            Statement::Create(create) => self.create(create),
            Statement::Select(select) => self.select(select).map(ExecResult::Rows),
            Statement::Insert(insert) => self.insert(insert).map(ExecResult::Inserted),
            Statement::Update(update) => self.update(update).map(ExecResult::Updated),
            Statement::Delete(delete) => self.delete(delete).map(ExecResult::Deleted),
            Statement::Drop(drop) => self.drop_table(drop),
        };

        match result {
            Ok(result) => {
                trace!("{} on {} succeeded: {result:?}", statement.kind(), statement.table());
                Ok(result)
            }
            Err(error) => {
                let error = StatementError::new(statement.kind(), error);
                debug!("{error}");
                Err(error)
            }
        }
    }

    /// Executes a `SELECT` without requiring mutable access.
    pub fn query(&self, select: &Select) -> std::result::Result<QueryResult, StatementError> {
        debug!("querying: {select}");
        self.select(select)
            .map_err(|error| StatementError::new(StatementKind::Select, error))
    }

    fn lookup(&self, name: &str) -> Result<&Table> {
        self.catalog
            .lookup(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    fn lookup_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.catalog
            .lookup_mut(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    fn create(&mut self, create: &CreateTable) -> Result<ExecResult> {
        if self.catalog.lookup(&create.name).is_some() {
            return Err(Error::TableAlreadyExists(create.name.clone()));
        }
        let schema = Schema::new(create.columns.clone());
        schema.validate(&create.name, self.config.max_varchar_size)?;

        self.catalog.create_table(&create.name, schema)?;
        info!("created table {}", create.name);
        Ok(ExecResult::Created(create.name.clone()))
    }

    fn drop_table(&mut self, drop: &DropTable) -> Result<ExecResult> {
        let table = self.catalog.drop_table(&drop.name)?;
        info!("dropped table {} ({} rows)", drop.name, table.row_count());
        Ok(ExecResult::Dropped(drop.name.clone()))
    }

    /// Internal helper to handle row insertion logic.
    ///
    /// It maps provided values to the correct columns, handling cases where:
    /// 1. Columns are not specified (positional insertion).
    /// 2. Columns are specified in a different order than the schema.
    ///
    /// Every schema column must receive a value.
    fn insert(&mut self, insert: &InsertInto) -> Result<usize> {
        let table = self.lookup_mut(&insert.into)?;
        let schema = table.schema();

        let expected = if insert.columns.is_empty() {
            schema.len()
        } else {
            insert.columns.len()
        };
        if expected != insert.values.len() {
            return Err(Error::ColumnValueCountMismatch {
                columns: expected,
                values: insert.values.len(),
            });
        }

        // there is no row to bind identifiers to yet
        let evaluated = insert
            .values
            .iter()
            .map(|expr| {
                if expr.contains_wildcard() {
                    return Err(Error::InvalidWildcardUse);
                }
                evaluate(expr, None)
            })
            .collect::<Result<Vec<Value>>>()?;

        let values = if insert.columns.is_empty() {
            evaluated
        } else {
            let mut provided: HashMap<&str, Value> = HashMap::with_capacity(evaluated.len());
            for (name, value) in insert.columns.iter().zip(evaluated) {
                if schema.index_of(name).is_none() {
                    return Err(Error::UnknownColumn(name.clone()));
                }
                if provided.insert(name.as_str(), value).is_some() {
                    return Err(Error::DuplicateColumn(name.clone()));
                }
            }

            // Build the final row by following the schema's column order
            schema
                .names()
                .map(|name| {
                    provided
                        .remove(name)
                        .ok_or_else(|| Error::MissingValue(name.to_string()))
                })
                .collect::<Result<Vec<_>>>()?
        };

        table.insert(values)?;
        Ok(1)
    }

    /// Executes a `DELETE` statement.
    ///
    /// Deletion is performed in two phases:
    /// 1. Identification: It finds the indices of all rows matching the `WHERE` clause.
    /// 2. Removal: It removes those rows from the table storage.
    ///
    /// Without a `WHERE` clause every row is removed. Returns the number of
    /// removed rows.
    fn delete(&mut self, delete: &Delete) -> Result<usize> {
        let table = self.lookup_mut(&delete.from)?;
        if let Some(where_clause) = &delete.where_clause {
            validate_scalar(where_clause, table.schema())?;
        }

        let rows_to_delete = filter_rows(table, delete.where_clause.as_ref(), |i, _| i)?;
        Ok(table.delete_rows(rows_to_delete))
    }

    /// Executes an `UPDATE` statement to modify existing rows in a table.
    ///
    /// The update is performed in two phases:
    /// 1. **Identification**: It scans the table to find rows matching the `WHERE`
    ///    clause and computes each new row from the current one.
    /// 2. **Modification**: The table checks every new row (types and
    ///    uniqueness) and replaces them all at once.
    fn update(&mut self, update: &Update) -> Result<usize> {
        let table = self.lookup_mut(&update.table)?;
        let targets = resolve_assignments(&update.assignments, table.schema())?;
        if let Some(where_clause) = &update.where_clause {
            validate_scalar(where_clause, table.schema())?;
        }

        let matching = filter_rows(table, update.where_clause.as_ref(), |i, row| (i, row))?;
        let mut updates = Vec::with_capacity(matching.len());
        for (row_idx, row) in matching {
            let mut values = row.values().to_vec();
            // every assignment sees the row as it was before the update
            for (col_idx, assignment) in &targets {
                values[*col_idx] = evaluate(&assignment.value, Some(&row))?;
            }
            updates.push((row_idx, values));
        }

        table.update_rows(updates)
    }

    /// Executes a `SELECT` query and returns the resulting data set.
    ///
    /// This method performs the full query lifecycle:
    /// 1. **Validates** every expression against the schema.
    /// 2. **Filters** rows based on the `WHERE` clause.
    /// 3. **Sorts** the remaining rows based on the `ORDER BY` clause.
    /// 4. **Limits** the number of rows returned.
    /// 5. **Projects** the requested expressions, expanding `*` to every column.
    fn select(&self, select: &Select) -> Result<QueryResult> {
        let table = self.lookup(&select.from)?;
        let schema = table.schema();

        // Resolve the output column labels
        let mut columns = Vec::with_capacity(select.columns.len());
        for expr in &select.columns {
            match expr {
                Expression::Wildcard => columns.extend(schema.names().map(str::to_string)),
                Expression::Identifier(name) => {
                    validate_scalar(expr, schema)?;
                    columns.push(name.clone());
                }
                _ => {
                    validate_scalar(expr, schema)?;
                    columns.push(expr.to_string());
                }
            }
        }
        if let Some(where_clause) = &select.where_clause {
            validate_scalar(where_clause, schema)?;
        }
        for clause in &select.order_by {
            validate_scalar(&clause.expr, schema)?;
        }

        let mut filtered_rows =
            filter_rows(table, select.where_clause.as_ref(), |_, row| row)?;

        if !select.order_by.is_empty() {
            filtered_rows = sort(filtered_rows, &select.order_by)?;
        }

        let rows = filtered_rows
            .into_iter()
            .take(select.limit.unwrap_or(usize::MAX))
            .map(|row| project(&row, &select.columns))
            .collect::<Result<Vec<_>>>()?;

        Ok(QueryResult { columns, rows })
    }
}

/// A generic helper function to filter rows within a table.
///
/// Every row for which `where_clause` holds (every row when there is none) is
/// passed to `map_fn` together with its index; the results are collected in
/// storage order.
fn filter_rows<T, F>(table: &Table, where_clause: Option<&Expression>, mut map_fn: F) -> Result<Vec<T>>
where
    F: FnMut(usize, Row) -> T,
{
    let mut results = Vec::new();
    for (i, row) in table.rows().enumerate() {
        let should_include = match where_clause {
            Some(expr) => evaluate_predicate(expr, Some(&row))?,
            None => true,
        };

        if should_include {
            // use closure to know what to store (index or row)
            results.push(map_fn(i, row));
        }
    }
    Ok(results)
}

/// Sorts rows based on the SQL `ORDER BY` clauses.
///
/// Sort keys are evaluated once per row. For each row comparison, it iterates
/// through the keys: if the first one compares equal, it moves to the next one,
/// and so on. The sort is stable, so rows with equal keys keep their order.
fn sort(rows: Vec<Row>, order_by: &[OrderBy]) -> Result<Vec<Row>> {
    let mut keyed = rows
        .into_iter()
        .map(|row| {
            let keys = order_by
                .iter()
                .map(|clause| evaluate(&clause.expr, Some(&row)))
                .collect::<Result<Vec<_>>>()?;
            Ok((keys, row))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut failure = None;
    keyed.sort_by(|(a, _), (b, _)| {
        for ((left, right), clause) in a.iter().zip(b).zip(order_by) {
            let mut ord = match left.compare(right) {
                Ok(ord) => ord,
                Err(error) => {
                    failure.get_or_insert(error);
                    return Ordering::Equal;
                }
            };

            if clause.direction == SortDirection::Desc {
                ord = ord.reverse();
            }
            // if it's not equal no need to compare more
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    match failure {
        Some(error) => Err(error),
        None => Ok(keyed.into_iter().map(|(_, row)| row).collect()),
    }
}

fn project(row: &Row, projection: &[Expression]) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(projection.len());
    for expr in projection {
        match expr {
            Expression::Wildcard => values.extend_from_slice(row.values()),
            _ => values.push(evaluate(expr, Some(row))?),
        }
    }
    Ok(values)
}

/// Maps each assignment to the schema index of its target column.
fn resolve_assignments<'a>(
    assignments: &'a [Assignment],
    schema: &Schema,
) -> Result<Vec<(usize, &'a Assignment)>> {
    let mut seen = HashSet::with_capacity(assignments.len());
    assignments
        .iter()
        .map(|assignment| {
            let idx = schema
                .index_of(&assignment.identifier)
                .ok_or_else(|| Error::UnknownColumn(assignment.identifier.clone()))?;
            if !seen.insert(idx) {
                return Err(Error::DuplicateColumn(assignment.identifier.clone()));
            }
            validate_scalar(&assignment.value, schema)?;
            Ok((idx, assignment))
        })
        .collect()
}

/// A [Database] handle that can be shared between threads.
///
/// Statements are serialized: each one holds an exclusive lock on the whole
/// database until it completes.
pub struct SharedDatabase<C: Catalog = MemoryCatalog> {
    inner: Arc<Mutex<Database<C>>>,
}

impl<C: Catalog> Clone for SharedDatabase<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Catalog> SharedDatabase<C> {
    pub fn new(database: Database<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(database)),
        }
    }

    pub fn execute(&self, statement: &Statement) -> std::result::Result<ExecResult, StatementError> {
        // a panic inside a statement is a bug, the catalog itself is still usable
        let mut database = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        database.execute(statement)
    }

    /// Runs `f` with shared access to the database while holding the lock.
    pub fn read<T>(&self, f: impl FnOnce(&Database<C>) -> T) -> T {
        let database = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&database)
    }
}
