use std::sync::Arc;

use crate::value::Value;

/// One row of a table: column names in schema order, each bound to a value.
///
/// The name list is shared between every row materialized from the same table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(names: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    /// The value bound to column `name`, if the row has such a column.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.values[idx])
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(column name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names.iter().map(String::as_str).zip(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_binding() {
        let names: Arc<[String]> = Arc::from(vec!["id".to_string(), "name".to_string()]);
        let row = Row::new(names, vec![Value::Number(1), Value::string("bob")]);

        assert_eq!(row.get("name"), Some(&Value::string("bob")));
        assert_eq!(row.get("age"), None);
        assert_eq!(row.len(), 2);
        assert_eq!(
            row.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            vec!["id", "name"]
        );
        assert_eq!(
            row.into_values(),
            vec![Value::Number(1), Value::string("bob")]
        );
    }
}
