//! Statement and expression trees handed to the executor by the parser.
//!
//! Every node renders back to SQL through [std::fmt::Display].

use std::fmt;

use crate::schema::Column;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Neq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Mul,
    Div,
    And,
    Or,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Neq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Plus | Self::Minus | Self::Mul | Self::Div)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::And => "AND",
            Self::Or => "OR",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
        }
    }
}

/// An expression tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A column reference.
    Identifier(String),
    /// A literal.
    Value(Value),
    /// `*`, only meaningful as a SELECT projection.
    Wildcard,
    BinaryOperation {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    UnaryOperation {
        op: UnaryOperator,
        expr: Box<Expression>,
    },
    /// A parenthesized expression.
    Nested(Box<Expression>),
}

impl Expression {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    pub fn value(value: Value) -> Self {
        Self::Value(value)
    }

    pub fn number(n: i64) -> Self {
        Self::Value(Value::Number(n))
    }

    pub fn string(s: &str) -> Self {
        Self::Value(Value::string(s))
    }

    pub fn boolean(b: bool) -> Self {
        Self::Value(Value::Bool(b))
    }

    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Self::BinaryOperation {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, expr: Expression) -> Self {
        Self::UnaryOperation {
            op,
            expr: Box::new(expr),
        }
    }

    pub fn nested(expr: Expression) -> Self {
        Self::Nested(Box::new(expr))
    }

    /// `self = other`
    pub fn equals(self, other: Expression) -> Self {
        Self::binary(self, BinaryOperator::Eq, other)
    }

    /// Calls `f` on every identifier in the tree, left to right.
    pub fn walk_identifiers<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Self::Identifier(name) => f(name),
            Self::Value(_) | Self::Wildcard => {}
            Self::BinaryOperation { left, right, .. } => {
                left.walk_identifiers(f);
                right.walk_identifiers(f);
            }
            Self::UnaryOperation { expr, .. } | Self::Nested(expr) => expr.walk_identifiers(f),
        }
    }

    /// Returns `true` if a [Expression::Wildcard] appears anywhere in the tree.
    pub fn contains_wildcard(&self) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Identifier(_) | Self::Value(_) => false,
            Self::BinaryOperation { left, right, .. } => {
                left.contains_wildcard() || right.contains_wildcard()
            }
            Self::UnaryOperation { expr, .. } | Self::Nested(expr) => expr.contains_wildcard(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(name) => f.write_str(name),
            Self::Value(value) => write!(f, "{value}"),
            Self::Wildcard => f.write_str("*"),
            Self::BinaryOperation { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::UnaryOperation { op, expr } => write!(f, "{op}{expr}"),
            Self::Nested(expr) => write!(f, "({expr})"),
        }
    }
}

/// `column = expression` inside an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub identifier: String,
    pub value: Expression,
}

impl Assignment {
    pub fn new(identifier: impl Into<String>, value: Expression) -> Self {
        Self {
            identifier: identifier.into(),
            value,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.identifier, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expr: Expression,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(expr: Expression) -> Self {
        Self {
            expr,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(expr: Expression) -> Self {
        Self {
            expr,
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => write!(f, "{}", self.expr),
            SortDirection::Desc => write!(f, "{} DESC", self.expr),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Create(CreateTable),
    Select(Select),
    Delete(Delete),
    Update(Update),
    Insert(InsertInto),
    Drop(DropTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Create,
    Select,
    Delete,
    Update,
    Insert,
    Drop,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::Create => "CREATE",
            Self::Select => "SELECT",
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::Insert => "INSERT",
            Self::Drop => "DROP",
        };
        f.write_str(keyword)
    }
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Self::Create(_) => StatementKind::Create,
            Self::Select(_) => StatementKind::Select,
            Self::Delete(_) => StatementKind::Delete,
            Self::Update(_) => StatementKind::Update,
            Self::Insert(_) => StatementKind::Insert,
            Self::Drop(_) => StatementKind::Drop,
        }
    }

    /// Name of the table the statement works on.
    pub fn table(&self) -> &str {
        match self {
            Self::Create(s) => &s.name,
            Self::Select(s) => &s.from,
            Self::Delete(s) => &s.from,
            Self::Update(s) => &s.table,
            Self::Insert(s) => &s.into,
            Self::Drop(s) => &s.name,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(s) => write!(f, "{s}"),
            Self::Select(s) => write!(f, "{s}"),
            Self::Delete(s) => write!(f, "{s}"),
            Self::Update(s) => write!(f, "{s}"),
            Self::Insert(s) => write!(f, "{s}"),
            Self::Drop(s) => write!(f, "{s}"),
        }
    }
}

/// Writes `items` separated by `", "`.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<Column>,
}

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE TABLE {} (", self.name)?;
        write_list(f, &self.columns)?;
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: Vec<Expression>,
    pub from: String,
    pub where_clause: Option<Expression>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<usize>,
}

impl Select {
    /// `SELECT <columns> FROM <from>` without filter, ordering or limit.
    pub fn new(columns: Vec<Expression>, from: impl Into<String>) -> Self {
        Self {
            columns,
            from: from.into(),
            where_clause: None,
            order_by: vec![],
            limit: None,
        }
    }

    pub fn filter(mut self, where_clause: Expression) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        write_list(f, &self.columns)?;
        write!(f, " FROM {}", self.from)?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            write_list(f, &self.order_by)?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub from: String,
    pub where_clause: Option<Expression>,
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.from)?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expression>,
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET ", self.table)?;
        write_list(f, &self.assignments)?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertInto {
    pub into: String,
    /// Target columns; empty means every column in schema order.
    pub columns: Vec<String>,
    pub values: Vec<Expression>,
}

impl fmt::Display for InsertInto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {} ", self.into)?;
        if !self.columns.is_empty() {
            f.write_str("(")?;
            write_list(f, &self.columns)?;
            f.write_str(") ")?;
        }
        f.write_str("VALUES (")?;
        write_list(f, &self.values)?;
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub name: String,
}

impl fmt::Display for DropTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP TABLE {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;

    #[test]
    fn test_expression_display() {
        let expr = Expression::binary(
            Expression::nested(Expression::binary(
                Expression::ident("a"),
                BinaryOperator::Plus,
                Expression::number(1),
            )),
            BinaryOperator::Mul,
            Expression::unary(UnaryOperator::Minus, Expression::ident("b")),
        );
        assert_eq!(expr.to_string(), "(a + 1) * -b");
    }

    #[test]
    fn test_walk_identifiers() {
        let expr = Expression::binary(
            Expression::ident("a").equals(Expression::number(1)),
            BinaryOperator::And,
            Expression::nested(Expression::unary(UnaryOperator::Minus, Expression::ident("b"))),
        );
        let mut names = vec![];
        expr.walk_identifiers(&mut |name| names.push(name));
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_contains_wildcard() {
        assert!(Expression::Wildcard.contains_wildcard());
        assert!(
            Expression::nested(Expression::binary(
                Expression::number(1),
                BinaryOperator::Plus,
                Expression::Wildcard
            ))
            .contains_wildcard()
        );
        assert!(!Expression::ident("a").contains_wildcard());
    }

    #[test]
    fn test_create_display() {
        let stmt = Statement::Create(CreateTable {
            name: "users".into(),
            columns: vec![
                Column::primary_key("id", DataType::Int),
                Column::new("name", DataType::Varchar(10)),
            ],
        });
        assert_eq!(
            stmt.to_string(),
            "CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(10))"
        );
        assert_eq!(stmt.kind(), StatementKind::Create);
        assert_eq!(stmt.table(), "users");
    }

    #[test]
    fn test_select_display() {
        let select = Select::new(vec![Expression::ident("name")], "users")
            .filter(Expression::ident("id").equals(Expression::number(1)))
            .order_by(OrderBy::desc(Expression::ident("name")))
            .order_by(OrderBy::asc(Expression::ident("id")))
            .limit(2);
        assert_eq!(
            Statement::Select(select).to_string(),
            "SELECT name FROM users WHERE id = 1 ORDER BY name DESC, id LIMIT 2"
        );
    }

    #[test]
    fn test_mutation_display() {
        let insert = Statement::Insert(InsertInto {
            into: "users".into(),
            columns: vec!["id".into(), "name".into()],
            values: vec![Expression::number(1), Expression::string("bob")],
        });
        assert_eq!(
            insert.to_string(),
            "INSERT INTO users (id, name) VALUES (1, \"bob\")"
        );

        let update = Statement::Update(Update {
            table: "users".into(),
            assignments: vec![Assignment::new("name", Expression::string("alice"))],
            where_clause: Some(Expression::ident("id").equals(Expression::number(1))),
        });
        assert_eq!(
            update.to_string(),
            "UPDATE users SET name = \"alice\" WHERE id = 1"
        );

        let delete = Statement::Delete(Delete {
            from: "users".into(),
            where_clause: None,
        });
        assert_eq!(delete.to_string(), "DELETE FROM users");

        let drop = Statement::Drop(DropTable {
            name: "users".into(),
        });
        assert_eq!(drop.to_string(), "DROP TABLE users");
        assert_eq!(drop.kind().to_string(), "DROP");
    }
}
