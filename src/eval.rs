//! Expression evaluation against a row binding.

use std::cmp::Ordering;

use crate::ast::{BinaryOperator, Expression, UnaryOperator};
use crate::data_type::TypeKind;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::schema::Schema;
use crate::value::Value;

/// Evaluates `expr` to a single value.
///
/// `row` binds column names to values; it is `None` where no row exists yet
/// (e.g. the VALUES list of an INSERT), in which case every identifier is
/// unknown. Both operands of a binary operation are always evaluated, left
/// first.
///
/// # Errors
/// - [Error::UnknownColumn] for an identifier missing from `row`.
/// - [Error::InvalidWildcardUse] for `*`, which has no scalar value.
/// - [Error::TypeMismatch], [Error::DivisionByZero], [Error::ArithmeticOverflow]
///   from the operators.
pub fn evaluate(expr: &Expression, row: Option<&Row>) -> Result<Value> {
    match expr {
        Expression::Identifier(name) => row
            .and_then(|row| row.get(name))
            .cloned()
            .ok_or_else(|| Error::UnknownColumn(name.clone())),
        Expression::Value(value) => Ok(value.clone()),
        Expression::Wildcard => Err(Error::InvalidWildcardUse),
        Expression::BinaryOperation { left, op, right } => {
            let left = evaluate(left, row)?;
            let right = evaluate(right, row)?;
            apply_binary(*op, left, right)
        }
        Expression::UnaryOperation { op, expr } => apply_unary(*op, evaluate(expr, row)?),
        Expression::Nested(expr) => evaluate(expr, row),
    }
}

/// Evaluates a WHERE clause, which must produce a boolean.
pub fn evaluate_predicate(expr: &Expression, row: Option<&Row>) -> Result<bool> {
    match evaluate(expr, row)? {
        Value::Bool(b) => Ok(b),
        other => Err(Error::TypeMismatch {
            expected: format!("{} condition in {expr}", TypeKind::Bool),
            found: format!("{} {other}", other.kind()),
        }),
    }
}

/// Structural checks run before any row is touched: `expr` must not contain a
/// wildcard and every identifier must name a column of `schema`.
pub fn validate_scalar(expr: &Expression, schema: &Schema) -> Result<()> {
    if expr.contains_wildcard() {
        return Err(Error::InvalidWildcardUse);
    }
    let mut unknown = None;
    expr.walk_identifiers(&mut |name| {
        if unknown.is_none() && schema.index_of(name).is_none() {
            unknown = Some(name.to_string());
        }
    });
    match unknown {
        Some(name) => Err(Error::UnknownColumn(name)),
        None => Ok(()),
    }
}

fn type_mismatch(op: BinaryOperator, expected: TypeKind, left: &Value, right: &Value) -> Error {
    Error::TypeMismatch {
        expected: format!("{expected} operands for {op}"),
        found: format!("{} {left} {op} {} {right}", left.kind(), right.kind()),
    }
}

fn apply_binary(op: BinaryOperator, left: Value, right: Value) -> Result<Value> {
    use BinaryOperator::*;

    if op.is_comparison() {
        if left.kind() != right.kind() {
            return Err(type_mismatch(op, left.kind(), &left, &right));
        }
        let ord = left.compare(&right)?;
        let result = match op {
            Eq => ord == Ordering::Equal,
            Neq => ord != Ordering::Equal,
            Lt => ord == Ordering::Less,
            LtEq => ord != Ordering::Greater,
            Gt => ord == Ordering::Greater,
            GtEq => ord != Ordering::Less,
            _ => unreachable!("{op} is not a comparison"),
        };
        return Ok(Value::Bool(result));
    }

    match (op, &left, &right) {
        (Plus | Minus | Mul | Div, Value::Number(l), Value::Number(r)) => {
            let (l, r) = (*l, *r);
            let result = match op {
                Plus => l.checked_add(r),
                Minus => l.checked_sub(r),
                Mul => l.checked_mul(r),
                Div if r == 0 => return Err(Error::DivisionByZero),
                // i64::MIN / -1
                Div => l.checked_div(r),
                _ => unreachable!("{op} is not arithmetic"),
            };
            result
                .map(Value::Number)
                .ok_or_else(|| Error::ArithmeticOverflow(format!("{l} {op} {r}")))
        }
        (And, Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(*l && *r)),
        (Or, Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(*l || *r)),
        _ if op.is_logical() => Err(type_mismatch(op, TypeKind::Bool, &left, &right)),
        _ => Err(type_mismatch(op, TypeKind::Int, &left, &right)),
    }
}

fn apply_unary(op: UnaryOperator, value: Value) -> Result<Value> {
    match (op, value) {
        (UnaryOperator::Plus, Value::Number(n)) => Ok(Value::Number(n)),
        (UnaryOperator::Minus, Value::Number(n)) => n
            .checked_neg()
            .map(Value::Number)
            .ok_or_else(|| Error::ArithmeticOverflow(format!("-{n}"))),
        (op, other) => Err(Error::TypeMismatch {
            expected: format!("{} operand for unary {op}", TypeKind::Int),
            found: format!("{} {other}", other.kind()),
        }),
    }
}
