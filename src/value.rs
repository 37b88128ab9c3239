use std::{cmp::Ordering, fmt, sync::Arc};

use crate::data_type::{DataType, TypeKind};
use crate::error::{Error, Result};

/// Represents a single data value stored in the database.
///
/// This enum wraps all supported Rust types into a single type that can be
/// passed around the engine. Values are immutable once built; every cell of a
/// [crate::Table] and every result of an evaluated expression is a `Value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A UTF-8 string value, wrapped in an [Arc] for efficient,
    /// thread-safe sharing and cheap cloning.
    String(Arc<str>),
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer value.
    Number(i64),
}

impl Value {
    /// Builds a [Value::String] from anything string-like.
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    /// Returns the inner integer value if this is a [Value::Number].
    /// Otherwise, returns `None`.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::String].
    /// Otherwise, returns `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner boolean value if this is a [Value::Bool].
    /// Otherwise, returns `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the [TypeKind] of this value: strings are `Varchar`, booleans
    /// `Bool` and numbers `Int`.
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::String(_) => TypeKind::Varchar,
            Self::Bool(_) => TypeKind::Bool,
            Self::Number(_) => TypeKind::Int,
        }
    }

    /// Returns `true` if this value may be stored in a column of type `data_type`.
    ///
    /// The kinds must match and a string must not hold more characters than
    /// the declared `Varchar` size.
    pub fn conforms(&self, data_type: &DataType) -> bool {
        match (self, data_type) {
            (Self::String(s), DataType::Varchar(size)) => s.chars().count() <= *size,
            (Self::Bool(_), DataType::Bool) | (Self::Number(_), DataType::Int) => true,
            _ => false,
        }
    }

    /// Compares two values of the same kind.
    ///
    /// Numbers use signed integer order, strings byte-wise lexicographic order
    /// and booleans order `false` before `true`.
    ///
    /// # Errors
    /// Returns [Error::TypeMismatch] when the kinds differ.
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            (Self::Number(l), Self::Number(r)) => Ok(l.cmp(r)),
            (Self::String(l), Self::String(r)) => Ok(l.as_bytes().cmp(r.as_bytes())),
            (Self::Bool(l), Self::Bool(r)) => Ok(l.cmp(r)),
            _ => Err(Error::TypeMismatch {
                expected: self.kind().to_string(),
                found: format!("{} {other}", other.kind()),
            }),
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value as a SQL literal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────
    // Test 1 : accessors
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_accessors() {
        assert_eq!(Value::Number(42).as_number(), Some(42));
        assert_eq!(Value::Bool(true).as_number(), None);
        assert_eq!(Value::string("42").as_number(), None);

        assert_eq!(Value::string("hello").as_str(), Some("hello"));
        assert_eq!(Value::Number(1).as_str(), None);

        assert_eq!(Value::Bool(false).as_bool(), Some(false));
        assert_eq!(Value::string("true").as_bool(), None);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 2 : kind
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_kind() {
        assert_eq!(Value::string("x").kind(), TypeKind::Varchar);
        assert_eq!(Value::Bool(true).kind(), TypeKind::Bool);
        assert_eq!(Value::Number(1).kind(), TypeKind::Int);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 3 : conforms
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_conforms() {
        assert!(Value::Number(7).conforms(&DataType::Int));
        assert!(Value::Bool(true).conforms(&DataType::Bool));
        assert!(Value::string("bob").conforms(&DataType::Varchar(3)));
        assert!(Value::string("").conforms(&DataType::Varchar(1)));

        // too long
        assert!(!Value::string("alice").conforms(&DataType::Varchar(4)));
        // kind mismatch
        assert!(!Value::Number(7).conforms(&DataType::Bool));
        assert!(!Value::string("7").conforms(&DataType::Int));
        assert!(!Value::Bool(false).conforms(&DataType::Varchar(10)));
    }

    #[test]
    fn test_conforms_counts_chars_not_bytes() {
        // 4 chars, 8 bytes
        assert!(Value::string("élan").conforms(&DataType::Varchar(4)));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 4 : ordering
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_compare_same_kind() {
        assert_eq!(
            Value::Number(-3).compare(&Value::Number(2)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Value::string("b").compare(&Value::string("a")).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Value::string("B").compare(&Value::string("a")).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Value::Bool(false).compare(&Value::Bool(true)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Value::Bool(true).compare(&Value::Bool(true)).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_cross_kind_fails() {
        let err = Value::Number(1).compare(&Value::string("1")).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));

        let err = Value::Bool(true).compare(&Value::Number(1)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 5 : display
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_display() {
        assert_eq!(Value::Number(-12).to_string(), "-12");
        assert_eq!(Value::Bool(true).to_string(), "TRUE");
        assert_eq!(Value::string("bob").to_string(), "\"bob\"");
        assert_eq!(Value::string("say \"hi\"").to_string(), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_clone_shares_string() {
        let v1 = Value::string("hello");
        let v2 = v1.clone();

        assert_eq!(v1, v2);
        if let (Value::String(a), Value::String(b)) = (&v1, &v2) {
            assert!(Arc::ptr_eq(a, b));
        }
    }
}
