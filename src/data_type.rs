use std::fmt;

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and the expected format of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A 64-bit signed integer.
    Int,
    /// A boolean value (true or false).
    Bool,
    /// A UTF-8 character string holding at most `size` characters.
    Varchar(usize),
}

/// The kind of a [DataType], without the size parameter of `Varchar`.
///
/// Every [crate::Value] has exactly one kind; two values can only be compared
/// when their kinds match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Int,
    Bool,
    Varchar,
}

impl DataType {
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Int => TypeKind::Int,
            Self::Bool => TypeKind::Bool,
            Self::Varchar(_) => TypeKind::Varchar,
        }
    }

    /// Maximum length in characters, only set for `Varchar`.
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Varchar(size) => Some(*size),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "INT"),
            Self::Bool => write!(f, "BOOL"),
            Self::Varchar(size) => write!(f, "VARCHAR({size})"),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "INT"),
            Self::Bool => write!(f, "BOOL"),
            Self::Varchar => write!(f, "VARCHAR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ignores_size() {
        assert_eq!(DataType::Varchar(10).kind(), TypeKind::Varchar);
        assert_eq!(DataType::Varchar(255).kind(), DataType::Varchar(1).kind());
        assert_eq!(DataType::Int.kind(), TypeKind::Int);
        assert_eq!(DataType::Bool.kind(), TypeKind::Bool);
    }

    #[test]
    fn test_size() {
        assert_eq!(DataType::Varchar(50).size(), Some(50));
        assert_eq!(DataType::Int.size(), None);
        assert_eq!(DataType::Bool.size(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(DataType::Int.to_string(), "INT");
        assert_eq!(DataType::Bool.to_string(), "BOOL");
        assert_eq!(DataType::Varchar(100).to_string(), "VARCHAR(100)");
        assert_eq!(TypeKind::Varchar.to_string(), "VARCHAR");
    }
}
