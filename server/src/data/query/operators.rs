//! Filter operator normalization
//!
//! Clients may spell operators several ways (`gte`, `ge`, `>=`); all of
//! them normalize to one canonical operator before SQL generation.

use crate::api::types::ApiError;

/// Every accepted operator spelling, in the order reported to clients
pub const SUPPORTED_ALIASES: &[&str] = &[
    "eq",
    "ne",
    "gt",
    "gte",
    "ge",
    "lt",
    "lte",
    "le",
    "==",
    "!=",
    ">",
    ">=",
    "<",
    "<=",
    "like",
    "ilike",
    "in",
    "not_in",
    "is_null",
    "is_not_null",
];

/// Canonical filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Ilike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl FilterOp {
    /// Normalize an operator spelling (case-insensitive) to its canonical form
    pub fn parse(op: &str) -> Result<Self, ApiError> {
        match op.to_lowercase().as_str() {
            "eq" | "==" => Ok(Self::Eq),
            "ne" | "!=" => Ok(Self::Ne),
            "gt" | ">" => Ok(Self::Gt),
            "gte" | "ge" | ">=" => Ok(Self::Gte),
            "lt" | "<" => Ok(Self::Lt),
            "lte" | "le" | "<=" => Ok(Self::Lte),
            "like" => Ok(Self::Like),
            "ilike" => Ok(Self::Ilike),
            "in" => Ok(Self::In),
            "not_in" => Ok(Self::NotIn),
            "is_null" => Ok(Self::IsNull),
            "is_not_null" => Ok(Self::IsNotNull),
            _ => Err(ApiError::validation(format!(
                "Unsupported operator '{}'. Supported operators: {}",
                op,
                SUPPORTED_ALIASES.join(", ")
            ))),
        }
    }

    /// Canonical identifier for this operator
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "like",
            Self::Ilike => "ilike",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
        }
    }

    /// Operators that ignore any supplied value
    pub const fn is_unary(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Operators whose value is a comma-separated list
    pub const fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// SQL comparison symbol for plain binary operators
    pub(crate) const fn comparison_sql(&self) -> Option<&'static str> {
        match self {
            Self::Eq => Some("="),
            Self::Ne => Some("<>"),
            Self::Gt => Some(">"),
            Self::Gte => Some(">="),
            Self::Lt => Some("<"),
            Self::Lte => Some("<="),
            _ => None,
        }
    }
}
