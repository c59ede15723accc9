//! Filter expressions for criteria.
//!
//! A [`Filter`] is a small boolean expression tree over named entity
//! columns. It is plain data: the in-memory store evaluates it directly and
//! the PostgreSQL store translates it into a `WHERE` clause.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::value::FieldValue;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// SQL `LIKE` pattern match.
    Like,
    /// SQL `ILIKE` case-insensitive pattern match.
    ILike,
    /// SQL `IN` list membership.
    In,
    /// SQL `IS NULL` check.
    IsNull,
    /// SQL `IS NOT NULL` check.
    IsNotNull,
}

impl FilterOp {
    /// Whether the operator orders its operands (`=`, `<`, ...).
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Gt | Self::Gte | Self::Lt | Self::Lte
        )
    }
}

/// A single condition on a named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The operand. Ignored by `is_null` / `is_not_null`.
    #[serde(default = "null_value")]
    pub value: FieldValue,
}

fn null_value() -> FieldValue {
    FieldValue::Null
}

impl FilterField {
    /// Create a new condition.
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Check that the operand has the shape the operator needs.
    pub fn validate_operand(&self) -> AppResult<()> {
        match (self.op, &self.value) {
            (FilterOp::IsNull | FilterOp::IsNotNull, _) => Ok(()),
            (FilterOp::In, FieldValue::List(items)) => {
                if items
                    .iter()
                    .any(|item| matches!(item, FieldValue::List(_)))
                {
                    Err(AppError::invalid_argument(format!(
                        "Nested lists are not allowed in the operand of '{}'",
                        self.field
                    )))
                } else {
                    Ok(())
                }
            }
            (FilterOp::In, other) => Err(AppError::invalid_argument(format!(
                "Operator 'in' on '{}' needs a list, got {}",
                self.field,
                other.type_name()
            ))),
            (FilterOp::Like | FilterOp::ILike, FieldValue::Text(_)) => Ok(()),
            (FilterOp::Like | FilterOp::ILike, other) => Err(AppError::invalid_argument(format!(
                "Pattern match on '{}' needs a text pattern, got {}",
                self.field,
                other.type_name()
            ))),
            (op, FieldValue::Null) if op.is_comparison() => Err(AppError::invalid_argument(format!(
                "Comparison on '{}' against null never matches; use is_null",
                self.field
            ))),
            (op, FieldValue::List(_)) if op.is_comparison() => Err(AppError::invalid_argument(format!(
                "Comparison on '{}' needs a scalar operand",
                self.field
            ))),
            _ => Ok(()),
        }
    }
}

/// A boolean expression over entity columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// A single condition.
    Field(FilterField),
    /// All sub-filters must match. An empty list matches everything.
    And(Vec<Filter>),
    /// At least one sub-filter must match. An empty list matches nothing.
    Or(Vec<Filter>),
    /// Negation.
    Not(Box<Filter>),
}

impl Filter {
    /// Create a condition filter.
    pub fn field(field: impl Into<String>, op: FilterOp, value: impl Into<FieldValue>) -> Self {
        Self::Field(FilterField::new(field, op, value))
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::field(field, FilterOp::Eq, value)
    }

    /// Shorthand for a case-insensitive pattern filter.
    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::field(field, FilterOp::ILike, FieldValue::Text(pattern.into()))
    }

    /// Combine with `other`; both must match.
    pub fn and(self, other: Filter) -> Self {
        match self {
            Self::And(mut items) => {
                items.push(other);
                Self::And(items)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Combine with `other`; either may match.
    pub fn or(self, other: Filter) -> Self {
        match self {
            Self::Or(mut items) => {
                items.push(other);
                Self::Or(items)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    /// Negate this filter.
    pub fn negate(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// Visit every condition in the tree, depth first.
    pub fn conditions(&self) -> Vec<&FilterField> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a FilterField>) {
        match self {
            Self::Field(condition) => out.push(condition),
            Self::And(items) | Self::Or(items) => {
                for item in items {
                    item.collect_conditions(out);
                }
            }
            Self::Not(inner) => inner.collect_conditions(out),
        }
    }
}
