//! Dynamic column values read from entities and compared by filters.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::id::EntityId;

/// A column value of an entity, or an operand of a filter condition.
///
/// `List` only appears as the operand of an `in` condition. Serialized as
/// `{"type": "text", "value": "..."}` so every variant reads back as itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// SQL `NULL` / absent value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// A string value.
    Text(String),
    /// A list of values (for the `in` operator).
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Whether this is the `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Timestamp(_) => "timestamp",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }

    /// Compare two scalar values.
    ///
    /// Returns `Ok(None)` when either side is null (the comparison is
    /// unknown). Integers and floats compare numerically; text compares
    /// against a timestamp after RFC 3339 parsing. Any other pairing is an
    /// invalid argument.
    pub fn compare(&self, other: &FieldValue) -> AppResult<Option<Ordering>> {
        use FieldValue::*;

        match (self, other) {
            (Null, _) | (_, Null) => Ok(None),
            (Bool(a), Bool(b)) => Ok(Some(a.cmp(b))),
            (Integer(a), Integer(b)) => Ok(Some(a.cmp(b))),
            (Integer(a), Float(b)) => Ok((*a as f64).partial_cmp(b)),
            (Float(a), Integer(b)) => Ok(a.partial_cmp(&(*b as f64))),
            (Float(a), Float(b)) => Ok(a.partial_cmp(b)),
            (Text(a), Text(b)) => Ok(Some(a.cmp(b))),
            (Timestamp(a), Timestamp(b)) => Ok(Some(a.cmp(b))),
            (Timestamp(a), Text(b)) => Ok(Some(a.cmp(&parse_timestamp(b)?))),
            (Text(a), Timestamp(b)) => Ok(Some(parse_timestamp(a)?.cmp(b))),
            _ => Err(AppError::invalid_argument(format!(
                "Cannot compare {} with {}",
                self.type_name(),
                other.type_name()
            ))),
        }
    }
}

fn parse_timestamp(text: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::invalid_argument(format!("'{text}' is not a timestamp: {e}")))
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<EntityId> for FieldValue {
    fn from(value: EntityId) -> Self {
        Self::Integer(value.0)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::TimeZone;

    #[test]
    fn test_null_comparisons_are_unknown() {
        assert_eq!(FieldValue::Null.compare(&FieldValue::Integer(1)).unwrap(), None);
        assert_eq!(FieldValue::Text("a".into()).compare(&FieldValue::Null).unwrap(), None);
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        let ord = FieldValue::Integer(3).compare(&FieldValue::Float(2.5)).unwrap();
        assert_eq!(ord, Some(Ordering::Greater));
    }

    #[test]
    fn test_timestamp_against_rfc3339_text() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ord = FieldValue::Timestamp(ts)
            .compare(&FieldValue::Text("2024-06-01T00:00:00Z".into()))
            .unwrap();
        assert_eq!(ord, Some(Ordering::Less));
    }

    #[test]
    fn test_incompatible_types() {
        let err = FieldValue::Text("7".into())
            .compare(&FieldValue::Integer(7))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_serde_keeps_variants_apart() {
        let text = FieldValue::Text("2024-03-01T00:00:00Z".into());
        let json = serde_json::to_value(&text).expect("serialize");
        assert_eq!(json, serde_json::json!({"type": "text", "value": "2024-03-01T00:00:00Z"}));
        assert_eq!(serde_json::from_value::<FieldValue>(json).expect("deserialize"), text);

        let ts = FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let json = serde_json::to_string(&ts).expect("serialize");
        assert_eq!(serde_json::from_str::<FieldValue>(&json).expect("deserialize"), ts);

        let null = serde_json::to_value(FieldValue::Null).expect("serialize");
        assert_eq!(null, serde_json::json!({"type": "null"}));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("x")), FieldValue::Text("x".into()));
    }
}
