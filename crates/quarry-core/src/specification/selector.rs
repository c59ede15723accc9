//! Typed column and navigation selectors.
//!
//! Selectors are declared as associated constants on entity types
//! (`Order::STATUS`, `Order::ITEMS`) so a specification for one entity type
//! cannot name a column or navigation of another.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::filter::{Filter, FilterOp};
use crate::types::sorting::SortField;
use crate::types::value::FieldValue;

/// A column of entity type `T`.
pub struct Field<T> {
    name: Cow<'static, str>,
    entity: PhantomData<fn() -> T>,
}

impl<T> Field<T> {
    /// Declare a column selector.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            entity: PhantomData,
        }
    }

    /// Select a column by a runtime name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            entity: PhantomData,
        }
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn condition(&self, op: FilterOp, value: impl Into<FieldValue>) -> Filter {
        Filter::field(self.name.clone().into_owned(), op, value)
    }

    /// `column = value`
    pub fn eq(&self, value: impl Into<FieldValue>) -> Filter {
        self.condition(FilterOp::Eq, value)
    }

    /// `column <> value`
    pub fn ne(&self, value: impl Into<FieldValue>) -> Filter {
        self.condition(FilterOp::Ne, value)
    }

    /// `column > value`
    pub fn gt(&self, value: impl Into<FieldValue>) -> Filter {
        self.condition(FilterOp::Gt, value)
    }

    /// `column >= value`
    pub fn gte(&self, value: impl Into<FieldValue>) -> Filter {
        self.condition(FilterOp::Gte, value)
    }

    /// `column < value`
    pub fn lt(&self, value: impl Into<FieldValue>) -> Filter {
        self.condition(FilterOp::Lt, value)
    }

    /// `column <= value`
    pub fn lte(&self, value: impl Into<FieldValue>) -> Filter {
        self.condition(FilterOp::Lte, value)
    }

    /// `column LIKE pattern`
    pub fn like(&self, pattern: impl Into<String>) -> Filter {
        self.condition(FilterOp::Like, FieldValue::Text(pattern.into()))
    }

    /// `column ILIKE pattern`
    pub fn ilike(&self, pattern: impl Into<String>) -> Filter {
        self.condition(FilterOp::ILike, FieldValue::Text(pattern.into()))
    }

    /// `column IN (values...)`
    pub fn is_in<V: Into<FieldValue>>(&self, values: impl IntoIterator<Item = V>) -> Filter {
        let values = values.into_iter().map(Into::into).collect();
        self.condition(FilterOp::In, FieldValue::List(values))
    }

    /// `column IS NULL`
    pub fn is_null(&self) -> Filter {
        self.condition(FilterOp::IsNull, FieldValue::Null)
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(&self) -> Filter {
        self.condition(FilterOp::IsNotNull, FieldValue::Null)
    }

    /// Ascending sort key on this column.
    pub fn asc(&self) -> SortField {
        SortField::asc(self.name())
    }

    /// Descending sort key on this column.
    pub fn desc(&self) -> SortField {
        SortField::desc(self.name())
    }
}

/// A navigation property of entity type `T`.
pub struct Navigation<T> {
    name: Cow<'static, str>,
    entity: PhantomData<fn() -> T>,
}

impl<T> Navigation<T> {
    /// Declare a navigation selector.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            entity: PhantomData,
        }
    }

    /// The navigation name; the first segment of an include path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extend this navigation into a nested include path.
    pub fn then(&self, nested: &str) -> String {
        format!("{}.{}", self.name, nested)
    }
}

macro_rules! selector_impls {
    ($selector:ident, $label:literal) => {
        impl<T> Clone for $selector<T> {
            fn clone(&self) -> Self {
                Self {
                    name: self.name.clone(),
                    entity: PhantomData,
                }
            }
        }

        impl<T> PartialEq for $selector<T> {
            fn eq(&self, other: &Self) -> bool {
                self.name == other.name
            }
        }

        impl<T> Eq for $selector<T> {}

        impl<T> fmt::Debug for $selector<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.name)
            }
        }

        impl<T> Serialize for $selector<T> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.name)
            }
        }

        impl<'de, T> Deserialize<'de> for $selector<T> {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                Ok(Self {
                    name: Cow::Owned(name),
                    entity: PhantomData,
                })
            }
        }
    };
}

selector_impls!(Field, "Field");
selector_impls!(Navigation, "Navigation");
