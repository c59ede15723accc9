//! JSON row conversion shared by the store backends.
//!
//! Rows travel as JSON objects keyed by column name. Materialized
//! navigations are nested objects (references) or arrays (collections)
//! under the navigation name.

use quarry_core::result::AppResult;
use quarry_core::traits::Entity;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A decoded row.
pub type Row = Map<String, Value>;

/// Serialize `entity` to a row without its navigation properties.
pub fn to_row<T: Entity>(entity: &T) -> AppResult<Row> {
    let descriptor = T::descriptor();
    match serde_json::to_value(entity)? {
        Value::Object(mut row) => {
            for navigation in descriptor.navigations {
                row.remove(navigation.name);
            }
            Ok(row)
        }
        _ => Err(StoreError::NotAnObject {
            entity: descriptor.name,
        }
        .into()),
    }
}

/// Decode a row into an entity.
pub fn from_row<T: Entity>(row: Row) -> AppResult<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Decode a row that arrived as a JSON value.
pub fn from_value<T: Entity>(value: Value) -> AppResult<T> {
    Ok(serde_json::from_value(value)?)
}

/// Copy of `entity` with every navigation property reset to its default.
pub fn detach<T: Entity>(entity: &T) -> AppResult<T> {
    from_row(to_row(entity)?)
}
