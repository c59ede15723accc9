//! Specification evaluation.
//!
//! Composes a base [`Query`] with the rules of a [`Specification`] without
//! touching a store. The result is validated against the entity descriptor
//! so malformed specifications fail before any I/O happens.

use crate::error::AppError;
use crate::result::AppResult;
use crate::specification::Specification;
use crate::traits::entity::Entity;
use crate::types::sorting::SortField;

use super::Query;

/// Compose `base` with the criteria, includes, ordering and paging of `spec`.
///
/// - Criteria are ANDed onto the base filter.
/// - Typed includes are applied first, then dotted include paths.
/// - An ascending key takes precedence over a descending one.
/// - Paging applies only when enabled, after filtering and ordering. A
///   non-positive `take` yields an empty window.
///
/// Fails with `InvalidArgument` when `skip` is negative, when a column or
/// navigation does not exist on `T`, or when criteria or ordering would be
/// applied on top of a base query that is already windowed.
pub fn get_query<T: Entity>(base: Query<T>, spec: &Specification<T>) -> AppResult<Query<T>> {
    check_skip(spec)?;

    let ordering = ordering(spec);
    if base.is_windowed() && (spec.criteria().is_some() || ordering.is_some()) {
        return Err(AppError::invalid_argument(format!(
            "Cannot filter or order '{}' after a row window has been applied",
            T::descriptor().name
        )));
    }

    let mut query = base;

    if let Some(criteria) = spec.criteria() {
        query = query.filter(criteria.clone());
    }

    for navigation in spec.includes() {
        query = query.include(navigation.name());
    }
    for path in spec.include_strings() {
        query = query.include(path.as_str());
    }

    if let Some(key) = ordering {
        query = query.order_by(key);
    }

    if spec.is_paging_enabled() {
        // skip is non-negative here; a non-positive take asks for no rows.
        let skip = spec.skip().unsigned_abs();
        let take = u64::try_from(spec.take()).unwrap_or(0);
        query = query.skip(skip).take(take);
    }

    query.validate()?;
    Ok(query)
}

/// Compose the cardinality query of `spec`: its criteria only.
///
/// Includes, ordering and paging never change how many rows match, so they
/// are dropped. A windowed base stays windowed.
pub fn count_query<T: Entity>(base: Query<T>, spec: &Specification<T>) -> AppResult<Query<T>> {
    check_skip(spec)?;

    if base.is_windowed() && spec.criteria().is_some() {
        return Err(AppError::invalid_argument(format!(
            "Cannot filter '{}' after a row window has been applied",
            T::descriptor().name
        )));
    }

    let windowed = base.is_windowed();
    let mut query = if windowed { base } else { base.cardinality() };
    if let Some(criteria) = spec.criteria() {
        query = query.filter(criteria.clone());
    }

    query.validate()?;
    Ok(query)
}

fn check_skip<T>(spec: &Specification<T>) -> AppResult<()> {
    if spec.skip() < 0 {
        return Err(AppError::invalid_argument(format!(
            "skip must not be negative, got {}",
            spec.skip()
        )));
    }
    Ok(())
}

fn ordering<T>(spec: &Specification<T>) -> Option<SortField> {
    match (spec.ascending_key(), spec.descending_key()) {
        (Some(key), _) => Some(key.asc()),
        (None, Some(key)) => Some(key.desc()),
        (None, None) => None,
    }
}
