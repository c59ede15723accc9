//! SQL generation for PostgreSQL.
//!
//! Every value reaches the server as a bound parameter; identifiers come
//! from entity descriptors and are always quoted. Rows are selected as a
//! single `jsonb` value so one decoding path serves every entity type and
//! any depth of included navigations.

use quarry_core::error::AppError;
use quarry_core::query::{IncludeNode, IncludeTree, Query};
use quarry_core::result::AppResult;
use quarry_core::traits::{Entity, EntityDescriptor, KEY_COLUMN, NavigationKind};
use quarry_core::types::{EntityId, FieldValue, Filter, FilterField, FilterOp};
use sqlx::{Postgres, QueryBuilder};

use crate::error::StoreError;

/// Alias of the root table in every statement.
const ROOT: &str = "t0";

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal, doubling embedded single quotes.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `SELECT <row json> AS row FROM ...` for a composed query.
pub fn select<T: Entity>(query: &Query<T>) -> AppResult<QueryBuilder<'static, Postgres>> {
    let descriptor = T::descriptor();
    let tree = IncludeTree::resolve(descriptor, query.includes())?;

    let mut builder = QueryBuilder::new("SELECT ");
    let mut aliases = 1;
    push_row_object(&mut builder, ROOT, &tree.nodes, &mut aliases);
    builder.push(" AS row");
    push_body(&mut builder, descriptor, query)?;
    Ok(builder)
}

/// `SELECT COUNT(*)` over the rows a composed query would return.
pub fn count<T: Entity>(query: &Query<T>) -> AppResult<QueryBuilder<'static, Postgres>> {
    let descriptor = T::descriptor();
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
    if query.is_windowed() {
        builder.push("(SELECT 1");
        push_body(&mut builder, descriptor, query)?;
        builder.push(") AS windowed");
    } else {
        builder.push(format!("{} AS {ROOT}", quote_ident(descriptor.name)));
        push_where(&mut builder, query)?;
    }
    Ok(builder)
}

/// `FROM`, `WHERE`, `ORDER BY` and the window of a select.
fn push_body<T: Entity>(
    builder: &mut QueryBuilder<'static, Postgres>,
    descriptor: &EntityDescriptor,
    query: &Query<T>,
) -> AppResult<()> {
    builder.push(format!(" FROM {} AS {ROOT}", quote_ident(descriptor.name)));
    push_where(builder, query)?;

    // The key breaks ties so windows are stable across calls.
    builder.push(" ORDER BY ");
    if let Some(order) = query.order() {
        builder.push(format!(
            "{ROOT}.{} {}, ",
            quote_ident(&order.field),
            order.direction.as_sql()
        ));
    }
    builder.push(format!("{ROOT}.{} ASC", quote_ident(KEY_COLUMN)));

    if let Some(window) = query.window() {
        if let Some(take) = window.take {
            builder.push(" LIMIT ");
            builder.push_bind(i64::try_from(take).unwrap_or(i64::MAX));
        }
        if window.skip > 0 {
            builder.push(" OFFSET ");
            builder.push_bind(i64::try_from(window.skip).unwrap_or(i64::MAX));
        }
    }
    Ok(())
}

fn push_where<T: Entity>(builder: &mut QueryBuilder<'static, Postgres>, query: &Query<T>) -> AppResult<()> {
    if let Some(filter) = query.filter_expr() {
        builder.push(" WHERE ");
        push_filter(builder, ROOT, filter)?;
    }
    Ok(())
}

/// Translate a filter tree into a boolean SQL expression over `alias`.
pub fn push_filter(
    builder: &mut QueryBuilder<'static, Postgres>,
    alias: &str,
    filter: &Filter,
) -> AppResult<()> {
    match filter {
        Filter::Field(condition) => push_condition(builder, alias, condition)?,
        Filter::And(items) => push_junction(builder, alias, items, " AND ", "TRUE")?,
        Filter::Or(items) => push_junction(builder, alias, items, " OR ", "FALSE")?,
        Filter::Not(inner) => {
            builder.push("NOT (");
            push_filter(builder, alias, inner)?;
            builder.push(")");
        }
    }
    Ok(())
}

fn push_junction(
    builder: &mut QueryBuilder<'static, Postgres>,
    alias: &str,
    items: &[Filter],
    separator: &str,
    empty: &str,
) -> AppResult<()> {
    if items.is_empty() {
        builder.push(empty);
        return Ok(());
    }
    builder.push("(");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        push_filter(builder, alias, item)?;
    }
    builder.push(")");
    Ok(())
}

fn push_condition(
    builder: &mut QueryBuilder<'static, Postgres>,
    alias: &str,
    condition: &FilterField,
) -> AppResult<()> {
    let column = format!("{alias}.{}", quote_ident(&condition.field));
    let operator = match condition.op {
        FilterOp::IsNull => {
            builder.push(format!("{column} IS NULL"));
            return Ok(());
        }
        FilterOp::IsNotNull => {
            builder.push(format!("{column} IS NOT NULL"));
            return Ok(());
        }
        FilterOp::In => {
            let FieldValue::List(values) = &condition.value else {
                return Err(StoreError::ListValue {
                    column: condition.field.clone(),
                }
                .into());
            };
            if values.is_empty() {
                builder.push("FALSE");
                return Ok(());
            }
            builder.push(format!("{column} IN ("));
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                push_value(builder, &condition.field, value)?;
            }
            builder.push(")");
            return Ok(());
        }
        FilterOp::Eq => "=",
        FilterOp::Ne => "<>",
        FilterOp::Gt => ">",
        FilterOp::Gte => ">=",
        FilterOp::Lt => "<",
        FilterOp::Lte => "<=",
        FilterOp::Like => "LIKE",
        FilterOp::ILike => "ILIKE",
    };
    builder.push(format!("{column} {operator} "));
    push_value(builder, &condition.field, &condition.value)
}

/// Bind one scalar value. `Null` is written as the `NULL` literal so it
/// needs no parameter type.
pub fn push_value(
    builder: &mut QueryBuilder<'static, Postgres>,
    column: &str,
    value: &FieldValue,
) -> AppResult<()> {
    match value {
        FieldValue::Null => {
            builder.push("NULL");
        }
        FieldValue::Bool(v) => {
            builder.push_bind(*v);
        }
        FieldValue::Integer(v) => {
            builder.push_bind(*v);
        }
        FieldValue::Float(v) => {
            builder.push_bind(*v);
        }
        FieldValue::Timestamp(v) => {
            builder.push_bind(*v);
        }
        FieldValue::Text(v) => {
            builder.push_bind(v.clone());
        }
        FieldValue::List(_) => {
            return Err(StoreError::ListValue {
                column: column.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Row object for `alias` with its included navigations nested in.
fn push_row_object(
    builder: &mut QueryBuilder<'static, Postgres>,
    alias: &str,
    nodes: &[IncludeNode],
    aliases: &mut usize,
) {
    if nodes.is_empty() {
        builder.push(format!("to_jsonb({alias})"));
        return;
    }

    builder.push(format!("(to_jsonb({alias}) || jsonb_build_object("));
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        let navigation = node.navigation;
        let target = navigation.target();
        let child = format!("t{aliases}");
        *aliases += 1;

        builder.push(format!("{}, (SELECT ", quote_literal(navigation.name)));
        match navigation.kind {
            NavigationKind::Collection => {
                builder.push("COALESCE(jsonb_agg(");
                push_row_object(builder, &child, &node.children, aliases);
                builder.push(format!(
                    " ORDER BY {child}.{key}), '[]'::jsonb) FROM {table} AS {child} WHERE {child}.{fk} = {alias}.{key}",
                    key = quote_ident(KEY_COLUMN),
                    table = quote_ident(target.name),
                    fk = quote_ident(navigation.foreign_key),
                ));
            }
            NavigationKind::Reference => {
                push_row_object(builder, &child, &node.children, aliases);
                builder.push(format!(
                    " FROM {table} AS {child} WHERE {child}.{key} = {alias}.{fk}",
                    key = quote_ident(KEY_COLUMN),
                    table = quote_ident(target.name),
                    fk = quote_ident(navigation.foreign_key),
                ));
            }
        }
        builder.push(")");
    }
    builder.push("))");
}

/// `INSERT ... RETURNING "id"` for one entity. A transient identity is left
/// to the column default.
pub fn insert<T: Entity>(entity: &T) -> AppResult<QueryBuilder<'static, Postgres>> {
    let descriptor = T::descriptor();
    let mut columns: Vec<&str> = Vec::with_capacity(descriptor.columns.len() + 1);
    if !entity.id().is_transient() {
        columns.push(KEY_COLUMN);
    }
    columns.extend(descriptor.columns.iter().copied());

    let mut builder = QueryBuilder::new(format!("INSERT INTO {}", quote_ident(descriptor.name)));
    if columns.is_empty() {
        builder.push(" DEFAULT VALUES");
    } else {
        let names: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        builder.push(format!(" ({}) VALUES (", names.join(", ")));
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            push_value(&mut builder, column, &column_value(entity, column)?)?;
        }
        builder.push(")");
    }
    builder.push(format!(" RETURNING {}", quote_ident(KEY_COLUMN)));
    Ok(builder)
}

/// Move the identity sequence of `T`'s table past explicitly inserted keys.
///
/// A no-op for tables whose key has no owned sequence.
pub fn sync_sequence<T: Entity>() -> QueryBuilder<'static, Postgres> {
    let table = quote_ident(T::descriptor().name);
    let key = quote_ident(KEY_COLUMN);
    let mut builder = QueryBuilder::new("SELECT setval(pg_get_serial_sequence(");
    builder.push_bind(table.clone());
    builder.push(format!(
        ", {}), (SELECT MAX({key}) FROM {table}))",
        quote_literal(KEY_COLUMN)
    ));
    builder
}

/// `UPDATE ... SET` every column of one entity.
pub fn update<T: Entity>(entity: &T) -> AppResult<QueryBuilder<'static, Postgres>> {
    let descriptor = T::descriptor();
    let key = quote_ident(KEY_COLUMN);
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", quote_ident(descriptor.name)));

    if descriptor.columns.is_empty() {
        builder.push(format!("{key} = {key}"));
    }
    for (i, column) in descriptor.columns.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(format!("{} = ", quote_ident(column)));
        push_value(&mut builder, column, &column_value(entity, column)?)?;
    }

    builder.push(format!(" WHERE {key} = "));
    builder.push_bind(entity.id().value());
    Ok(builder)
}

/// `DELETE` one row by identity.
pub fn delete<T: Entity>(id: EntityId) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "DELETE FROM {} WHERE {} = ",
        quote_ident(T::descriptor().name),
        quote_ident(KEY_COLUMN)
    ));
    builder.push_bind(id.value());
    builder
}

fn column_value<T: Entity>(entity: &T, column: &str) -> AppResult<FieldValue> {
    entity.field(column).ok_or_else(|| {
        AppError::internal(format!(
            "'{}' declares column '{column}' but does not expose it",
            T::descriptor().name
        ))
    })
}
