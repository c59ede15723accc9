//! Navigation materialization for the in-memory store.

use futures::future::{BoxFuture, FutureExt};
use quarry_core::query::IncludeNode;
use quarry_core::result::AppResult;
use quarry_core::traits::{KEY_COLUMN, NavigationKind};
use serde_json::Value;

use super::MemoryStore;
use crate::store::row::Row;

/// Nest the related rows named by `nodes` into each of `rows`.
///
/// Collections are ordered by the related identity; a dangling reference
/// materializes as `null`.
pub fn materialize<'a>(
    store: &'a MemoryStore,
    rows: &'a mut [Row],
    nodes: &'a [IncludeNode],
) -> BoxFuture<'a, AppResult<()>> {
    async move {
        for node in nodes {
            let navigation = node.navigation;
            let mut related = store.table_rows(navigation.target().name).await?;
            if !node.children.is_empty() {
                materialize(store, &mut related, &node.children).await?;
            }

            for row in rows.iter_mut() {
                let value = match navigation.kind {
                    NavigationKind::Collection => {
                        let owner = row.get(KEY_COLUMN);
                        Value::Array(
                            related
                                .iter()
                                .filter(|candidate| candidate.get(navigation.foreign_key) == owner)
                                .cloned()
                                .map(Value::Object)
                                .collect(),
                        )
                    }
                    NavigationKind::Reference => {
                        let target = row.get(navigation.foreign_key);
                        related
                            .iter()
                            .find(|candidate| {
                                target.is_some_and(|key| !key.is_null())
                                    && candidate.get(KEY_COLUMN) == target
                            })
                            .cloned()
                            .map_or(Value::Null, Value::Object)
                    }
                };
                row.insert(navigation.name.to_string(), value);
            }
        }
        Ok(())
    }
    .boxed()
}
