//! Entity capability traits and static entity metadata.
//!
//! An entity is any type with an integer identity plus a static
//! [`EntityDescriptor`] naming its columns and navigation properties. Entity
//! types do not share a base type; they opt in by implementing
//! [`HasIdentity`] and [`Entity`], usually through the [`entity!`] macro.
//!
//! [`entity!`]: crate::entity

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::id::EntityId;
use crate::types::value::FieldValue;

/// Name of the identity column shared by every entity.
pub const KEY_COLUMN: &str = "id";

/// Capability of carrying a surrogate identity.
pub trait HasIdentity {
    /// The entity's identity; transient until persisted.
    fn id(&self) -> EntityId;

    /// Overwrite the identity. Called by stores when a key is assigned.
    fn set_id(&mut self, id: EntityId);
}

/// A persistable entity type.
///
/// Entities round-trip through serde: stores decode rows from JSON objects
/// keyed by column name, with materialized navigations nested under their
/// navigation name. Navigation fields must therefore be `#[serde(default)]`.
pub trait Entity:
    HasIdentity + Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Static metadata for this entity type.
    fn descriptor() -> &'static EntityDescriptor;

    /// Read a column by name. `None` when the column does not exist.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Static metadata describing an entity type.
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Table / collection name; unique per store.
    pub name: &'static str,
    /// Persisted columns, excluding the [`KEY_COLUMN`].
    pub columns: &'static [&'static str],
    /// Navigation properties that can be eagerly materialized.
    pub navigations: &'static [NavigationDef],
}

impl EntityDescriptor {
    /// Whether `name` is the key column or a persisted column.
    pub fn has_column(&self, name: &str) -> bool {
        name == KEY_COLUMN || self.columns.contains(&name)
    }

    /// Look up a navigation property by name.
    pub fn navigation(&self, name: &str) -> Option<&'static NavigationDef> {
        self.navigations.iter().find(|nav| nav.name == name)
    }
}

/// How a navigation property relates its owner to the target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Many-to-one: the owner's `foreign_key` column holds the target's key.
    Reference,
    /// One-to-many: the target's `foreign_key` column holds the owner's key.
    Collection,
}

/// A navigation property of an entity.
pub struct NavigationDef {
    /// Property name; also the key the materialized value is nested under.
    pub name: &'static str,
    /// Relationship shape.
    pub kind: NavigationKind,
    /// Descriptor of the related entity type.
    pub target: fn() -> &'static EntityDescriptor,
    /// Column that links the two sides; see [`NavigationKind`].
    pub foreign_key: &'static str,
}

impl NavigationDef {
    /// Descriptor of the related entity type.
    pub fn target(&self) -> &'static EntityDescriptor {
        (self.target)()
    }
}

impl fmt::Debug for NavigationDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("target", &self.target().name)
            .field("foreign_key", &self.foreign_key)
            .finish()
    }
}

/// Implement [`HasIdentity`] and [`Entity`] for a struct with an
/// `id: EntityId` field.
///
/// ```ignore
/// quarry_core::entity! {
///     Order {
///         table: "orders",
///         columns: [customer_id, status, total_cents, placed_at],
///         navigations: [
///             items => Collection(OrderItem, "order_id"),
///             customer => Reference(Customer, "customer_id"),
///         ],
///     }
/// }
/// ```
///
/// Every listed column must be a field whose type converts into
/// [`FieldValue`].
#[macro_export]
macro_rules! entity {
    (
        $ty:ty {
            table: $table:literal,
            columns: [$($col:ident),* $(,)?],
            navigations: [$($nav:ident => $kind:ident($target:ty, $fk:literal)),* $(,)?] $(,)?
        }
    ) => {
        impl $crate::traits::HasIdentity for $ty {
            fn id(&self) -> $crate::types::EntityId {
                self.id
            }

            fn set_id(&mut self, id: $crate::types::EntityId) {
                self.id = id;
            }
        }

        impl $crate::traits::Entity for $ty {
            fn descriptor() -> &'static $crate::traits::EntityDescriptor {
                static DESCRIPTOR: $crate::traits::EntityDescriptor =
                    $crate::traits::EntityDescriptor {
                        name: $table,
                        columns: &[$(stringify!($col)),*],
                        navigations: &[$(
                            $crate::traits::NavigationDef {
                                name: stringify!($nav),
                                kind: $crate::traits::NavigationKind::$kind,
                                target: <$target as $crate::traits::Entity>::descriptor,
                                foreign_key: $fk,
                            }
                        ),*],
                    };
                &DESCRIPTOR
            }

            fn field(&self, name: &str) -> Option<$crate::types::FieldValue> {
                match name {
                    "id" => Some($crate::types::FieldValue::from(self.id)),
                    $(stringify!($col) => Some($crate::types::FieldValue::from(self.$col.clone())),)*
                    _ => None,
                }
            }
        }
    };
}
