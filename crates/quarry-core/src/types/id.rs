//! Surrogate entity identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Integer surrogate key carried by every persisted entity.
///
/// Values `<= 0` are *transient*: the entity has not been persisted yet and
/// the store assigns a key when it is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    /// The unassigned identity.
    pub const TRANSIENT: EntityId = EntityId(0);

    /// Create an identity from a raw key.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Return the raw key.
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Whether the identity has not been assigned by a store yet.
    pub const fn is_transient(self) -> bool {
        self.0 <= 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> i64 {
        id.0
    }
}
