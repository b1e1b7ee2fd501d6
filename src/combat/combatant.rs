//! Combatant identity and the target-order comparator.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

/// Numeric game-object identifier. Stored as a decimal string inside attribute blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(ObjectId)
    }
}

/// Anything that can be written into a summary block by its object id.
pub trait Identified {
    fn object_id(&self) -> ObjectId;
}

/// Anything carrying a target index assigned by the combat layer.
pub trait Targetable {
    fn target_index(&self) -> i32;
}

/// Game entity taking part in a combat round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: ObjectId,
    pub name: String,
    /// Position in the target list; assigned by combat resolution, not by this crate.
    #[serde(default)]
    pub target_index: i32,
}

impl Combatant {
    pub fn new(id: u64, name: impl Into<String>, target_index: i32) -> Self {
        Self {
            id: ObjectId(id),
            name: name.into(),
            target_index,
        }
    }
}

/// Shared handle to a live combatant.
///
/// Equality and hashing use the object id only: two handles to the same entity are
/// equal even if one was resolved from storage and the other came from the roster.
#[derive(Debug, Clone)]
pub struct CombatantRef(Arc<Combatant>);

impl CombatantRef {
    pub fn new(combatant: Combatant) -> Self {
        Self(Arc::new(combatant))
    }

    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl From<Combatant> for CombatantRef {
    fn from(combatant: Combatant) -> Self {
        Self::new(combatant)
    }
}

impl PartialEq for CombatantRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for CombatantRef {}

impl Hash for CombatantRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl Serialize for CombatantRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Identified for CombatantRef {
    fn object_id(&self) -> ObjectId {
        self.0.id
    }
}

impl Targetable for CombatantRef {
    fn target_index(&self) -> i32 {
        self.0.target_index
    }
}

impl Targetable for Combatant {
    fn target_index(&self) -> i32 {
        self.target_index
    }
}

/// Orders two candidate targets by their target index (`rank(a) - rank(b)`).
pub fn compare_target_order<T: Targetable + ?Sized>(a: &T, b: &T) -> Ordering {
    a.target_index().cmp(&b.target_index())
}
