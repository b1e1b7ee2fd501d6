//! Live combatant roster and the resolution capability the summary store depends on.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::combat::{Combatant, CombatantRef, ObjectId};
use crate::error::RosterError;

/// Resolves a string-encoded object id to a live combatant handle.
pub trait CombatantResolver {
    type Handle;

    fn resolve(&self, encoded_id: &str) -> Option<Self::Handle>;
}

/// In-memory roster keyed by object id. Iterates in id order.
#[derive(Debug, Clone, Default)]
pub struct CombatantRegistry {
    by_id: BTreeMap<ObjectId, CombatantRef>,
}

impl CombatantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry, rejecting rosters that list the same id twice.
    pub fn from_combatants<I>(combatants: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = Combatant>,
    {
        let mut registry = Self::new();
        for combatant in combatants {
            let id = combatant.id;
            if registry.insert(combatant).is_some() {
                return Err(RosterError::DuplicateId(id));
            }
        }
        Ok(registry)
    }

    /// Inserts or replaces a combatant; returns the previous handle for that id.
    pub fn insert(&mut self, combatant: Combatant) -> Option<CombatantRef> {
        self.by_id.insert(combatant.id, CombatantRef::new(combatant))
    }

    pub fn get(&self, id: ObjectId) -> Option<&CombatantRef> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatantRef> {
        self.by_id.values()
    }
}

impl CombatantResolver for CombatantRegistry {
    type Handle = CombatantRef;

    fn resolve(&self, encoded_id: &str) -> Option<CombatantRef> {
        let id = encoded_id.parse::<ObjectId>().ok()?;
        self.by_id.get(&id).cloned()
    }
}

/// Load a roster from a JSON array of combatants.
pub fn load_roster(path: impl AsRef<Path>) -> Result<CombatantRegistry, RosterError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| RosterError::Io {
        path: display.clone(),
        source,
    })?;
    let combatants: Vec<Combatant> =
        serde_json::from_str(&raw).map_err(|source| RosterError::Parse {
            path: display,
            source,
        })?;
    CombatantRegistry::from_combatants(combatants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CombatantRegistry {
        CombatantRegistry::from_combatants([
            Combatant::new(2, "Knight", 1),
            Combatant::new(1, "Dragon", 0),
        ])
        .expect("unique ids")
    }

    #[test]
    fn resolves_decimal_ids_only() {
        let registry = registry();
        assert_eq!(registry.resolve("1").map(|c| c.name().to_string()), Some("Dragon".into()));
        assert!(registry.resolve("3").is_none());
        assert!(registry.resolve("dragon").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn iterates_in_id_order() {
        let ids: Vec<_> = registry().iter().map(CombatantRef::id).collect();
        assert_eq!(ids, [ObjectId(1), ObjectId(2)]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = CombatantRegistry::from_combatants([
            Combatant::new(5, "Imp", 0),
            Combatant::new(5, "Imp again", 1),
        ])
        .unwrap_err();
        assert!(matches!(err, RosterError::DuplicateId(ObjectId(5))));
    }

    #[test]
    fn missing_roster_file_is_io_error() {
        let err = load_roster("/nonexistent/battle-summary/roster.json").unwrap_err();
        assert!(matches!(err, RosterError::Io { .. }));
    }
}
