//! Persistence of battle summaries in per-object attribute storage.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::combat::{AttackRecord, Identified, ObjectId, SummaryBuilder};
use crate::error::{StorageError, SummaryError};

pub mod attributes;
pub mod registry;

pub use attributes::{AttributeStorage, JsonFileAttributeStorage, MemoryAttributeStorage};
pub use registry::{load_roster, CombatantRegistry, CombatantResolver};

/// Attribute block tag under which the summary lives.
pub const SUMMARY_BLOCK_TAG: &str = "battle_summary";

/// Stored form of a summary: index-aligned attacker and target id lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBlock {
    #[serde(default)]
    pub attackers: Vec<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

impl SummaryBlock {
    pub fn from_records<R: Identified>(records: &[AttackRecord<R>]) -> Self {
        let (attackers, targets) = records
            .iter()
            .map(|record| {
                (
                    record.attacker.object_id().to_string(),
                    record.target.object_id().to_string(),
                )
            })
            .unzip();
        Self {
            attackers,
            targets,
            recorded_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attackers.is_empty() && self.targets.is_empty()
    }

    pub fn validate(&self, owner: ObjectId) -> Result<(), SummaryError> {
        if self.attackers.len() != self.targets.len() {
            return Err(SummaryError::LengthMismatch {
                owner,
                attackers: self.attackers.len(),
                targets: self.targets.len(),
            });
        }
        Ok(())
    }
}

/// Summary persistence for one owner object.
///
/// The resolver is injected; the store never looks combatants up anywhere else.
pub struct SummaryStore<'a, S: ?Sized, C> {
    owner: ObjectId,
    storage: &'a mut S,
    resolver: &'a C,
}

impl<'a, S, C> SummaryStore<'a, S, C>
where
    S: AttributeStorage + ?Sized,
    C: CombatantResolver,
    C::Handle: Clone + Eq + std::hash::Hash,
{
    pub fn new(owner: ObjectId, storage: &'a mut S, resolver: &'a C) -> Self {
        Self {
            owner,
            storage,
            resolver,
        }
    }

    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    pub fn has_summary(&self) -> Result<bool, SummaryError> {
        Ok(self
            .storage
            .read_block(self.owner, SUMMARY_BLOCK_TAG)?
            .is_some())
    }

    /// Removes the stored block; returns whether one existed.
    pub fn clear(&mut self) -> Result<bool, SummaryError> {
        let removed = self.storage.remove_block(self.owner, SUMMARY_BLOCK_TAG)?;
        if removed {
            debug!(owner = %self.owner, "cleared battle summary");
        }
        Ok(removed)
    }

    /// Replaces the stored block with `records`, in the order given. A failed write
    /// leaves the previous block in place.
    pub fn init_from_attack_records(
        &mut self,
        records: &[AttackRecord<C::Handle>],
    ) -> Result<(), SummaryError>
    where
        C::Handle: Identified,
    {
        let block = SummaryBlock::from_records(records);
        let value = serde_json::to_value(&block).map_err(StorageError::from)?;
        self.storage
            .write_block(self.owner, SUMMARY_BLOCK_TAG, value)?;
        debug!(owner = %self.owner, records = records.len(), "stored battle summary");
        Ok(())
    }

    /// Rebuilds the stored summary. Absent or empty blocks give an empty builder.
    pub fn load_summary(&self) -> Result<SummaryBuilder<C::Handle>, SummaryError> {
        let Some(value) = self.storage.read_block(self.owner, SUMMARY_BLOCK_TAG)? else {
            return Ok(SummaryBuilder::new());
        };
        let block: SummaryBlock =
            serde_json::from_value(value).map_err(|source| SummaryError::Decode {
                owner: self.owner,
                source,
            })?;
        if block.is_empty() {
            return Ok(SummaryBuilder::new());
        }
        if let Err(err) = block.validate(self.owner) {
            warn!(owner = %self.owner, error = %err, "corrupt battle summary");
            return Err(err);
        }

        let mut builder = SummaryBuilder::new();
        for (index, (attacker_id, target_id)) in
            block.attackers.iter().zip(&block.targets).enumerate()
        {
            let attacker = self.resolve(attacker_id, index)?;
            let target = self.resolve(target_id, index)?;
            builder.record(attacker, target);
        }
        debug!(owner = %self.owner, records = builder.len(), "loaded battle summary");
        Ok(builder)
    }

    fn resolve(&self, encoded_id: &str, index: usize) -> Result<C::Handle, SummaryError> {
        self.resolver.resolve(encoded_id).ok_or_else(|| {
            warn!(owner = %self.owner, id = encoded_id, index, "unresolved combatant in battle summary");
            SummaryError::UnresolvedCombatant {
                owner: self.owner,
                id: encoded_id.to_string(),
                index,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn block_length_mismatch_is_rejected() {
        let block = SummaryBlock {
            attackers: vec!["1".into(), "2".into(), "3".into()],
            targets: vec!["4".into(), "5".into()],
            recorded_at: None,
        };
        let err = block.validate(ObjectId(8)).unwrap_err();
        assert!(matches!(
            err,
            SummaryError::LengthMismatch {
                attackers: 3,
                targets: 2,
                ..
            }
        ));
    }

    #[test]
    fn block_tolerates_missing_lists() {
        let block: SummaryBlock = serde_json::from_value(json!({})).unwrap();
        assert!(block.is_empty());
        assert!(block.validate(ObjectId(1)).is_ok());
    }
}
