//! Error types shared by the summary store, attribute storage and roster loading.

use std::io;

use crate::combat::ObjectId;

/// Failures of the backing attribute storage itself (disk, encoding).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("attribute storage i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("attribute storage is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by [`crate::store::SummaryStore`].
///
/// Everything except `Storage` means the persisted summary is corrupt: the load is
/// abandoned rather than returning a partial summary.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error(
        "summary block of object {owner} is corrupt: {attackers} attacker ids but {targets} target ids"
    )]
    LengthMismatch {
        owner: ObjectId,
        attackers: usize,
        targets: usize,
    },
    #[error("summary block of object {owner} references unknown combatant '{id}' at entry {index}")]
    UnresolvedCombatant {
        owner: ObjectId,
        id: String,
        index: usize,
    },
    #[error("summary block of object {owner} could not be decoded: {source}")]
    Decode {
        owner: ObjectId,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SummaryError {
    /// True for the corrupt-storage class (as opposed to a backend failure).
    pub fn is_corruption(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse roster {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("roster lists object id {0} more than once")]
    DuplicateId(ObjectId),
}
