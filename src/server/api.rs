use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::combat::{
    CombatRound, CombatantRef, ObjectId, RankingRule, SequenceRank, SummaryReport,
    TargetIndexRank,
};
use crate::error::SummaryError;
use crate::store::{AttributeStorage, CombatantRegistry, SummaryStore};

pub type SharedStorage = Mutex<Box<dyn AttributeStorage + Send>>;

/// Everything a request handler needs: the roster and the attribute storage.
pub struct AppState {
    pub registry: CombatantRegistry,
    pub storage: SharedStorage,
}

impl AppState {
    pub fn new(registry: CombatantRegistry, storage: Box<dyn AttributeStorage + Send>) -> Self {
        Self {
            registry,
            storage: Mutex::new(storage),
        }
    }

    fn lock_storage(&self) -> Result<MutexGuard<'_, Box<dyn AttributeStorage + Send>>, ApiError> {
        self.storage.lock().map_err(|_| ApiError::StorageUnavailable)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Parse(serde_json::Error),
    #[error("unknown combatant {0}")]
    UnknownCombatant(ObjectId),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error("failed to encode response: {0}")]
    Encode(serde_json::Error),
    #[error("attribute storage is unavailable")]
    StorageUnavailable,
}

/// Ranking selectable by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ranking {
    #[default]
    Sequence,
    TargetIndex,
}

impl Ranking {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sequence" => Some(Self::Sequence),
            "target_index" | "target-index" => Some(Self::TargetIndex),
            _ => None,
        }
    }

    pub fn rule(self) -> &'static dyn RankingRule<CombatantRef> {
        match self {
            Self::Sequence => &SequenceRank,
            Self::TargetIndex => &TargetIndexRank,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordRequest {
    #[serde(default = "default_round")]
    pub round: u32,
    pub attacks: Vec<AttackPair>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AttackPair {
    pub attacker: ObjectId,
    pub target: ObjectId,
}

fn default_round() -> u32 {
    1
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    engine: &'static str,
}

#[derive(Debug, Serialize)]
struct ClearResponse {
    status: &'static str,
    owner: ObjectId,
    removed: bool,
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&HealthResponse {
        status: "ok",
        engine: "battle_summary_v1",
    })
}

pub fn combatants_payload(state: &AppState) -> Result<String, ApiError> {
    let combatants: Vec<&CombatantRef> = state.registry.iter().collect();
    serde_json::to_string_pretty(&combatants).map_err(ApiError::Encode)
}

pub fn summary_get_payload(
    state: &AppState,
    owner: ObjectId,
    ranking: Ranking,
) -> Result<String, ApiError> {
    let mut storage = state.lock_storage()?;
    let store = SummaryStore::new(owner, &mut **storage, &state.registry);
    let builder = store.load_summary()?;
    let rule = ranking.rule();
    encode_report(SummaryReport {
        owner,
        ranking: rule.name(),
        records: builder.report_ranked(rule),
    })
}

pub fn summary_put_payload(
    state: &AppState,
    owner: ObjectId,
    body: &str,
) -> Result<String, ApiError> {
    let request: RecordRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let resolve = |id: ObjectId| {
        state
            .registry
            .get(id)
            .cloned()
            .ok_or(ApiError::UnknownCombatant(id))
    };
    let attacks = request
        .attacks
        .iter()
        .map(|pair| -> Result<_, ApiError> {
            Ok((resolve(pair.attacker)?, resolve(pair.target)?))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let mut storage = state.lock_storage()?;
    let mut store = SummaryStore::new(owner, &mut **storage, &state.registry);
    let mut round = CombatRound::begin(request.round, &mut store)?;
    for (attacker, target) in attacks {
        round.record(attacker, target);
    }
    let rule = Ranking::default().rule();
    let summary = round.finish(&mut store, rule)?;
    encode_report(SummaryReport {
        owner,
        ranking: summary.ranking(),
        records: summary.records().to_vec(),
    })
}

pub fn summary_delete_payload(state: &AppState, owner: ObjectId) -> Result<String, ApiError> {
    let mut storage = state.lock_storage()?;
    let mut store = SummaryStore::new(owner, &mut **storage, &state.registry);
    let removed = store.clear()?;
    serde_json::to_string_pretty(&ClearResponse {
        status: "ok",
        owner,
        removed,
    })
    .map_err(ApiError::Encode)
}

fn encode_report(report: SummaryReport<CombatantRef>) -> Result<String, ApiError> {
    serde_json::to_string_pretty(&report).map_err(ApiError::Encode)
}
