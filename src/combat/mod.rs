pub mod combatant;
pub mod export_csv;
pub mod round;
pub mod summary;

pub use combatant::{
    compare_target_order, Combatant, CombatantRef, Identified, ObjectId, Targetable,
};
pub use export_csv::{write_report_csv, SummaryReport, CSV_HEADER};
pub use round::CombatRound;
pub use summary::{
    AttackRecord, RankingRule, SequenceRank, Summary, SummaryBuilder, TargetIndexRank,
};
