//! Report envelopes handed to the rendering side: JSON via serde, CSV via the csv crate.

use std::io;

use serde::Serialize;

use crate::combat::{AttackRecord, CombatantRef, ObjectId};

pub const CSV_HEADER: &str = "sequence,rank,attacker_id,attacker_name,target_id,target_name";

/// Serializable report for one owner.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport<R> {
    pub owner: ObjectId,
    pub ranking: &'static str,
    pub records: Vec<AttackRecord<R>>,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    sequence: usize,
    rank: i64,
    attacker_id: u64,
    attacker_name: &'a str,
    target_id: u64,
    target_name: &'a str,
}

/// Writes one row per record, in report order, after the [`CSV_HEADER`] line.
pub fn write_report_csv<W: io::Write>(
    records: &[AttackRecord<CombatantRef>],
    writer: W,
) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    if records.is_empty() {
        out.write_record(CSV_HEADER.split(','))?;
    }
    for record in records {
        out.serialize(CsvRow {
            sequence: record.sequence,
            rank: record.rank,
            attacker_id: record.attacker.id().0,
            attacker_name: record.attacker.name(),
            target_id: record.target.id().0,
            target_name: record.target.name(),
        })?;
    }
    out.flush()?;
    Ok(())
}
