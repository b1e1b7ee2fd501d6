//! Battle summary aggregation: who attacked whom during one combat round.
//!
//! [`SummaryBuilder`] groups attacks by attacker (first-seen order) and flattens them into
//! an ordered report. Report order is rank first, sequence index second, via a stable sort.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::combat::combatant::Targetable;

/// One attacker→target association in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackRecord<R> {
    pub attacker: R,
    pub target: R,
    /// Global visit index, strictly increasing over the grouped traversal.
    pub sequence: usize,
    pub rank: i64,
}

/// Derives the primary sort key of a record. Ties always fall back to `sequence`.
pub trait RankingRule<R> {
    /// Stable name used in serialized reports and on the command line.
    fn name(&self) -> &'static str;

    fn rank(&self, attacker: &R, target: &R, sequence: usize) -> i64;
}

/// Rank equals the sequence index: the report keeps grouped insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRank;

impl<R> RankingRule<R> for SequenceRank {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn rank(&self, _attacker: &R, _target: &R, sequence: usize) -> i64 {
        sequence as i64
    }
}

/// Rank by the target's target index, matching [`crate::combat::compare_target_order`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetIndexRank;

impl<R: Targetable> RankingRule<R> for TargetIndexRank {
    fn name(&self) -> &'static str {
        "target_index"
    }

    fn rank(&self, _attacker: &R, target: &R, _sequence: usize) -> i64 {
        i64::from(target.target_index())
    }
}

/// Accumulates attacks for a single round.
#[derive(Debug, Clone)]
pub struct SummaryBuilder<R> {
    attacker_order: Vec<R>,
    targets: HashMap<R, Vec<R>>,
    record_count: usize,
}

impl<R> Default for SummaryBuilder<R> {
    fn default() -> Self {
        Self {
            attacker_order: Vec::new(),
            targets: HashMap::new(),
            record_count: 0,
        }
    }
}

impl<R: Clone + Eq + Hash> SummaryBuilder<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one attack. Repeated pairs are kept as separate entries.
    pub fn record(&mut self, attacker: R, target: R) {
        match self.targets.get_mut(&attacker) {
            Some(list) => list.push(target),
            None => {
                self.attacker_order.push(attacker.clone());
                self.targets.insert(attacker, vec![target]);
            }
        }
        self.record_count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Total number of recorded attacks.
    pub fn len(&self) -> usize {
        self.record_count
    }

    /// Attackers in the order they were first recorded.
    pub fn attackers(&self) -> impl Iterator<Item = &R> {
        self.attacker_order.iter()
    }

    pub fn targets_of(&self, attacker: &R) -> &[R] {
        self.targets.get(attacker).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Report with the default [`SequenceRank`] rule.
    pub fn report(&self) -> Vec<AttackRecord<R>> {
        self.report_ranked(&SequenceRank)
    }

    pub fn report_ranked<Q>(&self, rule: &Q) -> Vec<AttackRecord<R>>
    where
        Q: RankingRule<R> + ?Sized,
    {
        let mut records = Vec::with_capacity(self.record_count);
        for attacker in &self.attacker_order {
            for target in self.targets_of(attacker) {
                let sequence = records.len();
                records.push(AttackRecord {
                    rank: rule.rank(attacker, target, sequence),
                    attacker: attacker.clone(),
                    target: target.clone(),
                    sequence,
                });
            }
        }
        records.sort_by(|left, right| {
            left.rank
                .cmp(&right.rank)
                .then_with(|| left.sequence.cmp(&right.sequence))
        });
        records
    }

    /// Freezes the builder into a read-only summary using `rule`.
    pub fn freeze<Q>(self, rule: &Q) -> Summary<R>
    where
        Q: RankingRule<R> + ?Sized,
    {
        Summary {
            ranking: rule.name(),
            records: self.report_ranked(rule),
        }
    }
}

/// Read-only report of a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary<R> {
    ranking: &'static str,
    records: Vec<AttackRecord<R>>,
}

impl<R> Summary<R> {
    pub fn ranking(&self) -> &'static str {
        self.ranking
    }

    pub fn records(&self) -> &[AttackRecord<R>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Token(&'static str, i32);

    impl Targetable for Token {
        fn target_index(&self) -> i32 {
            self.1
        }
    }

    fn pairs(records: &[AttackRecord<Token>]) -> Vec<(&'static str, &'static str)> {
        records.iter().map(|r| (r.attacker.0, r.target.0)).collect()
    }

    #[test]
    fn report_groups_by_first_seen_attacker() {
        let (a, b) = (Token("A", 0), Token("B", 0));
        let (x, y, z) = (Token("X", 0), Token("Y", 0), Token("Z", 0));
        let mut builder = SummaryBuilder::new();
        builder.record(a.clone(), x);
        builder.record(b.clone(), y);
        builder.record(a.clone(), z);

        let report = builder.report();
        assert_eq!(pairs(&report), [("A", "X"), ("A", "Z"), ("B", "Y")]);
        let sequences: Vec<_> = report.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, [0, 1, 2]);
        assert_eq!(builder.attackers().cloned().collect::<Vec<_>>(), [a, b]);
    }

    #[test]
    fn report_is_repeatable_and_does_not_consume() {
        let mut builder = SummaryBuilder::new();
        builder.record(Token("A", 0), Token("X", 0));
        assert_eq!(builder.report(), builder.report());
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn target_index_rank_is_stable_on_ties() {
        let mut builder = SummaryBuilder::new();
        builder.record(Token("A", 0), Token("X", 2));
        builder.record(Token("A", 0), Token("Y", 1));
        builder.record(Token("B", 0), Token("X", 2));
        builder.record(Token("B", 0), Token("Z", 1));

        let report = builder.report_ranked(&TargetIndexRank);
        assert_eq!(
            pairs(&report),
            [("A", "Y"), ("B", "Z"), ("A", "X"), ("B", "X")]
        );
        let sequences: Vec<_> = report.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, [1, 3, 0, 2]);
    }

    #[test]
    fn empty_builder_reports_nothing() {
        let builder: SummaryBuilder<Token> = SummaryBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.report().is_empty());
        assert!(builder.targets_of(&Token("A", 0)).is_empty());
    }

    #[test]
    fn freeze_keeps_rule_name() {
        let mut builder = SummaryBuilder::new();
        builder.record(Token("A", 0), Token("X", 4));
        let summary = builder.freeze(&TargetIndexRank);
        assert_eq!(summary.ranking(), "target_index");
        assert_eq!(summary.records()[0].rank, 4);
    }
}
