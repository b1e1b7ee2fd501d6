//! One combat round's summary lifecycle: clear, record, persist, freeze.

use std::hash::Hash;

use tracing::info;

use crate::combat::combatant::Identified;
use crate::combat::summary::{RankingRule, Summary, SummaryBuilder};
use crate::error::SummaryError;
use crate::store::{AttributeStorage, CombatantResolver, SummaryStore};

#[derive(Debug)]
pub struct CombatRound<R> {
    number: u32,
    builder: SummaryBuilder<R>,
}

impl<R: Clone + Eq + Hash + Identified> CombatRound<R> {
    /// Starts a round, discarding whatever summary the store held for the previous one.
    pub fn begin<S, C>(number: u32, store: &mut SummaryStore<'_, S, C>) -> Result<Self, SummaryError>
    where
        S: AttributeStorage + ?Sized,
        C: CombatantResolver<Handle = R>,
    {
        store.clear()?;
        info!(owner = %store.owner(), round = number, "combat round started");
        Ok(Self {
            number,
            builder: SummaryBuilder::new(),
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn record(&mut self, attacker: R, target: R) {
        self.builder.record(attacker, target);
    }

    /// Persists the grouped report and returns the round's summary ranked by `rule`.
    pub fn finish<S, C, Q>(
        self,
        store: &mut SummaryStore<'_, S, C>,
        rule: &Q,
    ) -> Result<Summary<R>, SummaryError>
    where
        S: AttributeStorage + ?Sized,
        C: CombatantResolver<Handle = R>,
        Q: RankingRule<R> + ?Sized,
    {
        store.init_from_attack_records(&self.builder.report())?;
        info!(
            owner = %store.owner(),
            round = self.number,
            attacks = self.builder.len(),
            "combat round summarized"
        );
        Ok(self.builder.freeze(rule))
    }
}
