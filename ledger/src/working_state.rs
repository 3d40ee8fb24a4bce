//! Account rows as modified by the transactions applied so far.

use std::collections::BTreeMap;

use arbiter_store::{AccountRecord, LedgerBackend, LedgerRoot};
use arbiter_transactions::{CoinstakeSummary, EncounterSummary, InitiationSummary, TransactionSummary};
use arbiter_types::{AccountId, TxId};

use crate::skill::skill_delta;
use crate::LedgerError;

/// An overlay of changed rows on top of the committed store.
///
/// Validation against an empty overlay is validation against the last
/// closed ledger; during apply the overlay grows with every transaction.
pub(crate) struct WorkingState<'a> {
    store: &'a dyn LedgerBackend,
    ledger_number: u64,
    /// Fees debited closing the previous ledger.
    collected: u64,
    fee: u64,
    changed: BTreeMap<AccountId, AccountRecord>,
}

impl<'a> WorkingState<'a> {
    pub fn new(store: &'a dyn LedgerBackend, root: &LedgerRoot, fee: u64) -> Self {
        Self {
            store,
            ledger_number: root.ledger_number,
            collected: root.fees_collected,
            fee,
            changed: BTreeMap::new(),
        }
    }

    pub fn account(&self, id: &AccountId) -> Result<Option<AccountRecord>, LedgerError> {
        match self.changed.get(id) {
            Some(row) => Ok(Some(row.clone())),
            None => Ok(self.store.get_account(id)?),
        }
    }

    fn require(&self, id: &AccountId) -> Result<AccountRecord, LedgerError> {
        self.account(id)?
            .ok_or_else(|| LedgerError::Corrupted(format!("validated account {id} vanished")))
    }

    fn already_applied(&self, id: &TxId) -> Result<bool, LedgerError> {
        Ok(self.store.is_applied(id)?)
    }

    fn put(&mut self, row: AccountRecord) {
        self.changed.insert(row.account_id.clone(), row);
    }

    /// `None` if `tx` may be applied now, otherwise why not.
    pub fn rejection(&self, tx: &TransactionSummary) -> Result<Option<&'static str>, LedgerError> {
        match tx {
            TransactionSummary::Initiation(s) => self.initiation_rejection(s),
            TransactionSummary::Encounter(s) => self.encounter_rejection(s),
            TransactionSummary::Coinstake(s) => Ok(self.coinstake_rejection(s)),
        }
    }

    fn initiation_rejection(&self, s: &InitiationSummary) -> Result<Option<&'static str>, LedgerError> {
        let current = self.ledger_number;
        if self.already_applied(&s.id)? {
            return Ok(Some("already applied"));
        }
        if s.challenger == s.defender {
            return Ok(Some("self challenge"));
        }
        let (Some(challenger), Some(defender)) =
            (self.account(&s.challenger)?, self.account(&s.defender)?)
        else {
            return Ok(Some("unknown participant"));
        };
        if challenger.stake < self.fee || defender.stake < self.fee {
            return Ok(Some("stake below fee"));
        }
        if challenger.in_unexpired_encounter(current) || defender.in_unexpired_encounter(current) {
            return Ok(Some("participant already in an encounter"));
        }
        if s.begin_by < current || s.end_by < current {
            return Ok(Some("encounter window already passed"));
        }
        Ok(None)
    }

    fn encounter_rejection(&self, s: &EncounterSummary) -> Result<Option<&'static str>, LedgerError> {
        if self.already_applied(&s.id)? {
            return Ok(Some("already applied"));
        }
        let (Some(winner), Some(loser)) = (self.account(&s.winner)?, self.account(&s.loser)?) else {
            return Ok(Some("unknown participant"));
        };
        if winner.stake < self.fee || loser.stake < self.fee {
            return Ok(Some("stake below fee"));
        }
        if winner.in_encounter_with.as_ref() != Some(&loser.account_id)
            || loser.in_encounter_with.as_ref() != Some(&winner.account_id)
        {
            return Ok(Some("participants are not paired"));
        }
        let current = self.ledger_number;
        match (winner.encounter_begin_at, winner.encounter_end_by) {
            (Some(begin_at), Some(end_by)) if (begin_at..=end_by).contains(&current) => Ok(None),
            _ => Ok(Some("outside the encounter window")),
        }
    }

    fn coinstake_rejection(&self, s: &CoinstakeSummary) -> Option<&'static str> {
        match self.ledger_number.checked_sub(1) {
            Some(previous) if s.target_ledger_number == previous => {}
            _ => return Some("coinstake does not target the previous ledger"),
        }
        if s.total_fees == 0 {
            return Some("coinstake claims no fees");
        }
        if s.total_fees > self.collected {
            return Some("coinstake claims more than was collected");
        }
        None
    }

    pub fn apply_initiation(&mut self, s: &InitiationSummary) -> Result<(), LedgerError> {
        let mut challenger = self.require(&s.challenger)?;
        let mut defender = self.require(&s.defender)?;
        for (row, opponent) in [
            (&mut challenger, &s.defender),
            (&mut defender, &s.challenger),
        ] {
            row.stake -= self.fee;
            row.in_encounter_with = Some(opponent.clone());
            row.encounter_begin_at = Some(self.ledger_number);
            row.encounter_end_by = Some(s.end_by);
        }
        self.put(challenger);
        self.put(defender);
        Ok(())
    }

    pub fn apply_encounter(&mut self, s: &EncounterSummary) -> Result<(), LedgerError> {
        let mut winner = self.require(&s.winner)?;
        let mut loser = self.require(&s.loser)?;
        for row in [&mut winner, &mut loser] {
            row.stake -= self.fee;
            row.clear_encounter();
        }
        if !s.was_tied {
            let delta = skill_delta(winner.skill, loser.skill);
            winner.skill = winner.skill.saturating_add(delta);
            loser.skill = loser.skill.saturating_sub(delta);
        }
        self.put(winner);
        self.put(loser);
        Ok(())
    }

    pub fn credit(&mut self, id: &AccountId, amount: u64) -> Result<(), LedgerError> {
        let mut row = self.require(id)?;
        row.stake = row.stake.saturating_add(amount);
        self.put(row);
        Ok(())
    }

    pub fn into_changed(self) -> BTreeMap<AccountId, AccountRecord> {
        self.changed
    }
}
