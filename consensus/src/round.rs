//! The per-epoch round state machine.

use std::collections::{BTreeSet, HashMap};

use arbiter_ledger::{ApplyReport, Ledger};
use arbiter_transactions::{CoinstakeSummary, TransactionSummary};
use arbiter_types::params::BPS_DENOMINATOR;
use arbiter_types::{AccountId, LedgerHash, TxId};

use crate::vote::{VoteOutcome, VoteRecord};
use crate::{ConsensusConfig, ConsensusError, Proposal};

/// Where the current epoch stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// Round 0: transactions are collected, nothing is tallied.
    Collecting,
    /// A voting round with a non-zero threshold.
    Tallying(usize),
    /// The round whose timer fires the ledger close.
    Finalizing,
}

/// Work the caller must carry out after a state-machine step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundAction {
    /// Send this vote to every peer.
    BroadcastVote {
        proposal: Proposal,
        lcl_hash: LedgerHash,
    },
    /// Relay this node's fee claim to every peer.
    GossipCoinstake(CoinstakeSummary),
    /// A ledger was closed.
    Finalized(ApplyReport),
}

/// One voter's view of the epoch in progress.
///
/// Holds the ledger it closes, the candidate ids it currently supports, the
/// bodies of every transaction it has admitted and the last vote heard from
/// each other voter. Votes are weighted by stake in the last closed ledger.
pub struct ConsensusRound {
    account_id: AccountId,
    config: ConsensusConfig,
    ledger: Ledger,
    round: usize,
    candidates: BTreeSet<TxId>,
    deferred: BTreeSet<TxId>,
    known: HashMap<TxId, TransactionSummary>,
    votes: HashMap<AccountId, VoteRecord>,
}

impl ConsensusRound {
    pub fn new(
        account_id: AccountId,
        ledger: Ledger,
        config: ConsensusConfig,
    ) -> Result<Self, ConsensusError> {
        config.validate()?;
        Ok(Self {
            account_id,
            config,
            ledger,
            round: 0,
            candidates: BTreeSet::new(),
            deferred: BTreeSet::new(),
            known: HashMap::new(),
            votes: HashMap::new(),
        })
    }

    /// Reset to round 0 of a fresh epoch, forgetting every candidate,
    /// deferral and vote.
    pub fn start(&mut self) {
        self.round = 0;
        self.candidates.clear();
        self.deferred.clear();
        self.known.clear();
        self.votes.clear();
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn phase(&self) -> RoundPhase {
        if self.round == 0 {
            RoundPhase::Collecting
        } else if self.round + 1 >= self.config.round_count() {
            RoundPhase::Finalizing
        } else {
            RoundPhase::Tallying(self.round)
        }
    }

    pub fn candidate_ids(&self) -> impl Iterator<Item = &TxId> {
        self.candidates.iter()
    }

    pub fn deferred_ids(&self) -> impl Iterator<Item = &TxId> {
        self.deferred.iter()
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// This node's current vote.
    pub fn proposal(&self) -> Proposal {
        Proposal::new(self.round as u32, self.candidates.iter().copied())
    }

    /// Offer an admitted transaction to the epoch.
    ///
    /// Returns `true` on the first valid sighting of an id, which makes it
    /// a candidate; the caller should then relay the form it arrived in.
    /// Repeats and transactions that do not validate against the last
    /// closed ledger return `false`.
    pub fn receive_transaction(&mut self, tx: TransactionSummary) -> Result<bool, ConsensusError> {
        let id = *tx.id();
        if self.known.contains_key(&id) {
            return Ok(false);
        }
        if let TransactionSummary::Coinstake(claim) = &tx {
            if !claim.has_consistent_id() {
                tracing::warn!(tx = %id, payee = %claim.payee, "coinstake id does not match its body");
                return Ok(false);
            }
        }
        if !self.ledger.validate(&tx)? {
            return Ok(false);
        }
        tracing::debug!(tx = %id, kind = tx.kind(), round = self.round, "new candidate");
        self.known.insert(id, tx);
        self.candidates.insert(id);
        Ok(true)
    }

    /// Record the latest vote of `sender`. Only the most recent vote of each
    /// voter counts.
    pub fn receive_vote(
        &mut self,
        sender: AccountId,
        proposal: Proposal,
        lcl_hash: LedgerHash,
    ) -> VoteOutcome {
        if sender == self.account_id {
            return VoteOutcome::OwnVote;
        }
        if lcl_hash != self.ledger.ledger_hash() {
            tracing::debug!(%sender, %lcl_hash, "vote on a different ledger ignored");
            return VoteOutcome::Stale;
        }
        let record = VoteRecord {
            round: proposal.round,
            ids: proposal.ids.into_iter().collect(),
        };
        match self.votes.insert(sender, record) {
            Some(_) => VoteOutcome::Replaced,
            None => VoteOutcome::Accepted,
        }
    }

    /// Handle the round timer.
    ///
    /// Tallies when the current round has a threshold, then either closes
    /// the ledger (last round) or moves on and broadcasts the new vote.
    pub fn advance_round(&mut self) -> Result<Vec<RoundAction>, ConsensusError> {
        let threshold = self.config.threshold_bps(self.round);
        if threshold > 0 {
            self.tally(threshold)?;
        }
        if self.phase() == RoundPhase::Finalizing {
            return self.finalize_ledger();
        }
        self.round += 1;
        Ok(vec![RoundAction::BroadcastVote {
            proposal: self.proposal(),
            lcl_hash: self.ledger.ledger_hash(),
        }])
    }

    /// Keep the ids whose stake-weighted support reaches `threshold_bps` of
    /// the stake seen this epoch; defer the rest.
    fn tally(&mut self, threshold_bps: u32) -> Result<(), ConsensusError> {
        let own_stake = self.ledger.stake_of(&self.account_id)?;
        let mut weights = Vec::with_capacity(self.votes.len());
        let mut total = u128::from(own_stake);
        for (voter, record) in &self.votes {
            let stake = self.ledger.stake_of(voter)?;
            total += u128::from(stake);
            weights.push((stake, record));
        }
        let absolute = total * u128::from(threshold_bps) / u128::from(BPS_DENOMINATOR);

        let mut seen: BTreeSet<TxId> = self.candidates.clone();
        for (_, record) in &weights {
            seen.extend(record.ids.iter().copied());
        }

        let mut survivors = BTreeSet::new();
        for id in seen {
            let mut support = 0u128;
            if self.candidates.contains(&id) {
                support += u128::from(own_stake);
            }
            for (stake, record) in &weights {
                if record.ids.contains(&id) {
                    support += u128::from(*stake);
                }
            }
            if support >= absolute && self.known.contains_key(&id) {
                survivors.insert(id);
                self.deferred.remove(&id);
            } else {
                self.deferred.insert(id);
            }
        }

        tracing::debug!(
            round = self.round,
            threshold_bps,
            total_stake = %total,
            survivors = survivors.len(),
            deferred = self.deferred.len(),
            "tally"
        );
        self.candidates = survivors;
        Ok(())
    }

    /// Apply the surviving candidates and open the next epoch.
    ///
    /// When fees were collected, a coinstake paying this node for the
    /// just-closed ledger is seeded into the next epoch and gossiped.
    /// Deferred transactions that still validate on the new ledger are
    /// seeded too; the rest are dropped.
    fn finalize_ledger(&mut self) -> Result<Vec<RoundAction>, ConsensusError> {
        let closed_number = self.ledger.current_ledger_number();
        let survivors: Vec<TransactionSummary> = self
            .candidates
            .iter()
            .filter_map(|id| self.known.get(id).cloned())
            .collect();
        let report = self.ledger.apply(&survivors)?;

        let applied: BTreeSet<TxId> = self.candidates.iter().copied().collect();
        let deferred = std::mem::take(&mut self.deferred);
        let mut known = std::mem::take(&mut self.known);
        self.start();

        let mut dropped = 0usize;
        for id in deferred.difference(&applied) {
            let Some(tx) = known.remove(id) else {
                dropped += 1;
                continue;
            };
            if self.ledger.validate(&tx)? {
                self.seed(tx);
            } else {
                dropped += 1;
            }
        }

        let mut actions = vec![RoundAction::Finalized(report.clone())];
        if report.fees_collected > 0 {
            let claim =
                CoinstakeSummary::new(self.account_id.clone(), report.fees_collected, closed_number);
            self.seed(claim.clone().into());
            actions.push(RoundAction::GossipCoinstake(claim));
        }

        tracing::info!(
            ledger_number = report.ledger_number,
            applied = report.applied.len(),
            carried = self.candidates.len(),
            dropped,
            "epoch finalized"
        );
        Ok(actions)
    }

    fn seed(&mut self, tx: TransactionSummary) {
        let id = *tx.id();
        self.known.insert(id, tx);
        self.candidates.insert(id);
    }
}
