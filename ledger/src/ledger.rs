//! The ledger: committed state plus the operations that change it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use arbiter_crypto::hash_ledger_root;
use arbiter_store::{AccountRecord, AppliedTx, LedgerBackend, LedgerChangeset, LedgerRoot};
use arbiter_transactions::{AccountState, CoinstakeSummary, TransactionSummary};
use arbiter_types::{AccountId, LedgerHash, TxId};

use crate::apportion::apportion;
use crate::genesis::GenesisConfig;
use crate::state_hash::compute_state_hash;
use crate::working_state::WorkingState;
use crate::LedgerError;

/// Outcome of closing a ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyReport {
    /// Hash of the ledger just created.
    pub ledger_hash: LedgerHash,
    /// Number of the ledger just created.
    pub ledger_number: u64,
    /// Ids that changed state, in application order.
    pub applied: Vec<TxId>,
    /// Ids that no longer validated when their turn came, or coinstake
    /// claims that could not be paid.
    pub skipped: Vec<TxId>,
    /// Fees actually debited.
    pub fees_collected: u64,
}

pub struct Ledger {
    store: Arc<dyn LedgerBackend>,
    transaction_fee: u64,
    root: LedgerRoot,
    ledger_hash: LedgerHash,
}

impl Ledger {
    /// Load the persisted ledger, or write genesis into an empty store.
    pub fn open(
        store: Arc<dyn LedgerBackend>,
        genesis: &GenesisConfig,
        transaction_fee: u64,
    ) -> Result<Self, LedgerError> {
        if let Some(root) = store.get_root()? {
            let ledger_hash = store.get_ledger_hash()?.ok_or_else(|| {
                LedgerError::Corrupted("ledger root present without ledger hash".into())
            })?;
            if ledger_hash != hash_ledger_root(&root.state_hash, root.ledger_number, &root.previous_hash) {
                return Err(LedgerError::Corrupted(
                    "stored ledger hash does not match the stored root".into(),
                ));
            }
            tracing::info!(
                ledger_number = root.ledger_number,
                ledger_hash = %ledger_hash,
                "reloaded ledger"
            );
            return Ok(Self {
                store,
                transaction_fee,
                root,
                ledger_hash,
            });
        }

        genesis.validate()?;
        let row = genesis.genesis_row();
        let root = LedgerRoot {
            ledger_number: 0,
            state_hash: compute_state_hash(std::slice::from_ref(&row)),
            previous_hash: LedgerHash::ZERO,
            fees_collected: 0,
        };
        let ledger_hash = hash_ledger_root(&root.state_hash, 0, &root.previous_hash);
        store.commit(&LedgerChangeset {
            accounts: vec![row],
            root,
            ledger_hash,
            applied: Vec::new(),
            expired: Vec::new(),
        })?;
        tracing::info!(
            genesis_account = %genesis.account_id,
            stake = genesis.stake,
            ledger_hash = %ledger_hash,
            "created genesis ledger"
        );
        Ok(Self {
            store,
            transaction_fee,
            root,
            ledger_hash,
        })
    }

    pub fn ledger_hash(&self) -> LedgerHash {
        self.ledger_hash
    }

    pub fn root(&self) -> LedgerRoot {
        self.root
    }

    pub fn current_ledger_number(&self) -> u64 {
        self.root.ledger_number
    }

    pub fn transaction_fee(&self) -> u64 {
        self.transaction_fee
    }

    pub fn get_account(&self, id: &AccountId) -> Result<Option<AccountRecord>, LedgerError> {
        Ok(self.store.get_account(id)?)
    }

    /// Stake of `id` in the last closed ledger; zero for unknown accounts.
    pub fn stake_of(&self, id: &AccountId) -> Result<u64, LedgerError> {
        Ok(self.get_account(id)?.map_or(0, |row| row.stake))
    }

    /// The row of `id` as reported to clients.
    pub fn account_state(&self, id: &AccountId) -> Result<Option<AccountState>, LedgerError> {
        Ok(self.get_account(id)?.map(|row| AccountState {
            account: row.account_id,
            stake: row.stake,
            skill: row.skill,
            in_encounter_with: row.in_encounter_with,
            encounter_begin_at: row.encounter_begin_at,
            encounter_end_by: row.encounter_end_by,
            partial_chain_length: row.partial_chain_length,
        }))
    }

    /// Whether `tx` could be applied to the last closed ledger.
    ///
    /// An invalid transaction is `Ok(false)`; errors are storage failures.
    pub fn validate(&self, tx: &TransactionSummary) -> Result<bool, LedgerError> {
        let state = self.working_state();
        match state.rejection(tx)? {
            None => Ok(true),
            Some(reason) => {
                tracing::debug!(tx = %tx.id(), kind = tx.kind(), reason, "transaction invalid");
                Ok(false)
            }
        }
    }

    /// Close the current ledger with `transactions` and commit the result.
    ///
    /// Coinstake claims are settled first, against the stakes of the last
    /// closed ledger. Initiations and encounters follow in ascending id
    /// order, each re-validated against the state the earlier ones left;
    /// those that no longer validate are skipped. Duplicate ids are applied
    /// once, and ids applied by an earlier close stay rejected while they
    /// could otherwise validate again. Every changed row, the new root, its
    /// hash and the applied index changes are committed in one storage
    /// transaction.
    pub fn apply(&mut self, transactions: &[TransactionSummary]) -> Result<ApplyReport, LedgerError> {
        let ordered: BTreeSet<&TransactionSummary> = transactions.iter().collect();
        let mut state = self.working_state();
        let mut applied = Vec::new();
        let mut skipped = Vec::new();
        let mut fees_collected = 0u64;
        let mut remembered = Vec::new();

        let mut groups: BTreeMap<u64, Vec<&CoinstakeSummary>> = BTreeMap::new();
        for tx in &ordered {
            if let TransactionSummary::Coinstake(claim) = tx {
                if state.rejection(tx)?.is_some() {
                    skipped.push(claim.id);
                } else {
                    groups.entry(claim.target_ledger_number).or_default().push(claim);
                }
            }
        }
        for (target, claims) in groups {
            self.settle_coinstakes(&mut state, target, claims, &mut applied, &mut skipped)?;
        }

        for tx in ordered.iter().filter(|tx| tx.charges_fee()) {
            if let Some(reason) = state.rejection(tx)? {
                tracing::debug!(tx = %tx.id(), kind = tx.kind(), reason, "skipped during apply");
                skipped.push(*tx.id());
                continue;
            }
            let retain_until = match tx {
                TransactionSummary::Initiation(s) => {
                    state.apply_initiation(s)?;
                    Some(s.end_by)
                }
                TransactionSummary::Encounter(s) => {
                    state.apply_encounter(s)?;
                    None
                }
                TransactionSummary::Coinstake(_) => continue,
            };
            remembered.push(AppliedTx {
                id: *tx.id(),
                retain_until,
            });
            fees_collected = fees_collected.saturating_add(2 * self.transaction_fee);
            applied.push(*tx.id());
        }

        let changed = state.into_changed();
        let mut rows: BTreeMap<AccountId, AccountRecord> = self
            .store
            .iter_accounts()?
            .into_iter()
            .map(|row| (row.account_id.clone(), row))
            .collect();
        rows.extend(changed.clone());
        let all_rows: Vec<AccountRecord> = rows.into_values().collect();

        let root = LedgerRoot {
            ledger_number: self.root.ledger_number + 1,
            state_hash: compute_state_hash(&all_rows),
            previous_hash: self.ledger_hash,
            fees_collected,
        };
        let expired: Vec<TxId> = self
            .store
            .iter_applied()?
            .into_iter()
            .filter(|entry| entry.expired_at(root.ledger_number))
            .map(|entry| entry.id)
            .collect();
        let ledger_hash = hash_ledger_root(&root.state_hash, root.ledger_number, &root.previous_hash);
        self.store.commit(&LedgerChangeset {
            accounts: changed.into_values().collect(),
            root,
            ledger_hash,
            applied: remembered,
            expired,
        })?;
        self.root = root;
        self.ledger_hash = ledger_hash;

        tracing::info!(
            ledger_number = root.ledger_number,
            ledger_hash = %ledger_hash,
            applied = applied.len(),
            skipped = skipped.len(),
            fees_collected,
            "ledger closed"
        );
        Ok(ApplyReport {
            ledger_hash,
            ledger_number: root.ledger_number,
            applied,
            skipped,
            fees_collected,
        })
    }

    /// Pay one group of claims on the fees of ledger `target`.
    ///
    /// The pool is the smallest fee total any claimant reports, which
    /// validation already bounds by the fees the target close debited. Each payee
    /// is paid once (its lowest-id claim counts) and unknown payees are
    /// skipped. The pool is split by stake with [`apportion`].
    fn settle_coinstakes(
        &self,
        state: &mut WorkingState<'_>,
        target: u64,
        claims: Vec<&CoinstakeSummary>,
        applied: &mut Vec<TxId>,
        skipped: &mut Vec<TxId>,
    ) -> Result<(), LedgerError> {
        let mut seen = BTreeSet::new();
        let mut claimants = Vec::new();
        let mut paid_ids = Vec::new();
        let mut pool = u64::MAX;

        for claim in claims {
            if !seen.insert(&claim.payee) {
                skipped.push(claim.id);
                continue;
            }
            let Some(row) = state.account(&claim.payee)? else {
                tracing::warn!(payee = %claim.payee, target, "coinstake for unknown account skipped");
                skipped.push(claim.id);
                continue;
            };
            pool = pool.min(claim.total_fees);
            claimants.push((claim.payee.clone(), row.stake));
            paid_ids.push(claim.id);
        }
        if claimants.is_empty() {
            return Ok(());
        }

        let awards = apportion(pool, &claimants);
        for ((payee, _), award) in claimants.iter().zip(&awards) {
            if *award > 0 {
                state.credit(payee, *award)?;
            }
        }
        tracing::debug!(target, pool, claimants = claimants.len(), "coinstake group settled");
        applied.extend(paid_ids);
        Ok(())
    }

    fn working_state(&self) -> WorkingState<'_> {
        WorkingState::new(self.store.as_ref(), &self.root, self.transaction_fee)
    }
}
