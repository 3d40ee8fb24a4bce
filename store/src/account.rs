//! Account storage trait.

use arbiter_types::AccountId;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// One ledger row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: AccountId,
    pub stake: u64,
    pub skill: i64,
    /// Opponent of the current encounter, if any.
    pub in_encounter_with: Option<AccountId>,
    /// Ledger number at which the current encounter was initiated.
    pub encounter_begin_at: Option<u64>,
    /// Last ledger number at which the current encounter may be closed.
    pub encounter_end_by: Option<u64>,
    pub partial_chain_length: u64,
}

impl AccountRecord {
    /// A fresh row: no encounter, zero skill.
    pub fn new(account_id: AccountId, stake: u64) -> Self {
        Self {
            account_id,
            stake,
            skill: 0,
            in_encounter_with: None,
            encounter_begin_at: None,
            encounter_end_by: None,
            partial_chain_length: 0,
        }
    }

    /// Whether an encounter is open as of `ledger_number`. Encounters
    /// expire once the ledger number passes `encounter_end_by`.
    pub fn in_unexpired_encounter(&self, ledger_number: u64) -> bool {
        match (&self.in_encounter_with, self.encounter_end_by) {
            (Some(_), Some(end_by)) => ledger_number <= end_by,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn clear_encounter(&mut self) {
        self.in_encounter_with = None;
        self.encounter_begin_at = None;
        self.encounter_end_by = None;
    }
}

pub trait AccountStore {
    fn get_account(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError>;

    fn exists(&self, id: &AccountId) -> Result<bool, StoreError> {
        Ok(self.get_account(id)?.is_some())
    }

    fn account_count(&self) -> Result<u64, StoreError>;

    /// All rows, in ascending account id order.
    fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encounters_expire_after_end_by() {
        let mut row = AccountRecord::new(AccountId::new("a".repeat(64)), 1000);
        assert!(!row.in_unexpired_encounter(0));
        row.in_encounter_with = Some(AccountId::new("b".repeat(64)));
        row.encounter_begin_at = Some(2);
        row.encounter_end_by = Some(5);
        assert!(row.in_unexpired_encounter(5));
        assert!(!row.in_unexpired_encounter(6));
        row.clear_encounter();
        assert!(!row.in_unexpired_encounter(3));
    }
}
