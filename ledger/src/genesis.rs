//! Genesis: the single account a network starts with.

use arbiter_store::AccountRecord;
use arbiter_types::AccountId;
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Configuration of ledger 0.
///
/// Every voter of a network must use the same values, otherwise their
/// genesis hashes differ and they never agree on a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Id of the only account that exists at ledger 0.
    pub account_id: AccountId,
    /// Its initial stake.
    pub stake: u64,
}

impl GenesisConfig {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.account_id.is_well_formed() {
            return Err(LedgerError::InvalidGenesis(format!(
                "account id {} is not 64 lowercase hex characters",
                self.account_id
            )));
        }
        Ok(())
    }

    pub(crate) fn genesis_row(&self) -> AccountRecord {
        AccountRecord::new(self.account_id.clone(), self.stake)
    }
}
