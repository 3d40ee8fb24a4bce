#![allow(dead_code)]

use std::sync::Arc;

use arbiter_ledger::{GenesisConfig, Ledger};
use arbiter_nullables::NullStore;
use arbiter_store::AccountRecord;
use arbiter_transactions::{
    CoinstakeSummary, EncounterSummary, InitiationSummary, TransactionSummary,
};
use arbiter_types::{AccountId, TxId};

pub const FEE: u64 = 360;

pub fn acct(c: char) -> AccountId {
    AccountId::new(c.to_string().repeat(64))
}

pub fn tx_id(n: u8) -> TxId {
    TxId::new([n; 32])
}

/// A ledger whose genesis account is the first entry and whose other
/// accounts are seeded into the store before genesis is written.
pub fn ledger_with(accounts: &[(char, u64)]) -> (Arc<NullStore>, Ledger) {
    let store = Arc::new(NullStore::new());
    for (c, stake) in &accounts[1..] {
        store.insert_account(AccountRecord::new(acct(*c), *stake));
    }
    let genesis = GenesisConfig {
        account_id: acct(accounts[0].0),
        stake: accounts[0].1,
    };
    let ledger = Ledger::open(store.clone(), &genesis, FEE).expect("open ledger");
    (store, ledger)
}

/// Accounts that only exist to pay fees, two initiations' worth.
pub const FEE_PAYERS: [(char, u64); 4] = [('w', 5_000), ('x', 5_000), ('y', 5_000), ('z', 5_000)];

/// Close the current ledger with two initiations among [`FEE_PAYERS`], so
/// the next ledger can pay out up to `4 * FEE` in coinstakes.
pub fn close_with_fees(ledger: &mut Ledger) -> u64 {
    let from = ledger.current_ledger_number();
    let report = ledger
        .apply(&[
            initiation(200, 'w', 'x', from, from + 9),
            initiation(201, 'y', 'z', from, from + 9),
        ])
        .expect("close with fees");
    assert_eq!(report.fees_collected, 4 * FEE);
    report.fees_collected
}

/// `accounts` followed by [`FEE_PAYERS`].
pub fn with_fee_payers(accounts: &[(char, u64)]) -> Vec<(char, u64)> {
    accounts.iter().chain(FEE_PAYERS.iter()).copied().collect()
}

pub fn initiation(n: u8, challenger: char, defender: char, begin_by: u64, end_by: u64) -> TransactionSummary {
    InitiationSummary {
        id: tx_id(n),
        challenger: acct(challenger),
        defender: acct(defender),
        begin_by,
        end_by,
    }
    .into()
}

pub fn encounter(n: u8, winner: char, loser: char, was_tied: bool) -> TransactionSummary {
    EncounterSummary {
        id: tx_id(n),
        winner: acct(winner),
        loser: acct(loser),
        was_tied,
    }
    .into()
}

pub fn coinstake(payee: char, total_fees: u64, target: u64) -> TransactionSummary {
    CoinstakeSummary::new(acct(payee), total_fees, target).into()
}
