mod common;

use arbiter_ledger::{Ledger, LedgerError, GenesisConfig};
use arbiter_store::{AccountStore, AppliedStore, LedgerRootStore};
use arbiter_types::LedgerHash;
use common::*;

#[test]
fn genesis_creates_single_account_at_ledger_zero() {
    let (store, ledger) = ledger_with(&[('a', 5_000)]);
    assert_eq!(ledger.current_ledger_number(), 0);
    assert_eq!(ledger.root().previous_hash, LedgerHash::ZERO);
    assert_eq!(store.account_count().unwrap(), 1);
    assert_eq!(ledger.stake_of(&acct('a')).unwrap(), 5_000);
    assert_eq!(ledger.stake_of(&acct('b')).unwrap(), 0);
    assert_eq!(store.get_ledger_hash().unwrap(), Some(ledger.ledger_hash()));
}

#[test]
fn reopening_reloads_instead_of_rewriting_genesis() {
    let (store, mut ledger) = ledger_with(&[('a', 5_000)]);
    ledger.apply(&[]).unwrap();
    let hash = ledger.ledger_hash();

    let other_genesis = GenesisConfig {
        account_id: acct('f'),
        stake: 1,
    };
    let reopened = Ledger::open(store.clone(), &other_genesis, FEE).unwrap();
    assert_eq!(reopened.current_ledger_number(), 1);
    assert_eq!(reopened.ledger_hash(), hash);
    assert!(reopened.get_account(&acct('f')).unwrap().is_none());
}

#[test]
fn empty_close_still_advances_the_chain() {
    let (_store, mut ledger) = ledger_with(&[('a', 5_000)]);
    let genesis_hash = ledger.ledger_hash();
    let report = ledger.apply(&[]).unwrap();
    assert_eq!(report.ledger_number, 1);
    assert_eq!(report.fees_collected, 0);
    assert_eq!(ledger.root().previous_hash, genesis_hash);
    assert_ne!(ledger.ledger_hash(), genesis_hash);
}

#[test]
fn initiation_pairs_and_charges_both() {
    let (_store, mut ledger) = ledger_with(&[('a', 1_000), ('b', 1_000)]);
    let init = initiation(1, 'a', 'b', 0, 4);
    assert!(ledger.validate(&init).unwrap());

    let report = ledger.apply(&[init]).unwrap();
    assert_eq!(report.applied, vec![tx_id(1)]);
    assert_eq!(report.fees_collected, 2 * FEE);

    let a = ledger.get_account(&acct('a')).unwrap().unwrap();
    let b = ledger.get_account(&acct('b')).unwrap().unwrap();
    assert_eq!(a.stake, 1_000 - FEE);
    assert_eq!(a.in_encounter_with, Some(acct('b')));
    assert_eq!(b.in_encounter_with, Some(acct('a')));
    assert_eq!(a.encounter_begin_at, Some(0));
    assert_eq!(a.encounter_end_by, Some(4));
}

#[test]
fn initiation_rules() {
    let (_store, ledger) = ledger_with(&[('a', 1_000), ('b', 1_000), ('c', 100)]);
    // Stake below the fee.
    assert!(!ledger.validate(&initiation(1, 'a', 'c', 0, 4)).unwrap());
    // Unknown account.
    assert!(!ledger.validate(&initiation(2, 'a', 'd', 0, 4)).unwrap());
    // Self challenge.
    assert!(!ledger.validate(&initiation(3, 'a', 'a', 0, 4)).unwrap());
}

#[test]
fn encounter_moves_skill_zero_sum_and_closes() {
    let (_store, mut ledger) = ledger_with(&[('a', 2_000), ('b', 2_000)]);
    ledger.apply(&[initiation(1, 'a', 'b', 0, 5)]).unwrap();

    let settle = encounter(2, 'b', 'a', false);
    assert!(ledger.validate(&settle).unwrap());
    let report = ledger.apply(&[settle.clone()]).unwrap();
    assert_eq!(report.applied, vec![tx_id(2)]);

    let a = ledger.get_account(&acct('a')).unwrap().unwrap();
    let b = ledger.get_account(&acct('b')).unwrap().unwrap();
    assert_eq!(b.skill, 500);
    assert_eq!(a.skill, -500);
    assert_eq!(a.skill + b.skill, 0);
    assert_eq!(a.stake, 2_000 - 2 * FEE);
    assert!(a.in_encounter_with.is_none() && b.in_encounter_with.is_none());

    // The same encounter cannot be settled twice.
    assert!(!ledger.validate(&settle).unwrap());
}

#[test]
fn tied_encounter_leaves_skill_alone() {
    let (_store, mut ledger) = ledger_with(&[('a', 2_000), ('b', 2_000)]);
    ledger.apply(&[initiation(1, 'a', 'b', 0, 5)]).unwrap();
    ledger.apply(&[encounter(2, 'a', 'b', true)]).unwrap();
    assert_eq!(ledger.get_account(&acct('a')).unwrap().unwrap().skill, 0);
    assert_eq!(ledger.get_account(&acct('b')).unwrap().unwrap().skill, 0);
}

#[test]
fn encounter_after_its_window_is_invalid() {
    let (_store, mut ledger) = ledger_with(&[('a', 2_000), ('b', 2_000)]);
    ledger.apply(&[initiation(1, 'a', 'b', 0, 1)]).unwrap();
    ledger.apply(&[]).unwrap();
    ledger.apply(&[]).unwrap();
    assert_eq!(ledger.current_ledger_number(), 3);
    assert!(!ledger.validate(&encounter(2, 'a', 'b', false)).unwrap());

    // Expired encounters do not block new initiations.
    assert!(ledger.validate(&initiation(3, 'b', 'a', 3, 6)).unwrap());
}

#[test]
fn later_transactions_see_earlier_debits() {
    // 'b' can pay for exactly one initiation.
    let (_store, mut ledger) = ledger_with(&[('a', 5_000), ('b', FEE), ('c', 5_000)]);
    let first = initiation(1, 'a', 'b', 0, 3);
    let second = initiation(2, 'c', 'b', 0, 3);
    assert!(ledger.validate(&first).unwrap());
    assert!(ledger.validate(&second).unwrap());

    let report = ledger.apply(&[second, first]).unwrap();
    assert_eq!(report.applied, vec![tx_id(1)]);
    assert_eq!(report.skipped, vec![tx_id(2)]);
    assert_eq!(report.fees_collected, 2 * FEE);
    assert_eq!(ledger.stake_of(&acct('b')).unwrap(), 0);
    assert_eq!(ledger.stake_of(&acct('c')).unwrap(), 5_000);
}

#[test]
fn coinstake_targets_only_the_previous_ledger() {
    let (_store, mut ledger) = ledger_with(&with_fee_payers(&[('a', 100)]));
    assert!(!ledger.validate(&coinstake('a', 720, 0)).unwrap());
    ledger.apply(&[]).unwrap();
    close_with_fees(&mut ledger);
    assert_eq!(ledger.current_ledger_number(), 2);
    assert!(ledger.validate(&coinstake('a', 720, 1)).unwrap());
    assert!(!ledger.validate(&coinstake('a', 720, 0)).unwrap());
}

#[test]
fn coinstake_cannot_claim_more_than_the_target_close_collected() {
    let (_store, mut ledger) = ledger_with(&with_fee_payers(&[('a', 100)]));
    ledger.apply(&[]).unwrap();

    // Ledger 0 closed without fees, so nothing can be claimed on it.
    let forged = coinstake('a', 1_000_000, 0);
    assert!(!ledger.validate(&forged).unwrap());
    let report = ledger.apply(&[forged.clone()]).unwrap();
    assert_eq!(report.skipped, vec![*forged.id()]);
    assert_eq!(ledger.stake_of(&acct('a')).unwrap(), 100);

    let collected = close_with_fees(&mut ledger);
    assert_eq!(ledger.root().fees_collected, collected);
    assert!(!ledger.validate(&coinstake('a', collected + 1, 2)).unwrap());
    assert!(!ledger.validate(&coinstake('a', 0, 2)).unwrap());
    assert!(ledger.validate(&coinstake('a', collected, 2)).unwrap());
}

#[test]
fn coinstakes_split_by_largest_remainder() {
    let (_store, mut ledger) = ledger_with(&with_fee_payers(&[('c', 100), ('a', 100), ('b', 100)]));
    close_with_fees(&mut ledger);

    let claims = vec![coinstake('a', 1000, 0), coinstake('b', 1000, 0), coinstake('c', 1000, 0)];
    let report = ledger.apply(&claims).unwrap();
    assert_eq!(report.applied.len(), 3);
    assert_eq!(report.fees_collected, 0);

    assert_eq!(ledger.stake_of(&acct('a')).unwrap(), 100 + 334);
    assert_eq!(ledger.stake_of(&acct('b')).unwrap(), 100 + 333);
    assert_eq!(ledger.stake_of(&acct('c')).unwrap(), 100 + 333);
}

#[test]
fn coinstake_pool_is_the_smallest_claim_and_unknown_payees_are_skipped() {
    let (_store, mut ledger) = ledger_with(&with_fee_payers(&[('a', 300), ('b', 100)]));
    close_with_fees(&mut ledger);

    let unknown = coinstake('e', 1000, 0);
    let claims = vec![coinstake('a', 1000, 0), coinstake('b', 400, 0), unknown.clone()];
    let report = ledger.apply(&claims).unwrap();
    assert_eq!(report.skipped, vec![*unknown.id()]);

    assert_eq!(ledger.stake_of(&acct('a')).unwrap(), 300 + 300);
    assert_eq!(ledger.stake_of(&acct('b')).unwrap(), 100 + 100);
}

#[test]
fn late_duplicate_initiation_is_not_applied_again() {
    let (_store, mut ledger) = ledger_with(&[('a', 10_000), ('b', 10_000), ('c', 10_000)]);
    let init = initiation(1, 'b', 'c', 10, 20);
    ledger.apply(&[init.clone()]).unwrap();
    ledger.apply(&[encounter(2, 'b', 'c', false)]).unwrap();
    let stake = ledger.stake_of(&acct('b')).unwrap();
    assert_eq!(stake, 10_000 - 2 * FEE);

    // Both are free again and the window is still open.
    assert!(!ledger.validate(&init).unwrap());
    let report = ledger.apply(&[init]).unwrap();
    assert_eq!(report.skipped, vec![tx_id(1)]);
    assert_eq!(report.fees_collected, 0);
    assert_eq!(ledger.stake_of(&acct('b')).unwrap(), stake);
}

#[test]
fn applied_initiations_are_forgotten_once_their_window_closes() {
    let (store, mut ledger) = ledger_with(&[('a', 10_000), ('b', 10_000)]);
    ledger.apply(&[initiation(1, 'a', 'b', 0, 2)]).unwrap();
    ledger.apply(&[encounter(2, 'a', 'b', true)]).unwrap();
    assert!(store.is_applied(&tx_id(1)).unwrap());

    ledger.apply(&[]).unwrap();
    assert_eq!(ledger.current_ledger_number(), 3);
    assert!(!store.is_applied(&tx_id(1)).unwrap());
    // Encounters stay remembered.
    assert!(store.is_applied(&tx_id(2)).unwrap());
    assert!(!ledger.validate(&encounter(2, 'a', 'b', true)).unwrap());
}

#[test]
fn storage_failure_is_an_error_and_changes_nothing() {
    let (store, mut ledger) = ledger_with(&[('a', 1_000), ('b', 1_000)]);
    let before = ledger.ledger_hash();
    store.fail_commits(true);

    let result = ledger.apply(&[initiation(1, 'a', 'b', 0, 3)]);
    assert!(matches!(result, Err(LedgerError::Store(_))));
    assert_eq!(ledger.ledger_hash(), before);
    assert_eq!(ledger.current_ledger_number(), 0);
    assert_eq!(ledger.stake_of(&acct('a')).unwrap(), 1_000);
}
