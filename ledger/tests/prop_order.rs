mod common;

use proptest::prelude::*;

use common::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Two voters handed the same transactions in different orders close
    /// identical ledgers.
    #[test]
    fn state_hash_is_order_independent(seed in any::<u64>(), fees in prop::collection::vec(0u64..2_000, 3)) {
        let accounts = with_fee_payers(&[('a', 1_000), ('b', 800), ('c', 600), ('d', 400)]);
        let mut txs = vec![
            initiation(7, 'a', 'b', 1, 4),
            initiation(3, 'c', 'b', 1, 4),
            initiation(9, 'c', 'd', 1, 4),
            coinstake('a', fees[0], 0),
            coinstake('b', fees[1], 0),
            coinstake('d', fees[2], 0),
        ];

        let (_s1, mut first) = ledger_with(&accounts);
        let (_s2, mut second) = ledger_with(&accounts);
        close_with_fees(&mut first);
        close_with_fees(&mut second);

        let r1 = first.apply(&txs).unwrap();
        // Deterministic shuffle driven by the seed.
        let len = txs.len();
        let mut state = seed;
        for i in (1..len).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            txs.swap(i, (state >> 33) as usize % (i + 1));
        }
        let r2 = second.apply(&txs).unwrap();

        prop_assert_eq!(r1.ledger_hash, r2.ledger_hash);
        prop_assert_eq!(r1.applied, r2.applied);
        prop_assert_eq!(r1.skipped, r2.skipped);
    }

    /// Apportionment always pays out the whole pool when anyone has stake.
    #[test]
    fn apportionment_conserves_the_pool(
        pool in 0u64..1_000_000,
        stakes in prop::collection::vec(1u64..1_000_000, 1..8),
    ) {
        let claimants: Vec<_> = stakes
            .iter()
            .enumerate()
            .map(|(i, s)| (arbiter_types::AccountId::new(format!("{i:064x}")), *s))
            .collect();
        let awards = arbiter_ledger::apportion(pool, &claimants);
        prop_assert_eq!(awards.iter().sum::<u64>(), pool);
    }
}
