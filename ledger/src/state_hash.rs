//! Flat rolling hash over every account row.

use arbiter_crypto::blake2b_256_multi;
use arbiter_store::AccountRecord;
use arbiter_types::LedgerHash;

/// Hash all rows in ascending account id order.
///
/// Rows are sorted here, so callers may pass them in any order. Each row
/// is encoded field by field with fixed-width big-endian integers and a
/// presence byte in front of optional fields.
pub fn compute_state_hash(rows: &[AccountRecord]) -> LedgerHash {
    let mut sorted: Vec<&AccountRecord> = rows.iter().collect();
    sorted.sort_by(|a, b| a.account_id.cmp(&b.account_id));

    let encoded: Vec<Vec<u8>> = sorted.into_iter().map(encode_row).collect();
    let parts: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
    LedgerHash::new(blake2b_256_multi(&parts))
}

fn encode_row(row: &AccountRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(160);
    out.extend_from_slice(row.account_id.as_str().as_bytes());
    out.extend_from_slice(&row.stake.to_be_bytes());
    out.extend_from_slice(&row.skill.to_be_bytes());
    match &row.in_encounter_with {
        Some(opponent) => {
            out.push(1);
            out.extend_from_slice(opponent.as_str().as_bytes());
        }
        None => out.push(0),
    }
    for field in [row.encounter_begin_at, row.encounter_end_by] {
        match field {
            Some(n) => {
                out.push(1);
                out.extend_from_slice(&n.to_be_bytes());
            }
            None => out.push(0),
        }
    }
    out.extend_from_slice(&row.partial_chain_length.to_be_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_types::AccountId;

    fn row(c: char, stake: u64) -> AccountRecord {
        AccountRecord::new(AccountId::new(c.to_string().repeat(64)), stake)
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = compute_state_hash(&[row('a', 1), row('b', 2)]);
        let b = compute_state_hash(&[row('b', 2), row('a', 1)]);
        assert_eq!(a, b);
    }

    #[test]
    fn every_column_is_covered() {
        let base = row('a', 1);
        let h = compute_state_hash(&[base.clone()]);

        let mut skill = base.clone();
        skill.skill = -1;
        assert_ne!(h, compute_state_hash(&[skill]));

        let mut chain = base.clone();
        chain.partial_chain_length = 1;
        assert_ne!(h, compute_state_hash(&[chain]));

        let mut encounter = base;
        encounter.encounter_end_by = Some(0);
        assert_ne!(h, compute_state_hash(&[encounter]));
    }
}
