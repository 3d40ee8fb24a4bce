//! Blake2b hashing for ledger roots and transaction ids.

use arbiter_types::{LedgerHash, Signature, TxId};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// `H(state_hash ‖ ledger_number_be ‖ previous_hash)`.
pub fn hash_ledger_root(
    state_hash: &LedgerHash,
    ledger_number: u64,
    previous_hash: &LedgerHash,
) -> LedgerHash {
    LedgerHash::new(blake2b_256_multi(&[
        state_hash.as_bytes(),
        &ledger_number.to_be_bytes(),
        previous_hash.as_bytes(),
    ]))
}

/// Transaction id of a client request: the hash of its signature.
pub fn tx_id_from_signature(signature: &Signature) -> TxId {
    TxId::new(blake2b_256(signature.as_bytes()))
}
