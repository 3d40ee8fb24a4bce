//! Transaction summaries: what consensus votes on and the ledger applies.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use arbiter_crypto::blake2b_256_multi;
use arbiter_types::{AccountId, TxId};
use serde::{Deserialize, Serialize};

const COINSTAKE_DOMAIN: &[u8] = b"arbiter/coinstake";

/// Pair `challenger` and `defender` until `end_by`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiationSummary {
    pub id: TxId,
    pub challenger: AccountId,
    pub defender: AccountId,
    pub begin_by: u64,
    pub end_by: u64,
}

/// Close the encounter between `winner` and `loser`. When `was_tied` the
/// two roles are interchangeable and no skill moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub id: TxId,
    pub winner: AccountId,
    pub loser: AccountId,
    pub was_tied: bool,
}

/// A voter's claim on the fees collected while closing ledger
/// `target_ledger_number`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinstakeSummary {
    pub id: TxId,
    pub payee: AccountId,
    pub total_fees: u64,
    pub target_ledger_number: u64,
}

impl CoinstakeSummary {
    pub fn new(payee: AccountId, total_fees: u64, target_ledger_number: u64) -> Self {
        let id = Self::derive_id(&payee, total_fees, target_ledger_number);
        Self {
            id,
            payee,
            total_fees,
            target_ledger_number,
        }
    }

    fn derive_id(payee: &AccountId, total_fees: u64, target_ledger_number: u64) -> TxId {
        TxId::new(blake2b_256_multi(&[
            COINSTAKE_DOMAIN,
            payee.as_str().as_bytes(),
            &target_ledger_number.to_be_bytes(),
            &total_fees.to_be_bytes(),
        ]))
    }

    /// Whether `id` is the one derived from the other fields. Gossiped
    /// claims failing this are forgeries.
    pub fn has_consistent_id(&self) -> bool {
        self.id == Self::derive_id(&self.payee, self.total_fees, self.target_ledger_number)
    }
}

/// A transaction in the form consensus and the ledger work with.
///
/// Equality, ordering and hashing consider only the id; ascending id is the
/// order every voter applies in.
#[derive(Clone, Debug)]
pub enum TransactionSummary {
    Initiation(InitiationSummary),
    Encounter(EncounterSummary),
    Coinstake(CoinstakeSummary),
}

impl TransactionSummary {
    pub fn id(&self) -> &TxId {
        match self {
            Self::Initiation(s) => &s.id,
            Self::Encounter(s) => &s.id,
            Self::Coinstake(s) => &s.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Initiation(_) => "initiation",
            Self::Encounter(_) => "encounter",
            Self::Coinstake(_) => "coinstake",
        }
    }

    /// Whether applying this transaction debits the fee from two accounts.
    pub fn charges_fee(&self) -> bool {
        !matches!(self, Self::Coinstake(_))
    }
}

impl PartialEq for TransactionSummary {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for TransactionSummary {}

impl PartialOrd for TransactionSummary {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TransactionSummary {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(other.id())
    }
}

impl Hash for TransactionSummary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl From<InitiationSummary> for TransactionSummary {
    fn from(s: InitiationSummary) -> Self {
        Self::Initiation(s)
    }
}

impl From<EncounterSummary> for TransactionSummary {
    fn from(s: EncounterSummary) -> Self {
        Self::Encounter(s)
    }
}

impl From<CoinstakeSummary> for TransactionSummary {
    fn from(s: CoinstakeSummary) -> Self {
        Self::Coinstake(s)
    }
}
