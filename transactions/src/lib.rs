//! Client requests and the transactions the ledger applies.
//!
//! Requests arrive as [`SignedStructure`]s whose `name` selects the payload
//! type. Admission is stateless: it checks signatures, replays encounter
//! transcripts and produces a [`TransactionSummary`], the only form a
//! transaction takes inside consensus and the ledger.
//!
//! Summary kinds:
//! - **Initiation**: pairs a challenger and a defender for a ledger window
//! - **Encounter**: settles a finished game, moving skill from loser to winner
//! - **Coinstake**: a voter's claim on the fees collected by a closed ledger

pub mod admission;
pub mod encounter;
pub mod error;
pub mod hand;
pub mod initiation;
pub mod payload;
pub mod signed;
pub mod summary;
pub mod transcript;

pub use admission::{admit, Admitted};
pub use arbiter_crypto::SignatureVerifier;
pub use encounter::{verify_encounter, EncounterVerdict, MOVE_COUNT, TIE_NOTE};
pub use error::AdmissionError;
pub use hand::{commitment_digest, Hand};
pub use initiation::{verify_initiation, InitiationTerms};
pub use payload::{
    AccountState, CloseEncounter, Commitment, ErrorReport, Payload, PostInitiateEncounter,
    QueryState, RequestKind, Resolution, Reveal,
};
pub use signed::SignedStructure;
pub use summary::{CoinstakeSummary, EncounterSummary, InitiationSummary, TransactionSummary};
pub use transcript::TranscriptBuilder;
