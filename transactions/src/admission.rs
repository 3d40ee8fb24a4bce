//! Stateless admission of client requests.

use arbiter_crypto::tx_id_from_signature;
use arbiter_types::AccountId;

use crate::encounter::verify_encounter;
use crate::error::AdmissionError;
use crate::initiation::verify_initiation;
use crate::payload::{CloseEncounter, PostInitiateEncounter, QueryState, RequestKind};
use crate::signed::SignedStructure;
use crate::summary::{EncounterSummary, InitiationSummary, TransactionSummary};
use crate::SignatureVerifier;

/// What an accepted request turned into.
#[derive(Clone, Debug)]
pub enum Admitted {
    /// A read to answer directly from the ledger.
    Query(QueryState),
    /// A transaction to hand to consensus.
    Transaction(TransactionSummary),
}

/// Verify the outer signature of `request`, dispatch on its name and build
/// the matching [`Admitted`] value.
///
/// Transactions must be posted by one of their participants. An
/// initiation's id is derived from the request signature, so resubmitting
/// the same request yields the same id. An encounter's id is derived from
/// the signature of the transcript's resolution, so the same game has one
/// id whichever participant posts it.
pub fn admit(
    request: &SignedStructure,
    verifier: &dyn SignatureVerifier,
) -> Result<Admitted, AdmissionError> {
    let poster = request.verify(verifier)?;
    let kind = RequestKind::from_name(&request.name)?;

    match kind {
        RequestKind::QueryState => Ok(Admitted::Query(request.decode()?)),
        RequestKind::PostInitiateEncounter => {
            let payload: PostInitiateEncounter = request.decode()?;
            let terms = verify_initiation(&payload)?;
            require_participant(&poster, &terms.challenger, &terms.defender)?;
            Ok(Admitted::Transaction(
                InitiationSummary {
                    id: tx_id_from_signature(&request.signature_bytes()?),
                    challenger: terms.challenger,
                    defender: terms.defender,
                    begin_by: terms.begin_by,
                    end_by: terms.end_by,
                }
                .into(),
            ))
        }
        RequestKind::CloseEncounter => {
            let payload: CloseEncounter = request.decode()?;
            let verdict = verify_encounter(&payload, verifier)?;
            require_participant(&poster, &verdict.challenger, &verdict.defender)?;
            Ok(Admitted::Transaction(
                EncounterSummary {
                    id: tx_id_from_signature(&verdict.resolution),
                    winner: verdict.winner,
                    loser: verdict.loser,
                    was_tied: verdict.was_tied,
                }
                .into(),
            ))
        }
    }
}

fn require_participant(
    poster: &AccountId,
    challenger: &AccountId,
    defender: &AccountId,
) -> Result<(), AdmissionError> {
    if poster == challenger || poster == defender {
        Ok(())
    } else {
        Err(AdmissionError::NotAParticipant)
    }
}
