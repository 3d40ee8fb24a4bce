//! Structural checks on an encounter initiation.

use arbiter_types::AccountId;

use crate::error::AdmissionError;
use crate::payload::PostInitiateEncounter;

/// The terms an initiation commits the ledger to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitiationTerms {
    pub challenger: AccountId,
    pub defender: AccountId,
    pub begin_by: u64,
    pub end_by: u64,
}

/// Extract the terms of `payload`. Whether the ledger can honour them is
/// decided later, against ledger state.
pub fn verify_initiation(payload: &PostInitiateEncounter) -> Result<InitiationTerms, AdmissionError> {
    for id in [&payload.challenger, &payload.defender] {
        if !id.is_well_formed() {
            return Err(AdmissionError::Malformed(format!("account id {id}")));
        }
    }
    if payload.challenger == payload.defender {
        return Err(AdmissionError::SelfChallenge);
    }
    if payload.begin_by > payload.end_by {
        return Err(AdmissionError::InvalidWindow {
            begin_by: payload.begin_by,
            end_by: payload.end_by,
        });
    }
    Ok(InitiationTerms {
        challenger: payload.challenger.clone(),
        defender: payload.defender.clone(),
        begin_by: payload.begin_by,
        end_by: payload.end_by,
    })
}
