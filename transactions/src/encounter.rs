//! Replay of a finished rock-paper-scissors transcript.
//!
//! A transcript is three rounds of commit/commit/reveal/reveal followed by
//! a resolution. Even-indexed moves come from the defender, odd-indexed
//! moves from the challenger, and from index 2 on each move names the
//! previous move's signature in `prev`.

use arbiter_types::{AccountId, Signature};
use serde::Deserialize;

use crate::error::AdmissionError;
use crate::hand::{commitment_digest, Hand};
use crate::payload::{CloseEncounter, Commitment, Payload, Resolution, Reveal};
use crate::signed::SignedStructure;
use crate::SignatureVerifier;

/// Number of rounds in one encounter.
pub const ROUNDS: usize = 3;

/// Moves in a complete transcript.
pub const MOVE_COUNT: usize = ROUNDS * 4 + 1;

/// Note attached to a verdict with equal points.
pub const TIE_NOTE: &str = "tie";

const MOVE_TYPES: [&str; MOVE_COUNT] = [
    Commitment::NAME,
    Commitment::NAME,
    Reveal::NAME,
    Reveal::NAME,
    Commitment::NAME,
    Commitment::NAME,
    Reveal::NAME,
    Reveal::NAME,
    Commitment::NAME,
    Commitment::NAME,
    Reveal::NAME,
    Reveal::NAME,
    Resolution::NAME,
];

/// The `prev` field every move type carries.
#[derive(Deserialize)]
struct Linked {
    prev: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncounterVerdict {
    pub challenger: AccountId,
    pub defender: AccountId,
    pub winner: AccountId,
    pub loser: AccountId,
    pub defender_points: u32,
    pub challenger_points: u32,
    pub was_tied: bool,
    pub note: Option<&'static str>,
    /// Signature of the closing move; it names the transcript whoever posts it.
    pub resolution: Signature,
}

/// Check every move of `payload` and score the game.
///
/// On a tie `winner` is the challenger and `loser` the defender; callers
/// must look at `was_tied` before moving skill.
pub fn verify_encounter(
    payload: &CloseEncounter,
    verifier: &dyn SignatureVerifier,
) -> Result<EncounterVerdict, AdmissionError> {
    let (challenger, defender) = (&payload.challenger, &payload.defender);
    if !challenger.is_well_formed() || !defender.is_well_formed() {
        return Err(AdmissionError::Malformed("participant id".into()));
    }
    if challenger == defender {
        return Err(AdmissionError::SelfChallenge);
    }
    let moves = &payload.moves;
    if moves.len() != MOVE_COUNT {
        return Err(AdmissionError::MoveCount {
            count: moves.len(),
            expected: MOVE_COUNT,
        });
    }

    let mut defender_hands = Vec::with_capacity(ROUNDS);
    let mut challenger_hands = Vec::with_capacity(ROUNDS);

    for (index, mv) in moves.iter().enumerate() {
        let (expected_signer, role) = if index % 2 == 0 {
            (defender, "defender")
        } else {
            (challenger, "challenger")
        };
        if mv.verify(verifier)? != *expected_signer {
            return Err(AdmissionError::WrongSigner {
                index,
                expected: role,
            });
        }

        if index > 1 {
            let linked: Linked = serde_json::from_str(&mv.payload)?;
            if linked.prev != moves[index - 1].signature {
                return Err(AdmissionError::ChainLinkage { index });
            }
        }

        let expected_type = MOVE_TYPES[index];
        if mv.name != expected_type {
            return Err(AdmissionError::UnexpectedMove {
                index,
                expected: expected_type,
            });
        }

        if expected_type == Reveal::NAME {
            let hand = open_reveal(index, mv, &moves[index - 2])?;
            if index % 2 == 0 {
                defender_hands.push(hand);
            } else {
                challenger_hands.push(hand);
            }
        }
    }

    let resolution = moves[MOVE_COUNT - 1].signature_bytes()?;

    let (mut defender_points, mut challenger_points) = (0u32, 0u32);
    for (d, c) in defender_hands.iter().zip(&challenger_hands) {
        if d.beats(*c) {
            defender_points += 1;
        } else if c.beats(*d) {
            challenger_points += 1;
        }
    }

    let was_tied = defender_points == challenger_points;
    let (winner, loser) = if defender_points > challenger_points {
        (defender.clone(), challenger.clone())
    } else {
        (challenger.clone(), defender.clone())
    };
    Ok(EncounterVerdict {
        challenger: challenger.clone(),
        defender: defender.clone(),
        winner,
        loser,
        defender_points,
        challenger_points,
        was_tied,
        note: was_tied.then_some(TIE_NOTE),
        resolution,
    })
}

/// A reveal must open the commitment its author made two moves earlier.
fn open_reveal(
    index: usize,
    reveal: &SignedStructure,
    commitment: &SignedStructure,
) -> Result<Hand, AdmissionError> {
    let reveal: Reveal = reveal.decode()?;
    let commitment: Commitment = commitment.decode()?;
    if commitment_digest(&reveal.secret, &reveal.value) != commitment.commitment {
        return Err(AdmissionError::CommitmentMismatch { index });
    }
    Hand::parse(&reveal.value).ok_or(AdmissionError::InvalidHand { index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptBuilder;
    use arbiter_crypto::{derive_account_id, keypair_from_seed, Ed25519Verifier};
    use arbiter_types::KeyPair;

    fn players() -> (KeyPair, KeyPair) {
        (keypair_from_seed(&[1u8; 32]), keypair_from_seed(&[2u8; 32]))
    }

    fn close(challenger: &KeyPair, defender: &KeyPair, rounds: [(Hand, Hand); 3]) -> CloseEncounter {
        let mut builder = TranscriptBuilder::new(challenger, defender);
        for (d, c) in rounds {
            builder = builder.round(d, c);
        }
        builder.close_encounter().unwrap()
    }

    #[test]
    fn scores_rounds_and_detects_ties() {
        let (c, d) = players();
        let payload = close(
            &c,
            &d,
            [
                (Hand::Paper, Hand::Rock),
                (Hand::Rock, Hand::Rock),
                (Hand::Scissors, Hand::Rock),
            ],
        );
        let verdict = verify_encounter(&payload, &Ed25519Verifier).unwrap();
        assert_eq!(verdict.defender_points, 1);
        assert_eq!(verdict.challenger_points, 1);
        assert!(verdict.was_tied);
        assert_eq!(verdict.note, Some(TIE_NOTE));

        let payload = close(
            &c,
            &d,
            [
                (Hand::Paper, Hand::Rock),
                (Hand::Rock, Hand::Scissors),
                (Hand::Scissors, Hand::Rock),
            ],
        );
        let verdict = verify_encounter(&payload, &Ed25519Verifier).unwrap();
        assert_eq!((verdict.defender_points, verdict.challenger_points), (2, 1));
        assert!(!verdict.was_tied);
        assert_eq!(verdict.winner, derive_account_id(&d.public));
        assert_eq!(verdict.loser, derive_account_id(&c.public));
        assert_eq!(verdict.note, None);
    }

    #[test]
    fn broken_chain_reports_the_move() {
        let (c, d) = players();
        let mut payload = close(&c, &d, [(Hand::Rock, Hand::Paper); 3]);
        // Move 5 is the challenger's second commitment.
        let mut commit: Commitment = payload.moves[5].decode().unwrap();
        commit.prev = "00".repeat(64);
        payload.moves[5] = SignedStructure::sign(&commit, &c).unwrap();

        assert_eq!(
            verify_encounter(&payload, &Ed25519Verifier),
            Err(AdmissionError::ChainLinkage { index: 5 })
        );
    }

    #[test]
    fn moves_signed_by_the_wrong_player_are_rejected() {
        let (c, d) = players();
        let mut payload = close(&c, &d, [(Hand::Rock, Hand::Paper); 3]);
        let commit: Commitment = payload.moves[0].decode().unwrap();
        payload.moves[0] = SignedStructure::sign(&commit, &c).unwrap();
        assert_eq!(
            verify_encounter(&payload, &Ed25519Verifier),
            Err(AdmissionError::WrongSigner {
                index: 0,
                expected: "defender"
            })
        );
    }

    #[test]
    fn reveal_must_open_commitment() {
        let (c, d) = players();
        let mut payload = close(&c, &d, [(Hand::Rock, Hand::Paper); 3]);
        let mut reveal: Reveal = payload.moves[2].decode().unwrap();
        reveal.value = Hand::Paper.as_str().to_string();
        payload.moves[2] = SignedStructure::sign(&reveal, &d).unwrap();
        assert_eq!(
            verify_encounter(&payload, &Ed25519Verifier),
            Err(AdmissionError::CommitmentMismatch { index: 2 })
        );
    }

    #[test]
    fn truncated_transcripts_are_rejected() {
        let (c, d) = players();
        let mut payload = close(&c, &d, [(Hand::Rock, Hand::Paper); 3]);
        payload.moves.pop();
        assert_eq!(
            verify_encounter(&payload, &Ed25519Verifier),
            Err(AdmissionError::MoveCount {
                count: 12,
                expected: MOVE_COUNT
            })
        );
    }
}
