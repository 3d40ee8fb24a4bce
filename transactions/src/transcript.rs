//! Construction of signed encounter transcripts.
//!
//! Players use this to produce the moves a `CloseEncounter` carries; the
//! node's tests use it to drive real encounters through admission.

use arbiter_crypto::derive_account_id;
use arbiter_types::KeyPair;

use crate::encounter::{MOVE_COUNT, ROUNDS};
use crate::error::AdmissionError;
use crate::hand::{commitment_digest, Hand};
use crate::payload::{CloseEncounter, Commitment, Payload, Resolution, Reveal};
use crate::signed::SignedStructure;

pub struct TranscriptBuilder<'a> {
    challenger: &'a KeyPair,
    defender: &'a KeyPair,
    opening: String,
    /// `(defender, challenger)` per round.
    rounds: Vec<(Hand, Hand)>,
}

impl<'a> TranscriptBuilder<'a> {
    pub fn new(challenger: &'a KeyPair, defender: &'a KeyPair) -> Self {
        Self {
            challenger,
            defender,
            opening: String::new(),
            rounds: Vec::with_capacity(ROUNDS),
        }
    }

    /// The `prev` of the first move, normally the initiation's signature.
    pub fn opening(mut self, prev: impl Into<String>) -> Self {
        self.opening = prev.into();
        self
    }

    pub fn round(mut self, defender: Hand, challenger: Hand) -> Self {
        self.rounds.push((defender, challenger));
        self
    }

    /// Sign all moves in order, each linked to the one before it.
    pub fn build(&self) -> Result<Vec<SignedStructure>, AdmissionError> {
        if self.rounds.len() != ROUNDS {
            return Err(AdmissionError::MoveCount {
                count: self.rounds.len() * 4 + 1,
                expected: MOVE_COUNT,
            });
        }
        let mut moves: Vec<SignedStructure> = Vec::with_capacity(MOVE_COUNT);
        let mut prev = self.opening.clone();
        let mut push = |mv: SignedStructure, prev: &mut String| {
            *prev = mv.signature.clone();
            moves.push(mv);
        };

        for (round, (d_hand, c_hand)) in self.rounds.iter().enumerate() {
            let d_secret = format!("{}:defender:{round}", self.opening);
            let c_secret = format!("{}:challenger:{round}", self.opening);

            let d_commit = commit(&prev, &d_secret, *d_hand, self.defender)?;
            push(d_commit, &mut prev);
            let c_commit = commit(&prev, &c_secret, *c_hand, self.challenger)?;
            push(c_commit, &mut prev);
            let d_reveal = reveal(&prev, &d_secret, *d_hand, self.defender)?;
            push(d_reveal, &mut prev);
            let c_reveal = reveal(&prev, &c_secret, *c_hand, self.challenger)?;
            push(c_reveal, &mut prev);
        }
        let resolution = SignedStructure::sign(&Resolution { prev: prev.clone() }, self.defender)?;
        push(resolution, &mut prev);
        Ok(moves)
    }

    pub fn close_encounter(&self) -> Result<CloseEncounter, AdmissionError> {
        Ok(CloseEncounter {
            challenger: derive_account_id(&self.challenger.public),
            defender: derive_account_id(&self.defender.public),
            moves: self.build()?,
        })
    }
}

fn commit(prev: &str, secret: &str, hand: Hand, keys: &KeyPair) -> Result<SignedStructure, AdmissionError> {
    SignedStructure::sign(
        &Commitment {
            prev: prev.to_string(),
            commitment: commitment_digest(secret, hand.as_str()),
        },
        keys,
    )
}

fn reveal(prev: &str, secret: &str, hand: Hand, keys: &KeyPair) -> Result<SignedStructure, AdmissionError> {
    SignedStructure::sign(
        &Reveal {
            prev: prev.to_string(),
            secret: secret.to_string(),
            value: hand.as_str().to_string(),
        },
        keys,
    )
}
