//! Rock-paper-scissors hands and their commitments.

use arbiter_crypto::blake2b_256_multi;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    /// Wire form of a revealed value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "R",
            Self::Paper => "P",
            Self::Scissors => "S",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "R" => Some(Self::Rock),
            "P" => Some(Self::Paper),
            "S" => Some(Self::Scissors),
            _ => None,
        }
    }

    /// Paper beats rock, rock beats scissors, scissors beats paper.
    pub fn beats(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Paper, Self::Rock) | (Self::Rock, Self::Scissors) | (Self::Scissors, Self::Paper)
        )
    }
}

/// `hex(Blake2b(secret ‖ ":" ‖ value))`, the value a commitment move carries.
pub fn commitment_digest(secret: &str, value: &str) -> String {
    hex::encode(blake2b_256_multi(&[
        secret.as_bytes(),
        b":",
        value.as_bytes(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_cyclic() {
        assert!(Hand::Paper.beats(Hand::Rock));
        assert!(Hand::Rock.beats(Hand::Scissors));
        assert!(Hand::Scissors.beats(Hand::Paper));
        assert!(!Hand::Rock.beats(Hand::Paper));
        assert!(!Hand::Rock.beats(Hand::Rock));
    }

    #[test]
    fn parse_accepts_only_wire_letters() {
        for hand in [Hand::Rock, Hand::Paper, Hand::Scissors] {
            assert_eq!(Hand::parse(hand.as_str()), Some(hand));
        }
        assert_eq!(Hand::parse("rock"), None);
    }

    #[test]
    fn commitment_depends_on_secret_and_value() {
        let c = commitment_digest("s3cret", "R");
        assert_eq!(c.len(), 64);
        assert_ne!(c, commitment_digest("s3cret", "P"));
        assert_ne!(c, commitment_digest("other", "R"));
    }
}
