//! Logistic skill update.

use arbiter_types::params::SKILL_K;

/// Skill points the winner takes from the loser.
///
/// `d = 1 / (1 + e^((w - l) / K))` is the probability the winner was
/// expected to lose; the transfer is `round(d * K)`. An upset moves more
/// than an expected win, and the transfer is always in `0..=K`.
pub fn skill_delta(winner_skill: i64, loser_skill: i64) -> i64 {
    let k = SKILL_K as f64;
    let d = 1.0 / (1.0 + ((winner_skill as f64 - loser_skill as f64) / k).exp());
    (d * k).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_match_moves_half_of_k() {
        assert_eq!(skill_delta(0, 0), 500);
    }

    #[test]
    fn upsets_move_more() {
        let expected = skill_delta(2000, 0);
        let upset = skill_delta(0, 2000);
        assert!(upset > expected);
        assert_eq!(expected + upset, SKILL_K);
    }

    #[test]
    fn extreme_gaps_stay_in_range() {
        assert_eq!(skill_delta(i64::MAX / 2, 0), 0);
        assert_eq!(skill_delta(0, i64::MAX / 2), SKILL_K);
    }
}
