//! Largest-remainder apportionment in exact integer arithmetic.

use arbiter_types::AccountId;

/// Split `pool` among `claimants` in proportion to their stake.
///
/// Each claimant first receives `floor(pool * stake / total)`. The units
/// left over are handed out one at a time in order of descending
/// fractional remainder, then descending ideal reward, then ascending
/// account id. The result is in input order and always sums to `pool`,
/// unless the total stake is zero, in which case nobody receives anything.
pub fn apportion(pool: u64, claimants: &[(AccountId, u64)]) -> Vec<u64> {
    let total: u128 = claimants.iter().map(|(_, stake)| u128::from(*stake)).sum();
    if total == 0 {
        return vec![0; claimants.len()];
    }

    // Numerators over the common denominator `total`.
    let numerators: Vec<u128> = claimants
        .iter()
        .map(|(_, stake)| u128::from(pool) * u128::from(*stake))
        .collect();
    let mut awards: Vec<u64> = numerators
        .iter()
        .map(|n| (n / total) as u64)
        .collect();

    let awarded: u64 = awards.iter().sum();
    let leftover = pool - awarded;

    let mut order: Vec<usize> = (0..claimants.len()).collect();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (numerators[a] % total, numerators[b] % total);
        rb.cmp(&ra)
            .then_with(|| numerators[b].cmp(&numerators[a]))
            .then_with(|| claimants[a].0.cmp(&claimants[b].0))
    });
    for &i in order.iter().take(leftover as usize) {
        awards[i] += 1;
    }
    awards
}
