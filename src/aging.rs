// Written in 2024 by the r3vcoin developers
// SPDX-License-Identifier: CC0-1.0

//! Component C2: the coin-aging curve.
//!
//! `coin_age_weight` is consensus-critical floating-point: every
//! implementation on the network must agree bit-for-bit under IEEE-754
//! double precision. Do not "simplify" the polynomial.

/// Weights the interval `[t0, t1)` in seconds, applying `stake_min_age` as a
/// dead zone and `stake_max_age` as a ceiling.
///
/// Returns 0 if `t0 <= 0` (defensive: an unset/sentinel timestamp must never
/// contribute weight) or if the interval does not clear `stake_min_age`.
pub fn coin_age_weight(t0: i64, t1: i64, stake_min_age: i64, stake_max_age: i64) -> i64 {
    if t0 <= 0 {
        return 0;
    }
    let s = (t1 - t0 - stake_min_age).max(0);
    let d = s as f64 / 86_400.0;

    let w = if d <= 7.0 {
        -0.004_081_63 * d * d * d + 0.057_142_86 * d * d + d
    } else {
        8.4 * d.ln() - 7.945_645_25
    };

    let weighted_seconds = (w * 86_400.0).floor() as i64;
    weighted_seconds.min(stake_max_age).max(0)
}

/// The linear alternative curve some forks of this lineage use instead of
/// [`coin_age_weight`]. Not part of this kernel's consensus path; kept for
/// API parity with configurations that might want to compare the two.
pub fn coin_age_weight_linear(t0: i64, t1: i64, stake_min_age: i64, stake_max_age: i64) -> i64 {
    if t0 <= 0 {
        return 0;
    }
    (t1 - t0 - stake_min_age).max(0).min(stake_max_age)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_AGE: i64 = 10_800;
    const MAX_AGE: i64 = 3_888_000;

    #[test]
    fn returns_zero_below_min_age() {
        assert_eq!(coin_age_weight(1000, 1000 + MIN_AGE - 1, MIN_AGE, MAX_AGE), 0);
        assert_eq!(coin_age_weight(1000, 1000 + MIN_AGE, MIN_AGE, MAX_AGE), 0);
    }

    #[test]
    fn defends_against_non_positive_t0() {
        assert_eq!(coin_age_weight(0, 1_000_000, MIN_AGE, MAX_AGE), 0);
        assert_eq!(coin_age_weight(-5, 1_000_000, MIN_AGE, MAX_AGE), 0);
    }

    #[test]
    fn is_monotonic_in_the_interval_length() {
        let t0 = 1_000_000;
        let mut prev = 0;
        for days in [1, 2, 3, 5, 7, 10, 30, 90] {
            let t1 = t0 + MIN_AGE + days * 86_400;
            let w = coin_age_weight(t0, t1, MIN_AGE, MAX_AGE);
            assert!(w >= prev, "weight should not decrease as the interval grows ({} days)", days);
            prev = w;
        }
    }

    #[test]
    fn is_bounded_by_stake_max_age() {
        let t0 = 1;
        let t1 = t0 + MIN_AGE + 10_000 * 86_400;
        assert!(coin_age_weight(t0, t1, MIN_AGE, MAX_AGE) <= MAX_AGE);
    }

    #[test]
    fn matches_expected_value_at_one_day() {
        // d = 1: w = -0.00408163 + 0.05714286 + 1 = 1.05306123
        let t0 = 1_000_000;
        let t1 = t0 + MIN_AGE + 86_400;
        let got = coin_age_weight(t0, t1, MIN_AGE, MAX_AGE);
        let expected = ((-0.004_081_63 + 0.057_142_86 + 1.0) * 86_400.0).floor() as i64;
        assert_eq!(got, expected);
    }

    #[test]
    fn linear_curve_matches_clamped_difference() {
        let t0 = 1_000_000;
        let t1 = t0 + MIN_AGE + 500_000;
        assert_eq!(coin_age_weight_linear(t0, t1, MIN_AGE, MAX_AGE), 500_000);
        assert_eq!(coin_age_weight_linear(t0, t0 + 10, MIN_AGE, MAX_AGE), 0);
    }
}
