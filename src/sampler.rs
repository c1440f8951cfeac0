//! Random-draw primitives with the fixed distributions used by generation.
//!
//! All draws take the RNG as a parameter so runs are deterministic under a
//! seeded `StdRng`. The distributions are deliberately simple hand-tuned
//! discrete thresholds modelling realistic proportions of lifecycle states,
//! payment completion, and damage incidents.

use crate::model::StatusCategory;
use rand::Rng;

/// Uniform choice over a non-empty slice.
pub fn uniform_pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

/// Uniform integer draw with inclusive bounds.
pub fn uniform_int<R: Rng>(rng: &mut R, lo: i64, hi: i64) -> i64 {
    rng.gen_range(lo..=hi)
}

/// Categorical status draw: Created 5%, Confirmed 5%, Renting 5%,
/// Returned 75%, Canceled 10%.
pub fn weighted_status<R: Rng>(rng: &mut R) -> StatusCategory {
    match rng.gen_range(1..=19) {
        1 => StatusCategory::Created,
        2 => StatusCategory::Confirmed,
        3 => StatusCategory::Renting,
        4..=18 => StatusCategory::Returned,
        _ => StatusCategory::Canceled,
    }
}

/// Whether a transfer event records damage: probability 1/19.
pub fn damage_occurs<R: Rng>(rng: &mut R) -> bool {
    rng.gen_range(1..=19) == 1
}

/// Whether the booking is paid, conditioned on status: Confirmed 90%,
/// Renting 99.9%, Returned 99.98%, everything else never paid.
pub fn paid_outcome<R: Rng>(rng: &mut R, status: StatusCategory) -> bool {
    let draw = rng.gen_range(1..=10_000);
    match status {
        StatusCategory::Confirmed => draw <= 9_000,
        StatusCategory::Renting => draw <= 9_990,
        StatusCategory::Returned => draw <= 9_998,
        _ => false,
    }
}
