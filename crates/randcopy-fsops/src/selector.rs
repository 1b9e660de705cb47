//! Random selection order.
//!
//! Full-shuffle policy: every candidate appears exactly once and the copier
//! truncates the order by budget.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::model::Candidate;

/// Uniformly permute `candidates` with `rng`.
#[must_use]
pub fn shuffle_candidates<R: Rng + ?Sized>(
    mut candidates: Vec<Candidate>,
    rng: &mut R,
) -> Vec<Candidate> {
    candidates.shuffle(rng);
    debug!(count = candidates.len(), "shuffled selection order");
    candidates
}

/// Random source for a run: seeded when `seed` is given, OS entropy otherwise.
#[must_use]
pub fn selection_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}
