// src/services/sampler.rs

use rand::{Rng, seq::SliceRandom};

/// Draws `count` questions without replacement, in random order.
///
/// Returns `min(count, bank.len())` items. Every call shuffles afresh; nothing
/// about the sample is persisted, so reloading a quiz yields a new draw.
pub fn sample_questions<T>(bank: Vec<T>, count: usize) -> Vec<T> {
    sample_questions_with(bank, count, &mut rand::thread_rng())
}

/// Same as [`sample_questions`] with a caller-supplied generator.
pub fn sample_questions_with<T, R: Rng + ?Sized>(
    mut bank: Vec<T>,
    count: usize,
    rng: &mut R,
) -> Vec<T> {
    let take = count.min(bank.len());
    bank.shuffle(rng);
    bank.truncate(take);
    bank
}
