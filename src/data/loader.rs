use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffles `0..n` and cuts it into consecutive batches of `batch_size`
/// indices; the last batch holds the remainder.
///
/// # Panics
/// Panics if `batch_size == 0`.
pub fn shuffled_batches<R: Rng + ?Sized>(n: usize, batch_size: usize, rng: &mut R) -> Vec<Vec<usize>> {
    assert!(batch_size > 0, "batch_size must be at least 1");

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.chunks(batch_size).map(|c| c.to_vec()).collect()
}
