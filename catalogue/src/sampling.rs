//! Uniform sampling without replacement, used by `get_editor_picks`.

use rand::seq::index::sample;
use rand::thread_rng;

/// Draws `k` distinct indices from `[0, n)` uniformly at random.
///
/// Requires `k <= n` (callers only invoke this after already checking that
/// the filtered set is larger than the requested sample). The randomness
/// source is unseeded and not reproducible between calls: only uniform
/// sampling is required, not a specific sequence.
pub fn sample_distinct_indices(n: usize, k: usize) -> Vec<usize> {
    debug_assert!(k <= n, "sample_distinct_indices requires k <= n");
    sample(&mut thread_rng(), n, k).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn returns_requested_count_with_no_repeats() {
        let indices = sample_distinct_indices(100, 17);
        assert_eq!(indices.len(), 17);
        let unique: HashSet<_> = indices.iter().collect();
        assert_eq!(unique.len(), 17);
        assert!(indices.iter().all(|&i| i < 100));
    }

    #[test]
    fn zero_sample_is_empty() {
        assert!(sample_distinct_indices(10, 0).is_empty());
    }

    #[test]
    fn full_sample_covers_every_index() {
        let indices = sample_distinct_indices(5, 5);
        let unique: HashSet<_> = indices.into_iter().collect();
        assert_eq!(unique, (0..5).collect());
    }
}
