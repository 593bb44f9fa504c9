// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles sentences and splits them into a training set and a
// held-out validation set.
//
// The split happens at SENTENCE granularity, before windowing:
// splitting the flat id sequence instead would put windows that
// straddle the cut in neither set, and windows from the same
// sentence in both.
//
// The shuffle is seeded (unlike a thread_rng shuffle) so the
// same corpus + seed always produces the same split — required
// for reproducible perplexity numbers.
//
// Uses Fisher-Yates via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `items` with `seed` and split into (train, validation).
///
/// `train_fraction` is the proportion kept for training,
/// e.g. 0.9 = 90%. The index is rounded and clamped so tiny
/// datasets never panic.
pub fn split_train_val<T>(mut items: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let total = items.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    // split_off(n) removes [n..] and returns it
    let val = items.split_off(split_at);

    tracing::debug!(
        "Corpus split: {} training sentences, {} validation sentences",
        items.len(),
        val.len(),
    );

    (items, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val) = split_train_val(items, 0.9, 0);
        assert_eq!(train.len(), 90);
        assert_eq!(val.len(), 10);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..57).collect();
        let (train, val) = split_train_val(items, 0.7, 3);
        assert_eq!(train.len() + val.len(), 57);
    }

    #[test]
    fn test_split_is_seed_deterministic() {
        let a = split_train_val((0..50).collect::<Vec<_>>(), 0.8, 11);
        let b = split_train_val((0..50).collect::<Vec<_>>(), 0.8, 11);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val) = split_train_val(items, 0.9, 0);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        let items: Vec<usize> = (0..10).collect();
        let (train, val) = split_train_val(items, 1.0, 0);
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }
}
