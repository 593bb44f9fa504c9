// ============================================================
// Layer 4 — Window Extractor
// ============================================================
// Converts a flat token-id sequence into fixed-width
// (context, target) training rows for the NPLM.
//
// For a sequence of L ids and window size N, every position
// i in [0, L-N) yields one row:
//
//   context = ids[i .. i+N]     (the N preceding tokens)
//   target  = ids[i+N]          (the token to predict)
//
// so the result has exactly L-N rows. A sequence of length ≤ N
// yields zero rows — that is a valid (empty) result, not an
// error, so callers can window tiny corpora without guards.
//
// Shuffling permutes row ORDER only, never row contents, and is
// driven by a caller-supplied seed so a training run is exactly
// reproducible. Unshuffled output preserves left-to-right corpus
// order, which the sampler relies on when re-scoring a generated
// sequence.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::dataset::WindowItem;

/// Slide a width-(N+1) window over `ids` and return the rows.
///
/// `shuffle` randomises row order with a Fisher-Yates pass over
/// the finished matrix, seeded by `seed` for reproducibility.
pub fn build_windows(ids: &[usize], window_size: usize, shuffle: bool, seed: u64) -> Vec<WindowItem> {
    if ids.len() <= window_size {
        return Vec::new();
    }

    let mut rows: Vec<WindowItem> = (0..ids.len() - window_size)
        .map(|i| WindowItem {
            context: ids[i..i + window_size].iter().map(|&id| id as u32).collect(),
            target: ids[i + window_size] as u32,
        })
        .collect();

    if shuffle {
        let mut rng = StdRng::seed_from_u64(seed);
        rows.shuffle(&mut rng);
    }

    rows
}
