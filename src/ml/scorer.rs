// ============================================================
// Layer 5 — Scorer
// ============================================================
// Exact cross-entropy scoring of a window matrix, reported as
// perplexity = exp(mean NLL). The loss uses natural log, so the
// exponentiation base matches — perplexity is never below 1.
//
// This path uses the full softmax, which is O(V) per example;
// that is affordable because scoring runs once per evaluation,
// not once per gradient step, and uses a batch size independent
// of (typically larger than) the training batch size.
//
// The filtered variant drops rows whose TARGET is the unknown
// id, restricting perplexity to in-vocabulary predictions —
// predicting <unk> well is not interesting and flatters the
// number. Rows with <unk> inside the CONTEXT are kept, as the
// model legitimately conditions on unknown words.

use anyhow::{bail, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::{batcher::WindowBatcher, dataset::WindowItem, vocab::UNK_ID};
use crate::ml::model::NplmModel;

/// Mean exact cross-entropy over `rows`, batched through the
/// window batcher in contiguous chunks of `batch_size`.
pub fn mean_cross_entropy<B: Backend>(
    model: &NplmModel<B>,
    rows: &[WindowItem],
    batch_size: usize,
    device: &B::Device,
) -> Result<f64> {
    if rows.is_empty() {
        bail!("Cannot score an empty window matrix");
    }

    let batcher = WindowBatcher::<B>::new(device.clone());
    let mut loss_sum = 0.0f64;
    let mut batches = 0usize;

    for chunk in rows.chunks(batch_size) {
        let batch = batcher.batch(chunk.to_vec());
        let loss: f64 = model
            .forward_loss(batch.contexts, batch.targets)
            .into_scalar()
            .elem::<f64>();
        loss_sum += loss;
        batches += 1;
    }

    Ok(loss_sum / batches as f64)
}

/// Perplexity over all rows: exp(mean cross-entropy).
pub fn perplexity<B: Backend>(
    model: &NplmModel<B>,
    rows: &[WindowItem],
    batch_size: usize,
    device: &B::Device,
) -> Result<f64> {
    Ok(mean_cross_entropy(model, rows, batch_size, device)?.exp())
}

/// Perplexity restricted to rows whose target is in-vocabulary.
pub fn filtered_perplexity<B: Backend>(
    model: &NplmModel<B>,
    rows: &[WindowItem],
    batch_size: usize,
    device: &B::Device,
) -> Result<f64> {
    let kept: Vec<WindowItem> = rows
        .iter()
        .filter(|r| r.target != UNK_ID as u32)
        .cloned()
        .collect();

    if kept.is_empty() {
        bail!(
            "Every target in the window matrix is <unk> — \
             filtered perplexity is undefined"
        );
    }

    tracing::debug!(
        "Filtered scoring: kept {} of {} rows ({} unknown targets dropped)",
        kept.len(),
        rows.len(),
        rows.len() - kept.len(),
    );

    perplexity(model, &kept, batch_size, device)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::NplmConfig;

    type TestBackend = burn::backend::NdArray;

    fn rows(specs: &[(&[u32], u32)]) -> Vec<WindowItem> {
        specs
            .iter()
            .map(|(c, t)| WindowItem { context: c.to_vec(), target: *t })
            .collect()
    }

    #[test]
    fn test_perplexity_is_at_least_one() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = NplmConfig::new(30, 3, 4, 5).init::<TestBackend>(&device);
        let rows = rows(&[(&[0, 3, 5], 7), (&[3, 5, 7], 9), (&[5, 7, 9], 4)]);
        let ppl = perplexity(&model, &rows, 2, &device).unwrap();
        assert!(ppl >= 1.0);
        assert!(ppl.is_finite());
    }

    #[test]
    fn test_perplexity_is_deterministic() {
        // Fixed weights + fixed windows → identical score
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = NplmConfig::new(30, 3, 4, 5).init::<TestBackend>(&device);
        let rows = rows(&[(&[0, 3, 5], 7), (&[3, 5, 7], 9)]);
        let a = perplexity(&model, &rows, 2, &device).unwrap();
        let b = perplexity(&model, &rows, 2, &device).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_filtered_drops_unknown_targets_only() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = NplmConfig::new(30, 3, 4, 5).init::<TestBackend>(&device);
        // Row 2 targets <unk>; row 1 merely CONTAINS <unk> and must be kept
        let all = rows(&[
            (&[0, 3, 5], 7),
            (&[3, UNK_ID as u32, 5], 9),
            (&[5, 7, 9], UNK_ID as u32),
        ]);
        let kept = rows(&[(&[0, 3, 5], 7), (&[3, UNK_ID as u32, 5], 9)]);

        let filtered = filtered_perplexity(&model, &all, 4, &device).unwrap();
        let expected = perplexity(&model, &kept, 4, &device).unwrap();
        assert_eq!(filtered, expected);
    }

    #[test]
    fn test_empty_rows_are_an_error() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = NplmConfig::new(30, 3, 4, 5).init::<TestBackend>(&device);
        assert!(perplexity(&model, &[], 4, &device).is_err());

        // All-unk targets → filtered variant is an error too
        let all_unk = rows(&[(&[0, 3, 5], UNK_ID as u32)]);
        assert!(filtered_perplexity(&model, &all_unk, 4, &device).is_err());
    }
}
