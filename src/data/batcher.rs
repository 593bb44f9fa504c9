// ============================================================
// Layer 4 — Window Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<WindowItem>
// into tensors for the model forward pass.
//
// Input:  Vec of B WindowItems, each with N context ids
// Output: WindowBatch with
//           contexts: [B, N]  Int tensor
//           targets:  [B]     Int tensor
//
// We flatten all contexts into one long Vec, then reshape:
//   [r1_c1, ..., r1_cN, r2_c1, ..., rB_cN] → [B, N]
//
// Every row has exactly N context ids by construction (the
// window extractor guarantees it), so no padding is needed.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::WindowItem;

// ─── WindowBatch ──────────────────────────────────────────────────────────────
/// A batch of (context, target) rows ready for the model.
///
/// B is the Burn Backend — generic so the same batcher feeds
/// both the autodiff training backend and the plain evaluation
/// backend.
#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// Context ids — shape: [batch_size, window_size]
    pub contexts: Tensor<B, 2, Int>,

    /// Target ids — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── WindowBatcher ────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created in the right
/// place.
#[derive(Clone, Debug)]
pub struct WindowBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<WindowItem, WindowBatch<B>> for WindowBatcher<B> {
    /// Stack a Vec of WindowItems into a single WindowBatch.
    fn batch(&self, items: Vec<WindowItem>) -> WindowBatch<B> {
        // Zero rows stack into zero-row tensors, not a panic
        if items.is_empty() {
            return WindowBatch {
                contexts: Tensor::empty([0, 0], &self.device),
                targets: Tensor::empty([0], &self.device),
            };
        }

        let batch_size = items.len();
        // All rows have the same context width by construction
        let window_size = items[0].context.len();

        // Vec<Vec<u32>> → flat Vec<i32> (Burn Int tensors are built from i32)
        let context_flat: Vec<i32> = items
            .iter()
            .flat_map(|r| r.context.iter().map(|&id| id as i32))
            .collect();

        let targets_flat: Vec<i32> = items.iter().map(|r| r.target as i32).collect();

        let contexts = Tensor::<B, 1, Int>::from_ints(
            context_flat.as_slice(), &self.device,
        ).reshape([batch_size, window_size]);

        let targets = Tensor::<B, 1, Int>::from_ints(
            targets_flat.as_slice(), &self.device,
        );

        WindowBatch { contexts, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_batch_stacks_rows_into_tensors() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let batcher = WindowBatcher::<TestBackend>::new(device);
        let items = vec![
            WindowItem { context: vec![0, 3, 5], target: 7 },
            WindowItem { context: vec![3, 5, 7], target: 9 },
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.contexts.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2]);
    }

    #[test]
    fn test_empty_batch_yields_empty_tensors() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let batcher = WindowBatcher::<TestBackend>::new(device);

        let batch = batcher.batch(Vec::new());
        assert_eq!(batch.contexts.dims(), [0, 0]);
        assert_eq!(batch.targets.dims(), [0]);
    }
}
