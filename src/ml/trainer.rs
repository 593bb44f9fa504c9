// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and
// AdaGrad (the optimizer of the original NPLM setup).
//
// Backend split, as everywhere in this crate:
//   - Training uses TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on EvalBackend (NdArray)
//     for the validation pass, with no autodiff overhead
//
// Batch order: the window matrix was (optionally) shuffled ONCE
// by the extractor, and the loader here deliberately does NOT
// re-shuffle — batches walk the matrix in fixed order every
// epoch. Whether the once-only shuffle is intentional is an
// open question; it is reproduced here rather than fixed.
//
// Divergence: a non-finite batch loss skips that optimizer step
// and is counted, so one bad batch cannot destroy the weights
// silently. The count is reported per epoch and logged to the
// metrics CSV.
//
// Reference: Burn Book §5, Duchi et al. (2011) AdaGrad

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdaGradConfig, GradientsParams, Optimizer},
    prelude::*,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::WindowBatcher, dataset::WindowDataset, dataset::WindowItem};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{NplmConfig, NplmModel};
use crate::ml::scorer;

type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
type EvalBackend = burn::backend::NdArray;

// ─── EpochStats ───────────────────────────────────────────────────────────────
/// Running statistics for one training epoch, owning the
/// divergence guard: a non-finite batch loss is counted as
/// skipped and excluded from the epoch mean, and the caller must
/// not take the optimizer step for it.
struct EpochStats {
    loss_sum: f64,
    batches: usize,
    skipped: usize,
}

impl EpochStats {
    fn new() -> Self {
        Self { loss_sum: 0.0, batches: 0, skipped: 0 }
    }

    /// Record one batch loss. Returns true when the loss is
    /// finite and the optimizer step should proceed.
    fn record(&mut self, loss: f64) -> bool {
        if loss.is_finite() {
            self.loss_sum += loss;
            self.batches += 1;
            true
        } else {
            self.skipped += 1;
            false
        }
    }

    /// Mean over the finite batches; NaN when every batch was
    /// skipped.
    fn mean_loss(&self) -> f64 {
        if self.batches > 0 {
            self.loss_sum / self.batches as f64
        } else {
            f64::NAN
        }
    }
}

pub fn run_training(
    cfg: &TrainConfig,
    train_dataset: WindowDataset,
    val_rows: Vec<WindowItem>,
    ckpt_manager: CheckpointManager,
    metrics: MetricsLogger,
) -> Result<()> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    tracing::info!("Using NdArray device: {:?}", device);
    train_loop(cfg, train_dataset, val_rows, ckpt_manager, metrics, device)
}

fn train_loop(
    cfg: &TrainConfig,
    train_dataset: WindowDataset,
    val_rows: Vec<WindowItem>,
    ckpt_manager: CheckpointManager,
    metrics: MetricsLogger,
    device: burn::backend::ndarray::NdArrayDevice,
) -> Result<()> {

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = NplmConfig::new(
        cfg.vocab_size, cfg.window_size, cfg.embedding_dim, cfg.hidden_dim,
    );
    let mut model: NplmModel<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: V={}, N={}, M={}, H={}",
        cfg.vocab_size, cfg.window_size, cfg.embedding_dim, cfg.hidden_dim,
    );

    // ── AdaGrad optimiser ─────────────────────────────────────────────────────
    // G += g²                    (per-parameter accumulator)
    // θ = θ - lr * g / (√G + ε)  (update)
    let optim_cfg = AdaGradConfig::new();
    let mut optim = optim_cfg.init();

    // Seeded RNG for the noise draws of the sampled softmax
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    // No .shuffle() here — see module header.
    let train_batcher = WindowBatcher::<TrainBackend>::new(device.clone());
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(train_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase: sampled softmax + AdaGrad ─────────────────────────
        let mut stats = EpochStats::new();

        for batch in train_loader.iter() {
            // Fresh uniform noise ids for this batch's candidate set
            let noise: Vec<i32> = (0..cfg.num_noise)
                .map(|_| rng.gen_range(0..cfg.vocab_size as i32))
                .collect();
            let noise_ids =
                Tensor::<TrainBackend, 1, Int>::from_ints(noise.as_slice(), &device);

            let loss = model.sampled_loss(batch.contexts, batch.targets, noise_ids);
            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

            // Divergence guard: skip the step, keep the weights
            if !stats.record(loss_val) {
                tracing::warn!(
                    "Non-finite loss in epoch {} — optimizer step skipped", epoch,
                );
                continue;
            }

            // Backward pass + AdaGrad update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = stats.mean_loss();

        // ── Validation phase: exact cross-entropy on held-out windows ─────────
        let model_valid: NplmModel<EvalBackend> = model.valid();
        let val_loss =
            scorer::mean_cross_entropy(&model_valid, &val_rows, cfg.eval_batch_size, &device)?;
        let val_ppl = val_loss.exp();

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_ppl={:.2} | skipped={}",
            epoch, cfg.epochs, avg_train_loss, val_loss, val_ppl, stats.skipped,
        );

        metrics.log(&EpochMetrics::new(
            epoch, avg_train_loss, val_loss, val_ppl, stats.skipped,
        ))?;

        ckpt_manager.save_model(&model, epoch)?;
        tracing::debug!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(())
}
