// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores a held-out corpus with a trained checkpoint:
//
//   1. Load train_config.json + vocab.json + latest checkpoint
//   2. Load and encode the evaluation corpus with THAT vocabulary
//   3. Window the id sequence (no shuffle — order is irrelevant
//      to the score but determinism is nice for debugging)
//   4. Report perplexity, and perplexity over in-vocabulary
//      targets only
//
// Runs on the plain (non-autodiff) backend — scoring never
// needs gradients.

use anyhow::{bail, Result};

use crate::data::{loader::TextLoader, windows::build_windows};
use crate::domain::traits::CorpusSource;
use crate::infra::{checkpoint::CheckpointManager, vocab_store::VocabStore};
use crate::ml::model::{NplmConfig, NplmModel};
use crate::ml::scorer;

type EvalBackend = burn::backend::NdArray;

/// Both perplexity numbers for one evaluation run.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationReport {
    pub perplexity: f64,
    /// Restricted to rows whose target is in-vocabulary
    pub filtered_perplexity: f64,
    pub row_count: usize,
}

pub struct EvaluateUseCase {
    checkpoint_dir: String,
    corpus_dir: String,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: String, corpus_dir: String) -> Self {
        Self { checkpoint_dir, corpus_dir }
    }

    pub fn execute(&self) -> Result<EvaluationReport> {
        let device = burn::backend::ndarray::NdArrayDevice::default();

        // ── Rebuild the trained model ─────────────────────────────────────────
        let ckpt = CheckpointManager::new(&self.checkpoint_dir);
        let cfg = ckpt.load_config()?;
        let vocab = VocabStore::new(&self.checkpoint_dir).load()?;

        let model: NplmModel<EvalBackend> = NplmConfig::new(
            cfg.vocab_size, cfg.window_size, cfg.embedding_dim, cfg.hidden_dim,
        ).init(&device);
        let model = ckpt.load_model(model, &device)?;

        // ── Encode the evaluation corpus ──────────────────────────────────────
        let sentences = TextLoader::new(self.corpus_dir.clone()).load_all()?;
        let ids: Vec<usize> = sentences
            .iter()
            .flat_map(|s| vocab.encode_sentence(&s.words))
            .collect();

        let rows = build_windows(&ids, cfg.window_size, false, 0);
        if rows.is_empty() {
            bail!(
                "Evaluation corpus in '{}' yields no windows (shorter than N={})",
                self.corpus_dir, cfg.window_size
            );
        }

        // ── Score ─────────────────────────────────────────────────────────────
        let perplexity =
            scorer::perplexity(&model, &rows, cfg.eval_batch_size, &device)?;
        let filtered =
            scorer::filtered_perplexity(&model, &rows, cfg.eval_batch_size, &device)?;

        tracing::info!(
            "Scored {} windows: perplexity={:.2}, filtered={:.2}",
            rows.len(), perplexity, filtered,
        );

        Ok(EvaluationReport {
            perplexity,
            filtered_perplexity: filtered,
            row_count: rows.len(),
        })
    }
}
