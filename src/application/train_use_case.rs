// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load corpus sentences     (Layer 4 - data)
//   Step 2: Train/validation split    (Layer 4 - data)
//   Step 3: Build vocabulary          (Layer 4 - data)
//   Step 4: Encode + flatten ids      (Layer 4 - data)
//   Step 5: Extract windows           (Layer 4 - data)
//   Step 6: Build dataset             (Layer 4 - data)
//   Step 7: Save config + vocabulary  (Layer 6 - infra)
//   Step 8: Run training loop         (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)
//            Bengio et al. (2003) §4 (experimental setup)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::WindowDataset,
    loader::TextLoader,
    splitter::split_train_val,
    vocab::{Vocabulary, NUM_SPECIAL},
    windows::build_windows,
};
use crate::domain::sentence::Sentence;
use crate::domain::traits::CorpusSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    vocab_store::VocabStore,
};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so it can
// be saved to the checkpoint directory and reloaded for
// evaluation and sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_dir: String,
    pub checkpoint_dir: String,
    /// V — requested vocabulary cap; the saved config records the
    /// ACTUAL size, which is smaller when the corpus has fewer
    /// distinct words
    pub vocab_size: usize,
    /// N — context window width
    pub window_size: usize,
    /// M — embedding dimension
    pub embedding_dim: usize,
    /// H — hidden layer width
    pub hidden_dim: usize,
    pub batch_size: usize,
    /// Evaluation batch size — independent of batch_size, larger
    /// for throughput since no gradients are kept
    pub eval_batch_size: usize,
    pub epochs: usize,
    pub lr: f64,
    /// K — noise ids drawn per batch for the sampled softmax
    pub num_noise: usize,
    /// Fraction of sentences kept for training (rest validates)
    pub train_fraction: f64,
    /// Seed for the split, window shuffle, and noise draws
    pub seed: u64,
    /// Shuffle the training window matrix once after extraction
    pub shuffle_windows: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_dir: "data/corpus".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            vocab_size: 10_000,
            window_size: 3,
            embedding_dim: 50,
            hidden_dim: 100,
            batch_size: 64,
            eval_batch_size: 512,
            epochs: 5,
            lr: 0.1,
            num_noise: 64,
            train_fraction: 0.9,
            seed: 42,
            shuffle_windows: true,
        }
    }
}

impl TrainConfig {
    /// Reject malformed hyperparameters up front, before any
    /// framework call — a zero dimension would otherwise fail
    /// deep inside Burn with an opaque shape error.
    pub fn validate(&self) -> Result<()> {
        if self.vocab_size <= NUM_SPECIAL {
            bail!("vocab_size must exceed {} (got {})", NUM_SPECIAL, self.vocab_size);
        }
        if self.window_size == 0 {
            bail!("window_size must be positive");
        }
        if self.embedding_dim == 0 || self.hidden_dim == 0 {
            bail!(
                "embedding_dim and hidden_dim must be positive (got {} and {})",
                self.embedding_dim, self.hidden_dim
            );
        }
        if self.batch_size == 0 || self.eval_batch_size == 0 {
            bail!("batch sizes must be positive");
        }
        if self.epochs == 0 {
            bail!("epochs must be positive");
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            bail!("learning rate must be positive and finite (got {})", self.lr);
        }
        if self.num_noise == 0 {
            bail!("num_noise must be positive");
        }
        if !(self.train_fraction > 0.0 && self.train_fraction <= 1.0) {
            bail!(
                "train_fraction must be in (0, 1] (got {})",
                self.train_fraction
            );
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        self.config.validate()?;
        let cfg = &self.config;

        // ── Step 1: Load corpus sentences ─────────────────────────────────────
        tracing::info!("Loading corpus from '{}'", cfg.corpus_dir);
        let loader = TextLoader::new(cfg.corpus_dir.clone());
        let sentences = loader.load_all()?;
        if sentences.is_empty() {
            bail!("Corpus in '{}' contains no sentences", cfg.corpus_dir);
        }

        // ── Step 2: Train/validation split ────────────────────────────────────
        // Sentence-level, seeded — before windowing, so no window
        // straddles the cut.
        let (train_sents, val_sents) = split_train_val(sentences, cfg.train_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train sentences, {} validation sentences",
            train_sents.len(),
            val_sents.len()
        );

        // ── Step 3: Build vocabulary from the TRAINING split only ─────────────
        // Validation words outside the training top-V become <unk>,
        // exactly as unseen test words would.
        let vocab = Vocabulary::build(
            train_sents
                .iter()
                .flat_map(|s| s.words.iter().map(String::as_str)),
            cfg.vocab_size,
        )?;
        tracing::info!("Vocabulary built: {} ids", vocab.size());

        // ── Step 4: Encode + flatten each split ───────────────────────────────
        let train_ids = encode_corpus(&vocab, &train_sents);
        let val_ids = encode_corpus(&vocab, &val_sents);

        // ── Step 5: Extract windows ───────────────────────────────────────────
        // Training rows are shuffled ONCE here (seeded); the
        // trainer never re-shuffles. Validation keeps corpus order.
        let train_rows = build_windows(&train_ids, cfg.window_size, cfg.shuffle_windows, cfg.seed);
        let val_rows = build_windows(&val_ids, cfg.window_size, false, cfg.seed);
        if train_rows.is_empty() {
            bail!(
                "Training split yields no windows — corpus shorter than \
                 window_size {}",
                cfg.window_size
            );
        }
        if val_rows.is_empty() {
            bail!("Validation split yields no windows — increase the corpus or lower train_fraction");
        }
        tracing::info!(
            "Windows: {} train rows, {} validation rows",
            train_rows.len(),
            val_rows.len()
        );

        // ── Step 6: Build the Burn dataset ────────────────────────────────────
        let train_dataset = WindowDataset::new(train_rows);

        // ── Step 7: Save config + vocabulary for later runs ───────────────────
        // The saved config records the ACTUAL vocabulary size so
        // evaluation rebuilds a model of the right shape.
        let mut saved_cfg = cfg.clone();
        saved_cfg.vocab_size = vocab.size();

        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(&saved_cfg)?;
        VocabStore::new(&cfg.checkpoint_dir).save(&vocab)?;

        // ── Step 8: Run training loop (Layer 5) ───────────────────────────────
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
        run_training(&saved_cfg, train_dataset, val_rows, ckpt_manager, metrics)?;

        Ok(())
    }
}

/// Wrap every sentence in boundary markers, encode, and flatten
/// into one id sequence.
fn encode_corpus(vocab: &Vocabulary, sentences: &[Sentence]) -> Vec<usize> {
    sentences
        .iter()
        .flat_map(|s| vocab.encode_sentence(&s.words))
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        let cases: Vec<fn(&mut TrainConfig)> = vec![
            |c: &mut TrainConfig| c.vocab_size = 3,
            |c: &mut TrainConfig| c.window_size = 0,
            |c: &mut TrainConfig| c.embedding_dim = 0,
            |c: &mut TrainConfig| c.hidden_dim = 0,
            |c: &mut TrainConfig| c.batch_size = 0,
            |c: &mut TrainConfig| c.epochs = 0,
            |c: &mut TrainConfig| c.lr = 0.0,
            |c: &mut TrainConfig| c.lr = f64::NAN,
            |c: &mut TrainConfig| c.num_noise = 0,
            |c: &mut TrainConfig| c.train_fraction = 0.0,
            |c: &mut TrainConfig| c.train_fraction = 1.5,
        ];
        for mutate in cases {
            let mut cfg = TrainConfig::default();
            mutate(&mut cfg);
            assert!(cfg.validate().is_err());
        }
    }

    #[test]
    fn test_encode_corpus_wraps_each_sentence() {
        let vocab = Vocabulary::build(["a", "b", "a"].into_iter(), 10).unwrap();
        let sents = vec![
            Sentence::from_line("a b"),
            Sentence::from_line("b"),
        ];
        let ids = encode_corpus(&vocab, &sents);
        // <s> a b </s> <s> b </s>
        assert_eq!(ids.len(), 7);
        assert_eq!(ids[0], 0);
        assert_eq!(ids[3], 1);
        assert_eq!(ids[4], 0);
        assert_eq!(ids[6], 1);
    }
}
