// ============================================================
// Layer 2 — SampleUseCase
// ============================================================
// Generates sentences from a trained checkpoint:
//
//   1. Load train_config.json + vocab.json + latest checkpoint
//   2. Build a Sampler around the restored model
//   3. Draw sentences autoregressively, decode them, and attach
//      each one's diagnostic log-probability
//
// Sampling runs on the plain backend; the weights are read-only
// here.

use anyhow::Result;

use crate::data::vocab::Vocabulary;
use crate::infra::{checkpoint::CheckpointManager, vocab_store::VocabStore};
use crate::ml::model::{NplmConfig, NplmModel};
use crate::ml::sampler::{GeneratedSample, Sampler};

type SampleBackend = burn::backend::NdArray;

pub struct SampleUseCase {
    sampler: Sampler,
    vocab: Vocabulary,
    max_length: usize,
}

impl SampleUseCase {
    pub fn new(checkpoint_dir: String, max_length: usize, seed: u64) -> Result<Self> {
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let ckpt = CheckpointManager::new(&checkpoint_dir);
        let cfg = ckpt.load_config()?;
        let vocab = VocabStore::new(&checkpoint_dir).load()?;

        let model: NplmModel<SampleBackend> = NplmConfig::new(
            cfg.vocab_size, cfg.window_size, cfg.embedding_dim, cfg.hidden_dim,
        ).init(&device);
        let model = ckpt.load_model(model, &device)?;

        Ok(Self {
            sampler: Sampler::new(model, cfg.window_size, seed),
            vocab,
            max_length,
        })
    }

    /// Draw one sentence with its diagnostic score.
    pub fn sample(&mut self) -> Result<GeneratedSample> {
        self.sampler.generate(&self.vocab, self.max_length)
    }

    /// Draw one sentence continuing the given word prefix.
    pub fn sample_from(&mut self, start_words: &[String]) -> Result<GeneratedSample> {
        self.sampler
            .generate_from(&self.vocab, self.max_length, start_words)
    }

    /// Draw `count` sentences, all continuing the same prefix
    /// (empty prefix = free generation).
    pub fn sample_many(
        &mut self,
        count: usize,
        start_words: &[String],
    ) -> Result<Vec<GeneratedSample>> {
        (0..count).map(|_| self.sample_from(start_words)).collect()
    }
}
