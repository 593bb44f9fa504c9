// ============================================================
// Layer 5 — Sampler
// ============================================================
// Autoregressive sentence generation from a trained NPLM.
//
// The context starts as N copies of the sentence-start id.
// Each step feeds the LAST N ids of the sequence to the model,
// draws one id from the softmax distribution, and appends it.
// Generation stops early on the sentence-end id, or after
// `max_length` drawn tokens — a hard cap, so the produced
// sequence never exceeds max_length + N ids and always
// terminates.
//
// After generation the full sequence is re-scored through the
// windowing + full-loss path for its total and per-token
// log-probability. That number is diagnostic only — it never
// influences the draw.
//
// Like the teacher's evaluation code, this module pins a
// concrete CPU backend: the categorical draw happens host-side
// on a Vec<f32> of probabilities.

use anyhow::{anyhow, Result};
use burn::prelude::*;
use burn::tensor::activation::softmax;
use rand::{distributions::Distribution, distributions::WeightedIndex, rngs::StdRng, SeedableRng};

use crate::data::vocab::{Vocabulary, END_ID, START_ID};
use crate::data::windows::build_windows;
use crate::ml::model::NplmModel;
use crate::ml::scorer;

type SampleBackend = burn::backend::NdArray;

/// One generated sentence plus its diagnostic score.
#[derive(Debug, Clone)]
pub struct GeneratedSample {
    /// Full id sequence including the N start pads and, when
    /// generation stopped early, the trailing sentence-end id
    pub ids: Vec<usize>,
    /// Display text: the generated words without boundary markers
    pub text: String,
    /// Total natural-log probability of the generated windows
    pub log_prob: f64,
    /// log_prob divided by the number of scored tokens
    pub avg_log_prob: f64,
}

pub struct Sampler {
    model: NplmModel<SampleBackend>,
    window_size: usize,
    device: burn::backend::ndarray::NdArrayDevice,
    rng: StdRng,
}

impl Sampler {
    pub fn new(model: NplmModel<SampleBackend>, window_size: usize, seed: u64) -> Self {
        Self {
            model,
            window_size,
            device: burn::backend::ndarray::NdArrayDevice::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// [1, N] forward pass → probability row over the vocabulary.
    fn next_distribution(&self, context: &[usize]) -> Result<Vec<f32>> {
        let ids: Vec<i32> = context.iter().map(|&id| id as i32).collect();
        let contexts = Tensor::<SampleBackend, 1, Int>::from_ints(ids.as_slice(), &self.device)
            .reshape([1, self.window_size]);

        let logits = self.model.forward(contexts); // [1, V]
        let probs = softmax(logits, 1).into_data().to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read probability row: {e:?}"))?;
        Ok(probs)
    }

    /// Draw one id from the model's next-word distribution.
    pub fn sample_next(&mut self, context: &[usize]) -> Result<usize> {
        let probs = self.next_distribution(context)?;
        let dist = WeightedIndex::new(&probs)
            .map_err(|e| anyhow!("Degenerate next-word distribution: {e}"))?;
        Ok(dist.sample(&mut self.rng))
    }

    /// Deterministic highest-probability id.
    pub fn argmax_next(&self, context: &[usize]) -> Result<usize> {
        let ids: Vec<i32> = context.iter().map(|&id| id as i32).collect();
        let contexts = Tensor::<SampleBackend, 1, Int>::from_ints(ids.as_slice(), &self.device)
            .reshape([1, self.window_size]);

        let best: i64 = self.model.forward(contexts)
            .argmax(1)
            .into_scalar()
            .elem::<i64>();
        Ok(best as usize)
    }

    /// Generate one sentence of at most `max_length` drawn tokens.
    pub fn generate(&mut self, vocab: &Vocabulary, max_length: usize) -> Result<GeneratedSample> {
        self.generate_from(vocab, max_length, &[])
    }

    /// Generate with a fixed word prefix. The context still
    /// starts as N sentence-start ids; the encoded prefix is
    /// appended before the first draw, so generation continues
    /// the given words. Prefix words outside the vocabulary
    /// become <unk>, as anywhere else.
    pub fn generate_from(
        &mut self,
        vocab: &Vocabulary,
        max_length: usize,
        start_words: &[String],
    ) -> Result<GeneratedSample> {
        let n = self.window_size;
        let mut seq: Vec<usize> = vec![START_ID; n];
        seq.extend(start_words.iter().map(|w| vocab.word_to_id(w)));

        for _ in 0..max_length {
            let context = seq[seq.len() - n..].to_vec();
            let next = self.sample_next(&context)?;
            seq.push(next);
            if next == END_ID {
                break;
            }
        }

        // Re-score the produced sequence: every generated token
        // becomes the target of exactly one window row.
        let rows = build_windows(&seq, n, false, 0);
        let (log_prob, avg_log_prob) = if rows.is_empty() {
            (0.0, 0.0)
        } else {
            let mean_nll =
                scorer::mean_cross_entropy(&self.model, &rows, rows.len(), &self.device)?;
            (-(mean_nll * rows.len() as f64), -mean_nll)
        };

        let text = seq[n..]
            .iter()
            .filter(|&&id| id != END_ID && id != START_ID)
            .map(|&id| vocab.id_to_word(id))
            .collect::<Vec<_>>()
            .join(" ");

        Ok(GeneratedSample { ids: seq, text, log_prob, avg_log_prob })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::NplmConfig;

    fn tiny_sampler(seed: u64) -> Sampler {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = NplmConfig::new(12, 3, 4, 5).init::<SampleBackend>(&device);
        Sampler::new(model, 3, seed)
    }

    fn tiny_vocab() -> Vocabulary {
        Vocabulary::build(["a", "b", "c", "a"].into_iter(), 12).unwrap()
    }

    #[test]
    fn test_generation_respects_length_cap() {
        let mut sampler = tiny_sampler(1);
        let vocab = tiny_vocab();
        for max_length in [0, 1, 5, 30] {
            let sample = sampler.generate(&vocab, max_length).unwrap();
            // N start pads + at most max_length drawn ids
            assert!(sample.ids.len() <= max_length + 3);
            assert!(sample.ids.len() >= 3);
        }
    }

    #[test]
    fn test_generated_log_prob_is_non_positive() {
        let mut sampler = tiny_sampler(2);
        let vocab = tiny_vocab();
        let sample = sampler.generate(&vocab, 10).unwrap();
        assert!(sample.log_prob <= 0.0);
        assert!(sample.avg_log_prob <= 0.0);
        assert!(sample.log_prob.is_finite());
    }

    #[test]
    fn test_text_has_no_boundary_markers() {
        let mut sampler = tiny_sampler(3);
        let vocab = tiny_vocab();
        let sample = sampler.generate(&vocab, 15).unwrap();
        assert!(!sample.text.contains("<s>"));
        assert!(!sample.text.contains("</s>"));
    }

    #[test]
    fn test_prefix_survives_generation() {
        let mut sampler = tiny_sampler(6);
        let vocab = tiny_vocab();
        let prefix = vec!["a".to_string(), "b".to_string()];
        let sample = sampler.generate_from(&vocab, 8, &prefix).unwrap();
        assert!(sample.text.starts_with("a b"));
        // N pads + 2 prefix ids + at most 8 drawn ids
        assert!(sample.ids.len() <= 3 + 2 + 8);
    }

    #[test]
    fn test_argmax_is_deterministic() {
        let sampler = tiny_sampler(4);
        let a = sampler.argmax_next(&[0, 0, 0]).unwrap();
        let b = sampler.argmax_next(&[0, 0, 0]).unwrap();
        assert_eq!(a, b);
        assert!(a < 12);
    }

    #[test]
    fn test_sampled_id_is_in_vocabulary_range() {
        let mut sampler = tiny_sampler(5);
        for _ in 0..20 {
            let id = sampler.sample_next(&[0, 1, 2]).unwrap();
            assert!(id < 12);
        }
    }
}
