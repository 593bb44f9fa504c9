// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `evaluate`, `sample`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The three top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the NPLM on a plain-text corpus
    Train(TrainArgs),

    /// Score a corpus by perplexity with a trained checkpoint
    Evaluate(EvaluateArgs),

    /// Generate sentences from a trained checkpoint
    Sample(SampleArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory of .txt corpus files, one sentence per line
    #[arg(long, default_value = "data/corpus")]
    pub corpus_dir: String,

    /// Directory for checkpoints, config, vocabulary, and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Vocabulary size V, including <s>, </s>, <unk>
    #[arg(long, default_value_t = 10_000)]
    pub vocab_size: usize,

    /// Context window width N — how many preceding tokens the
    /// model sees
    #[arg(long, default_value_t = 3)]
    pub window_size: usize,

    /// Embedding dimension M per token
    #[arg(long, default_value_t = 50)]
    pub embedding_dim: usize,

    /// Hidden layer width H
    #[arg(long, default_value_t = 100)]
    pub hidden_dim: usize,

    /// Rows per optimizer step
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Rows per evaluation batch — larger than batch_size since
    /// no gradients are kept
    #[arg(long, default_value_t = 512)]
    pub eval_batch_size: usize,

    /// Number of full passes through the training windows
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// AdaGrad learning rate
    #[arg(long, default_value_t = 0.1)]
    pub lr: f64,

    /// Noise ids per batch for the sampled softmax
    #[arg(long, default_value_t = 64)]
    pub num_noise: usize,

    /// Fraction of sentences used for training; the rest
    /// validates
    #[arg(long, default_value_t = 0.9)]
    pub train_fraction: f64,

    /// Seed for the split, window shuffle, and noise draws
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Keep the training window matrix in corpus order instead
    /// of shuffling it once after extraction
    #[arg(long, default_value_t = false)]
    pub no_shuffle: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_dir: a.corpus_dir,
            checkpoint_dir: a.checkpoint_dir,
            vocab_size: a.vocab_size,
            window_size: a.window_size,
            embedding_dim: a.embedding_dim,
            hidden_dim: a.hidden_dim,
            batch_size: a.batch_size,
            eval_batch_size: a.eval_batch_size,
            epochs: a.epochs,
            lr: a.lr,
            num_noise: a.num_noise,
            train_fraction: a.train_fraction,
            seed: a.seed,
            shuffle_windows: !a.no_shuffle,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory of .txt files to score, one sentence per line
    #[arg(long)]
    pub corpus_dir: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

/// All arguments for the `sample` command
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// How many sentences to generate
    #[arg(long, default_value_t = 5)]
    pub count: usize,

    /// Hard cap on drawn tokens per sentence
    #[arg(long, default_value_t = 30)]
    pub max_length: usize,

    /// Sampling seed — same seed, same sentences
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Optional word prefix to continue, e.g. --start "the jury"
    #[arg(long, default_value = "")]
    pub start: String,
}
