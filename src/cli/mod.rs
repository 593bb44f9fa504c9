// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`    — trains the NPLM on a plain-text corpus
//   2. `evaluate` — scores a corpus by perplexity
//   3. `sample`   — generates sentences from a checkpoint

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs, EvaluateArgs, SampleArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "nplm",
    version = "0.1.0",
    about = "Train a fixed-context neural language model on a text corpus, \
             then score or sample from it."
)]
pub struct Cli {
    /// The subcommand to run (train, evaluate, or sample)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use
    /// case. This keeps the CLI layer thin — it only routes,
    /// never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Evaluate(args) => Self::run_evaluate(args),
            Commands::Sample(args) => Self::run_sample(args),
        }
    }

    /// Handles the `train` subcommand.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on corpus in: {}", args.corpus_dir);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `evaluate` subcommand.
    fn run_evaluate(args: EvaluateArgs) -> Result<()> {
        use crate::application::evaluate_use_case::EvaluateUseCase;

        let use_case = EvaluateUseCase::new(
            args.checkpoint_dir.clone(),
            args.corpus_dir.clone(),
        );
        let report = use_case.execute()?;

        println!("\nScored {} windows", report.row_count);
        println!("Perplexity:          {:.2}", report.perplexity);
        println!("Perplexity (no unk): {:.2}", report.filtered_perplexity);
        Ok(())
    }

    /// Handles the `sample` subcommand.
    fn run_sample(args: SampleArgs) -> Result<()> {
        use crate::application::sample_use_case::SampleUseCase;

        let mut use_case = SampleUseCase::new(
            args.checkpoint_dir.clone(),
            args.max_length,
            args.seed,
        )?;

        let start_words: Vec<String> = args
            .start
            .split_whitespace()
            .map(str::to_string)
            .collect();

        for (i, sample) in use_case
            .sample_many(args.count, &start_words)?
            .iter()
            .enumerate()
        {
            println!(
                "{:>2}. {}  (logp={:.2}, per-token={:.2})",
                i + 1,
                sample.text,
                sample.log_prob,
                sample.avg_log_prob,
            );
        }
        Ok(())
    }
}
