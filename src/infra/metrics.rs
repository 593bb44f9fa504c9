// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:           the epoch number (1, 2, 3, ...)
//   - train_loss:      average sampled-softmax loss over batches
//   - val_loss:        exact cross-entropy on held-out windows
//   - val_ppl:         exp(val_loss) — validation perplexity
//   - skipped_batches: optimizer steps skipped on non-finite loss
//
// Output file: checkpoints/metrics.csv
//
// How to read the metrics:
//   - val_ppl should fall each epoch (the model is learning)
//   - val_loss rising while train_loss falls → overfitting
//   - skipped_batches > 0 → the run hit numeric divergence;
//     a persistent count means the learning rate is too high
//
// Note train_loss and val_loss are NOT on the same scale:
// the sampled objective normalises over ~batch+K candidates,
// the validation loss over the full vocabulary.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,

    /// Average sampled-softmax training loss over the epoch's
    /// non-skipped batches
    pub train_loss: f64,

    /// Exact cross-entropy on the validation windows
    pub val_loss: f64,

    /// exp(val_loss) — lower is better, never below 1
    pub val_ppl: f64,

    /// Batches whose optimizer step was skipped because the
    /// loss came back NaN/Inf
    pub skipped_batches: usize,
}

impl EpochMetrics {
    pub fn new(
        epoch: usize,
        train_loss: f64,
        val_loss: f64,
        val_ppl: f64,
        skipped_batches: usize,
    ) -> Self {
        Self { epoch, train_loss, val_loss, val_ppl, skipped_batches }
    }

    /// Returns true if this epoch improved over the previous
    /// best validation loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger, writing the CSV header if the
    /// file doesn't exist yet so reruns append instead of
    /// clobbering history.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss,val_ppl,skipped_batches")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new CSV row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.val_ppl,
            m.skipped_batches,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_ppl={:.2}",
            m.epoch,
            m.train_loss,
            m.val_ppl,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 2.3, 9.97, 0);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
    }

    #[test]
    fn test_header_and_append() {
        let dir = std::env::temp_dir().join("nplm_metrics_test");
        let _ = fs::remove_dir_all(&dir);

        let logger = MetricsLogger::new(dir.to_string_lossy().to_string()).unwrap();
        logger.log(&EpochMetrics::new(1, 5.0, 6.0, 403.43, 2)).unwrap();
        logger.log(&EpochMetrics::new(2, 4.0, 5.5, 244.69, 0)).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,train_loss,val_loss,val_ppl,skipped_batches");
        assert!(lines[1].starts_with("1,5.000000"));
        assert!(lines[2].ends_with(",0"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
