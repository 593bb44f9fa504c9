// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved per training run:
//   1. Model weights (.mpk.gz per epoch) — all learned parameters
//   2. latest_epoch.json                 — which epoch was last saved
//   3. train_config.json                 — run hyperparameters
//   (vocab.json is handled by vocab_store, same directory)
//
// Why save the config separately?
//   Evaluation and sampling need the exact architecture
//   (vocab_size, window_size, dims) to rebuild the model before
//   loading weights into it. CompactRecorder is type-safe:
//   loading into a mismatched architecture fails.
//
// File naming convention:
//   checkpoints/
//     model_epoch_1.mpk.gz   ← weights after epoch 1
//     model_epoch_2.mpk.gz   ← weights after epoch 2
//     ...
//     latest_epoch.json
//     train_config.json
//     vocab.json
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::NplmModel;

/// Manages saving and loading of model checkpoints.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory
    /// if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights for a given epoch and update the
    /// latest-epoch pointer.
    pub fn save_model<B: AutodiffBackend>(
        &self,
        model: &NplmModel<B>,
        epoch: usize,
    ) -> Result<()> {
        // Recorder adds the extension itself
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        let latest_path = self.dir.join("latest_epoch.json");
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write latest_epoch.json")?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load model weights from the latest saved checkpoint into
    /// a freshly built model of the matching architecture.
    pub fn load_model<B: Backend>(
        &self,
        model: NplmModel<B>,
        device: &B::Device,
    ) -> Result<NplmModel<B>> {
        let epoch = self.latest_epoch()?;
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON. Called before
    /// training starts so evaluation/sampling can rebuild the
    /// exact model even if the run is interrupted.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'evaluate' or 'sample'.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Read latest_epoch.json and return the epoch number.
    fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join("latest_epoch.json");

        let s = fs::read_to_string(&path)
            .with_context(|| {
                "Cannot find 'latest_epoch.json'. Have you run 'train' first?"
            })?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}
