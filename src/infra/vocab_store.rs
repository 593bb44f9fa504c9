// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Persists the vocabulary next to the model checkpoints so
// evaluation and sampling decode ids with EXACTLY the id space
// the model was trained on. A vocabulary rebuilt from a
// different corpus slice would silently scramble every lookup.
//
// Saved form: vocab.json — the id → word list in id order.
// The word → id map is derived, so it is rebuilt on load
// rather than stored.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::data::vocab::Vocabulary;

pub struct VocabStore {
    dir: PathBuf,
}

impl VocabStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Write the vocabulary to vocab.json.
    pub fn save(&self, vocab: &Vocabulary) -> Result<()> {
        fs::create_dir_all(&self.dir).ok();
        let path = self.dir.join("vocab.json");

        let json = serde_json::to_string(vocab)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write vocabulary to '{}'", path.display()))?;

        tracing::debug!("Saved vocabulary ({} ids) to '{}'", vocab.size(), path.display());
        Ok(())
    }

    /// Load vocab.json and rebuild the derived word → id index.
    pub fn load(&self) -> Result<Vocabulary> {
        let path = self.dir.join("vocab.json");

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read vocabulary from '{}'. Have you run 'train' first?",
                    path.display()
                )
            })?;

        let mut vocab: Vocabulary = serde_json::from_str(&json)?;
        vocab.rebuild_index();

        tracing::info!("Loaded vocabulary with {} ids", vocab.size());
        Ok(vocab)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_round_trip() {
        let dir = std::env::temp_dir().join("nplm_vocab_store_test");
        let store = VocabStore::new(dir.to_string_lossy().to_string());

        let vocab =
            Vocabulary::build(["the", "jury", "the", "said"].into_iter(), 10).unwrap();
        store.save(&vocab).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.size(), vocab.size());
        assert_eq!(loaded.word_to_id("the"), vocab.word_to_id("the"));
        assert_eq!(loaded.id_to_word(3), "the");
        // The derived index must work after the round trip
        assert_eq!(loaded.word_to_id("never-seen"), crate::data::vocab::UNK_ID);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_without_save_is_an_error() {
        let store = VocabStore::new("/nonexistent/checkpoints");
        assert!(store.load().is_err());
    }
}
