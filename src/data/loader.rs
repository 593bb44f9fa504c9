// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads a directory of plain-text corpus files (.txt), one
// sentence per line, and returns them as domain Sentences.
//
// Brown-style corpora ship as pre-tokenised text, so sentence
// tokenisation here is plain whitespace splitting after the
// normaliser has cleaned the line. Blank lines are skipped.
//
// Files are read in sorted filename order so the sentence
// sequence (and therefore vocabulary tie-breaking and the
// train/validation split) is identical across runs.

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};

use crate::data::normalizer::Normalizer;
use crate::domain::sentence::Sentence;
use crate::domain::traits::CorpusSource;

pub struct TextLoader {
    dir: PathBuf,
    normalizer: Normalizer,
}

impl TextLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            normalizer: Normalizer::new(),
        }
    }

    fn load_file(&self, path: &PathBuf) -> Result<Vec<Sentence>> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read corpus file '{}'", path.display()))?;

        let sentences = text
            .lines()
            .map(|line| self.normalizer.clean(line))
            .filter(|line| !line.is_empty())
            .map(|line| Sentence::from_line(&line))
            .collect();

        Ok(sentences)
    }
}

impl CorpusSource for TextLoader {
    /// Load every .txt file under the corpus directory.
    fn load_all(&self) -> Result<Vec<Sentence>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot open corpus directory '{}'", self.dir.display()))?;

        // Collect and sort paths first — read_dir order is
        // filesystem-dependent and we need determinism.
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "txt").unwrap_or(false))
            .collect();
        paths.sort();

        if paths.is_empty() {
            bail!(
                "No .txt files found in '{}'. \
                 Expected one-sentence-per-line corpus files.",
                self.dir.display()
            );
        }

        let mut sentences = Vec::new();
        for path in &paths {
            let mut s = self.load_file(path)?;
            tracing::debug!("Loaded {} sentences from '{}'", s.len(), path.display());
            sentences.append(&mut s);
        }

        tracing::info!(
            "Loaded {} sentences from {} corpus files",
            sentences.len(),
            paths.len()
        );
        Ok(sentences)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_sentences_in_filename_order() {
        let dir = std::env::temp_dir().join("nplm_loader_test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.txt"), "second file\n").unwrap();
        fs::write(dir.join("a.txt"), "first file\n\nthird line\n").unwrap();
        fs::write(dir.join("notes.md"), "ignored\n").unwrap();

        let loader = TextLoader::new(&dir);
        let sentences = loader.load_all().unwrap();

        // a.txt first (sorted), blank line skipped, .md ignored
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].words, vec!["first", "file"]);
        assert_eq!(sentences[2].words, vec!["second", "file"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let loader = TextLoader::new("/nonexistent/corpus/dir");
        assert!(loader.load_all().is_err());
    }
}
