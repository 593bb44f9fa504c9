// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// implementations can be swapped without touching the layers
// that use them:
//   - TextLoader implements CorpusSource
//   - A future ZipLoader or HttpLoader could too
//   - The application layer only sees CorpusSource
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::sentence::Sentence;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce a corpus of sentences.
///
/// Implementations:
///   - TextLoader → a directory of one-sentence-per-line .txt files
pub trait CorpusSource {
    /// Load every sentence from this source, in a deterministic
    /// order.
    fn load_all(&self) -> Result<Vec<Sentence>>;
}
