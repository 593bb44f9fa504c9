// ============================================================
// Layer 4 — Vocabulary Builder
// ============================================================
// Builds a closed, frequency-ranked word vocabulary of fixed
// size V from the training corpus.
//
// Id layout (dense, 0-indexed, stable for the object's lifetime):
//   0          → <s>   sentence-start marker
//   1          → </s>  sentence-end marker
//   2          → <unk> unknown / out-of-vocabulary placeholder
//   3 .. V-1   → the V-3 most frequent corpus words, assigned
//                in descending frequency order; ties are broken
//                by first-seen order in the corpus
//
// Lookups for words outside the top V-3 return the <unk> id —
// this is a silent substitution, never an error.
//
// Reference: Bengio et al. (2003) §3 (vocabulary construction)
//            Rust Book §8 (HashMaps)

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Reserved id for the sentence-start marker.
pub const START_ID: usize = 0;
/// Reserved id for the sentence-end marker.
pub const END_ID: usize = 1;
/// Reserved id for the unknown-token placeholder.
pub const UNK_ID: usize = 2;

/// Number of reserved special tokens (<s>, </s>, <unk>).
pub const NUM_SPECIAL: usize = 3;

const START_TOKEN: &str = "<s>";
const END_TOKEN: &str = "</s>";
const UNK_TOKEN: &str = "<unk>";

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// Immutable word ↔ id mapping. Built once from the training
/// split, then shared by training, evaluation, and sampling so
/// all three see exactly the same id space.
///
/// Serialisable so it can be written to the checkpoint directory
/// and reloaded for evaluation/sampling (see infra::vocab_store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    /// id → word, in id order. The single source of truth;
    /// the reverse map is rebuilt from it on deserialisation.
    id_to_word: Vec<String>,

    /// word → id, derived from `id_to_word`
    #[serde(skip, default)]
    word_to_id: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary of exactly `size` ids from an iterator
    /// of corpus words.
    ///
    /// Counts word frequencies, keeps the `size - 3` most frequent
    /// (3 ids are reserved for the special tokens), and assigns
    /// ids by descending frequency. If the corpus has fewer than
    /// `size - 3` distinct words, the vocabulary is simply smaller
    /// than requested — a degenerate corpus yields the three
    /// special tokens alone.
    pub fn build<'a>(words: impl IntoIterator<Item = &'a str>, size: usize) -> Result<Self> {
        if size <= NUM_SPECIAL {
            bail!(
                "vocabulary size must exceed {} (got {}): \
                 {} ids are reserved for <s>, </s>, <unk>",
                NUM_SPECIAL, size, NUM_SPECIAL
            );
        }

        // Count frequencies, remembering first-seen order for the
        // tie-break so construction is fully deterministic.
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (pos, w) in words.into_iter().enumerate() {
            let entry = counts.entry(w).or_insert((0, pos));
            entry.0 += 1;
        }

        // Descending frequency, then ascending first-seen position.
        let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        ranked.truncate(size - NUM_SPECIAL);

        let mut id_to_word = Vec::with_capacity(ranked.len() + NUM_SPECIAL);
        id_to_word.push(START_TOKEN.to_string());
        id_to_word.push(END_TOKEN.to_string());
        id_to_word.push(UNK_TOKEN.to_string());
        id_to_word.extend(ranked.into_iter().map(|(w, _)| w.to_string()));

        Ok(Self::from_id_list(id_to_word))
    }

    /// Rebuild from a saved id → word list (used when loading
    /// `vocab.json` from the checkpoint directory).
    pub fn from_id_list(id_to_word: Vec<String>) -> Self {
        let word_to_id = id_to_word
            .iter()
            .enumerate()
            .map(|(id, w)| (w.clone(), id))
            .collect();
        Self { id_to_word, word_to_id }
    }

    /// Look up a word's id. Out-of-vocabulary words map to the
    /// reserved <unk> id — by contract this is not an error.
    pub fn word_to_id(&self, word: &str) -> usize {
        self.word_to_id.get(word).copied().unwrap_or(UNK_ID)
    }

    /// Look up the word for an id. Ids are dense, so anything
    /// outside [0, size) is a caller bug; we surface it as <unk>
    /// rather than panicking inside display code.
    pub fn id_to_word(&self, id: usize) -> &str {
        self.id_to_word
            .get(id)
            .map(String::as_str)
            .unwrap_or(UNK_TOKEN)
    }

    /// Number of ids in the vocabulary, special tokens included.
    pub fn size(&self) -> usize {
        self.id_to_word.len()
    }

    /// Encode a tokenised sentence as ids, wrapped in the
    /// sentence boundary markers: <s> w1 w2 ... wn </s>
    pub fn encode_sentence(&self, words: &[String]) -> Vec<usize> {
        let mut ids = Vec::with_capacity(words.len() + 2);
        ids.push(START_ID);
        ids.extend(words.iter().map(|w| self.word_to_id(w)));
        ids.push(END_ID);
        ids
    }

    /// The saved form: id → word in id order.
    pub fn id_list(&self) -> &[String] {
        &self.id_to_word
    }

    /// Restore the derived word → id map after deserialisation.
    /// serde skips the HashMap field, so `vocab_store` calls this
    /// right after loading.
    pub fn rebuild_index(&mut self) {
        self.word_to_id = self
            .id_to_word
            .iter()
            .enumerate()
            .map(|(id, w)| (w.clone(), id))
            .collect();
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn test_special_ids_are_fixed() {
        let v = Vocabulary::build(words("a b c"), 10).unwrap();
        assert_eq!(v.word_to_id("<s>"), START_ID);
        assert_eq!(v.word_to_id("</s>"), END_ID);
        assert_eq!(v.word_to_id("<unk>"), UNK_ID);
    }

    #[test]
    fn test_frequency_ordering() {
        // "the" appears 3x, "cat" 2x, "sat" 1x → ids 3, 4, 5
        let v = Vocabulary::build(words("the cat the sat the cat"), 10).unwrap();
        assert_eq!(v.word_to_id("the"), 3);
        assert_eq!(v.word_to_id("cat"), 4);
        assert_eq!(v.word_to_id("sat"), 5);
        assert_eq!(v.size(), 6);
    }

    #[test]
    fn test_tie_break_is_first_seen() {
        // "b" and "a" both appear once; "b" is seen first
        let v = Vocabulary::build(words("b a"), 10).unwrap();
        assert_eq!(v.word_to_id("b"), 3);
        assert_eq!(v.word_to_id("a"), 4);
    }

    #[test]
    fn test_truncates_to_requested_size() {
        let v = Vocabulary::build(words("a a a b b c"), 5).unwrap();
        assert_eq!(v.size(), 5);
        assert_eq!(v.word_to_id("a"), 3);
        assert_eq!(v.word_to_id("b"), 4);
        // "c" fell below the cutoff → unknown
        assert_eq!(v.word_to_id("c"), UNK_ID);
    }

    #[test]
    fn test_round_trip_in_vocabulary() {
        let v = Vocabulary::build(words("alpha beta gamma alpha"), 10).unwrap();
        for w in ["alpha", "beta", "gamma"] {
            assert_eq!(v.id_to_word(v.word_to_id(w)), w);
        }
        // OOV round-trips to the placeholder
        assert_eq!(v.id_to_word(v.word_to_id("delta")), "<unk>");
    }

    #[test]
    fn test_empty_input_is_specials_only() {
        let v = Vocabulary::build(std::iter::empty(), 10).unwrap();
        assert_eq!(v.size(), NUM_SPECIAL);
    }

    #[test]
    fn test_rejects_degenerate_size() {
        assert!(Vocabulary::build(words("a b"), 3).is_err());
    }

    #[test]
    fn test_encode_sentence_wraps_with_markers() {
        let v = Vocabulary::build(words("hello world"), 10).unwrap();
        let s: Vec<String> = ["hello", "world"].iter().map(|s| s.to_string()).collect();
        let ids = v.encode_sentence(&s);
        assert_eq!(ids.first(), Some(&START_ID));
        assert_eq!(ids.last(), Some(&END_ID));
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_saved_form_round_trip() {
        let v = Vocabulary::build(words("x y z x"), 10).unwrap();
        let mut restored: Vocabulary =
            serde_json::from_str(&serde_json::to_string(&v).unwrap()).unwrap();
        restored.rebuild_index();
        assert_eq!(restored.size(), v.size());
        assert_eq!(restored.word_to_id("x"), v.word_to_id("x"));
    }
}
