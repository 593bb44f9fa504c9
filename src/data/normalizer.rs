// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Cleans one raw corpus line before whitespace tokenisation.
//
// Corpus dumps often contain:
//   - Non-breaking spaces (U+00A0)
//   - Zero-width spaces (U+200B)
//   - Carriage returns from Windows line endings
//   - Tab characters and runs of spaces
//
// Left in place, each variant would become its own "word" and
// waste vocabulary slots, so everything is mapped to a single
// plain space here. Words are also lowercased: the vocabulary
// is frequency-ranked and capped at V entries, and case-split
// counts ("The" vs "the") would push real words below the
// cutoff.

pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw line for downstream tokenisation.
    pub fn clean(&self, line: &str) -> String {
        let mapped: String = line
            .chars()
            .map(|c| match c {
                '\t' => ' ',
                '\u{00A0}' => ' ',
                '\u{200B}' => ' ',
                '\u{FEFF}' => ' ',
                '\r' => ' ',
                c if c.is_control() => ' ',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        // Collapse space runs and trim the edges in one pass
        mapped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_runs() {
        let n = Normalizer::new();
        assert_eq!(n.clean("the   quick\tfox"), "the quick fox");
    }

    #[test]
    fn test_lowercases() {
        let n = Normalizer::new();
        assert_eq!(n.clean("The Fulton County Jury"), "the fulton county jury");
    }

    #[test]
    fn test_strips_control_and_unicode_spaces() {
        let n = Normalizer::new();
        assert_eq!(n.clean("a\u{00A0}b\x01c"), "a b c");
    }

    #[test]
    fn test_trims_edges() {
        let n = Normalizer::new();
        assert_eq!(n.clean("  said the jury  "), "said the jury");
    }

    #[test]
    fn test_empty_line() {
        let n = Normalizer::new();
        assert_eq!(n.clean("   "), "");
    }
}
