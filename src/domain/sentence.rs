/// One tokenised corpus sentence. Boundary markers are NOT
/// stored here — the vocabulary adds <s>/</s> at encoding time,
/// so the domain object stays a plain word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub words: Vec<String>,
}

impl Sentence {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Tokenise a pre-cleaned corpus line by whitespace.
    pub fn from_line(line: &str) -> Self {
        Self {
            words: line.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_line_splits_on_whitespace() {
        let s = Sentence::from_line("the jury said");
        assert_eq!(s.words, vec!["the", "jury", "said"]);
        assert_eq!(s.word_count(), 3);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(Sentence::from_line("").word_count(), 0);
    }
}
