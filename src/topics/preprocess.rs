// Document preprocessing: lowercase, tokenize, drop stop words, stem.

use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

/// Turns raw document text into stemmed content tokens.
pub struct Preprocessor {
    word_re: Regex,
    stop_words: HashSet<String>,
    stemmer: Stemmer,
}

impl Preprocessor {
    pub fn new() -> Result<Self> {
        let stop_words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        Ok(Self {
            word_re: Regex::new(r"\w+")?,
            stop_words,
            stemmer: Stemmer::create(Algorithm::English),
        })
    }

    /// Process one document. Stop words are matched before stemming.
    /// Words are Unicode `\w` runs, so accented letters stay inside a word.
    pub fn process(&self, document: &str) -> Vec<String> {
        let lower = document.to_lowercase();
        self.word_re
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .map(|token| self.stemmer.stem(token).into_owned())
            .collect()
    }

    pub fn process_all(&self, documents: &[String]) -> Vec<Vec<String>> {
        documents.iter().map(|d| self.process(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_removes_stop_words_and_stems() {
        let pre = Preprocessor::new().unwrap();
        let tokens = pre.process("The astronomers were OBSERVING the galaxies!");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(tokens.contains(&"observ".to_string()));
        assert!(tokens.contains(&"galaxi".to_string()));
    }

    #[test]
    fn test_accented_words_stay_whole() {
        let pre = Preprocessor::new().unwrap();
        let tokens = pre.process("Naïve café résumé Zürich");
        assert_eq!(tokens.len(), 4, "{tokens:?}");
        assert!(tokens.iter().all(|t| !t.is_ascii()), "{tokens:?}");
        assert!(tokens.iter().any(|t| t.starts_with("zürich")), "{tokens:?}");
    }

    #[test]
    fn test_process_empty_document() {
        let pre = Preprocessor::new().unwrap();
        assert!(pre.process("").is_empty());
        assert!(pre.process("   ...   ").is_empty());
    }
}
