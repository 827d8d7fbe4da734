// Case-insensitive phrase matcher over token sequences.
//
// Patterns are stored as lowercased token sequences in a hash map. Matching
// tries every start position against every pattern length seen so far, so
// the cost per document is tokens × longest pattern lookups, independent
// of how many patterns are registered.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::tokenizer::Token;

/// A pattern hit: token range `[start, end)` and the matching pattern id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseMatch {
    pub pattern: usize,
    pub start: usize,
    pub end: usize,
}

impl PhraseMatch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct PhraseMatcher {
    patterns: HashMap<Vec<String>, usize>,
    max_len: usize,
}

impl PhraseMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern given as token texts. Returns its id; adding the
    /// same sequence (ignoring case) twice returns the existing id.
    pub fn add(&mut self, tokens: &[String]) -> Option<usize> {
        if tokens.is_empty() {
            return None;
        }
        let key: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let next = self.patterns.len();
        let id = *self.patterns.entry(key).or_insert(next);
        self.max_len = self.max_len.max(tokens.len());
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// All matches in `tokens`, possibly overlapping, ordered by start then end.
    pub fn find(&self, tokens: &[Token]) -> Vec<PhraseMatch> {
        let lowered: Vec<String> = tokens.iter().map(Token::lower).collect();
        let mut matches = Vec::new();

        for start in 0..lowered.len() {
            let longest = self.max_len.min(lowered.len() - start);
            for len in 1..=longest {
                if let Some(&pattern) = self.patterns.get(&lowered[start..start + len]) {
                    matches.push(PhraseMatch {
                        pattern,
                        start,
                        end: start + len,
                    });
                }
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::tokenizer::Tokenizer;

    #[test]
    fn test_overlapping_matches_reported() {
        let tokenizer = Tokenizer::new();
        let mut matcher = PhraseMatcher::new();
        let viral = matcher.add(&tokenizer.lowered("viral infection")).unwrap();
        let infection = matcher.add(&tokenizer.lowered("Infection")).unwrap();

        let tokens = tokenizer.tokenize("A VIRAL infection.");
        let matches = matcher.find(&tokens);
        assert_eq!(
            matches,
            vec![
                PhraseMatch { pattern: viral, start: 1, end: 3 },
                PhraseMatch { pattern: infection, start: 2, end: 3 },
            ]
        );
    }

    #[test]
    fn test_duplicate_pattern_shares_id() {
        let mut matcher = PhraseMatcher::new();
        let a = matcher.add(&["Influenza".to_string()]);
        let b = matcher.add(&["influenza".to_string()]);
        assert_eq!(a, b);
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.add(&[]), None);
    }
}
