// Rule-based word tokenizer.
//
// Splits on whitespace, then peels opening punctuation off the front and
// closing punctuation off the back of each chunk, and splits hyphens that
// sit between two letters ("non-small" → "non", "-", "small"). Hyphens
// touching digits stay inside the token, so "Covid-19" and "H1N1" survive
// whole. Term names go through the same tokenizer, which is what makes
// token-level phrase matching line up.

use serde::{Deserialize, Serialize};

const PREFIX_CHARS: &[char] = &['"', '\'', '(', '[', '{', '<', '“', '‘', '¿', '¡'];
const SUFFIX_CHARS: &[char] = &[
    '"', '\'', ')', ']', '}', '>', '.', ',', ';', ':', '!', '?', '%', '”', '’', '…',
];

/// A token with its byte offsets in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Whether whitespace follows the token in the source
    pub whitespace_after: bool,
}

impl Token {
    fn new(source: &str, start: usize, end: usize) -> Self {
        Self {
            text: source[start..end].to_string(),
            start,
            end,
            whitespace_after: false,
        }
    }

    /// Case-folded form used for matching.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut chunk_start: Option<usize> = None;

        for (i, c) in text.char_indices() {
            if c.is_whitespace() {
                if let Some(start) = chunk_start.take() {
                    split_chunk(text, start, i, &mut tokens);
                    if let Some(last) = tokens.last_mut() {
                        last.whitespace_after = true;
                    }
                }
            } else if chunk_start.is_none() {
                chunk_start = Some(i);
            }
        }
        if let Some(start) = chunk_start {
            split_chunk(text, start, text.len(), &mut tokens);
        }
        tokens
    }

    /// Lowercased token texts, the key form used by the phrase matcher.
    pub fn lowered(&self, text: &str) -> Vec<String> {
        self.tokenize(text).iter().map(Token::lower).collect()
    }
}

fn split_chunk(source: &str, mut start: usize, mut end: usize, out: &mut Vec<Token>) {
    // Opening punctuation
    while let Some(c) = source[start..end].chars().next() {
        if !PREFIX_CHARS.contains(&c) || start + c.len_utf8() >= end {
            break;
        }
        out.push(Token::new(source, start, start + c.len_utf8()));
        start += c.len_utf8();
    }

    // Closing punctuation, emitted after the core
    let mut suffixes = Vec::new();
    while let Some(c) = source[start..end].chars().next_back() {
        if !SUFFIX_CHARS.contains(&c) || end - c.len_utf8() <= start {
            break;
        }
        suffixes.push(Token::new(source, end - c.len_utf8(), end));
        end -= c.len_utf8();
    }

    split_infixes(source, start, end, out);
    out.extend(suffixes.into_iter().rev());
}

/// Split letter-hyphen-letter infixes.
fn split_infixes(source: &str, start: usize, end: usize, out: &mut Vec<Token>) {
    let chars: Vec<(usize, char)> = source[start..end]
        .char_indices()
        .map(|(i, c)| (start + i, c))
        .collect();

    let mut piece_start = start;
    for (k, &(pos, c)) in chars.iter().enumerate() {
        let between_letters = k > 0
            && k + 1 < chars.len()
            && chars[k - 1].1.is_alphabetic()
            && chars[k + 1].1.is_alphabetic();
        if c == '-' && between_letters {
            out.push(Token::new(source, piece_start, pos));
            out.push(Token::new(source, pos, pos + 1));
            piece_start = pos + 1;
        }
    }
    out.push(Token::new(source, piece_start, end));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_punctuation_peeled() {
        let tokens = Tokenizer::new().tokenize("(viral myocarditis...)");
        assert_eq!(
            texts(&tokens),
            vec!["(", "viral", "myocarditis", ".", ".", ".", ")"]
        );
    }

    #[test]
    fn test_digit_hyphen_kept_letter_hyphen_split() {
        let tokens = Tokenizer::new().tokenize("Covid-19 and over-expression");
        assert_eq!(
            texts(&tokens),
            vec!["Covid-19", "and", "over", "-", "expression"]
        );
    }

    #[test]
    fn test_offsets_and_whitespace() {
        let text = "H1N1 influenza.";
        let tokens = Tokenizer::new().tokenize(text);
        assert_eq!(texts(&tokens), vec!["H1N1", "influenza", "."]);
        assert!(tokens[0].whitespace_after);
        assert!(!tokens[1].whitespace_after);
        assert_eq!(&text[tokens[1].start..tokens[1].end], "influenza");
    }

    #[test]
    fn test_lone_punctuation_is_one_token() {
        let tokens = Tokenizer::new().tokenize("a , b");
        assert_eq!(texts(&tokens), vec!["a", ",", "b"]);
    }
}
