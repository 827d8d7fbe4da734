// TaggedDoc — a token stream plus concept annotations kept alongside it.
//
// Annotations live in a side table parallel to the tokens rather than on
// the tokens themselves. Matched concept spans are merged into single
// tokens, so after tagging a multi-word disease name is one token whose
// annotation carries the term id.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::ontology::TermId;

use super::tokenizer::Token;

/// Per-token concept annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAnnotation {
    /// The token is part of (or is) a matched term
    pub is_term: bool,
    pub term_id: Option<TermId>,
    /// The token was produced by merging a matched span
    pub merged_concept: bool,
}

/// A concept found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSpan {
    /// Index of the merged token in `TaggedDoc::tokens`
    pub token: usize,
    /// Byte offsets in the source text
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub label: String,
    pub term_id: TermId,
    /// Other terms sharing the same name, in ontology order
    pub alternative_ids: Vec<TermId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedDoc {
    text: String,
    tokens: Vec<Token>,
    annotations: Vec<TokenAnnotation>,
    concepts: Vec<ConceptSpan>,
}

impl TaggedDoc {
    /// Assemble a document. `annotations` must be parallel to `tokens`.
    pub(crate) fn new(
        text: String,
        tokens: Vec<Token>,
        annotations: Vec<TokenAnnotation>,
        concepts: Vec<ConceptSpan>,
    ) -> Self {
        debug_assert_eq!(tokens.len(), annotations.len());
        Self {
            text,
            tokens,
            annotations,
            concepts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn annotation(&self, token: usize) -> Option<&TokenAnnotation> {
        self.annotations.get(token)
    }

    /// Tokens paired with their annotations.
    pub fn annotated_tokens(&self) -> impl Iterator<Item = (&Token, &TokenAnnotation)> {
        self.tokens.iter().zip(&self.annotations)
    }

    /// Every token annotated as part of a term, with that term's id. Includes
    /// tokens from overlapping matches that were not merged.
    pub fn term_tokens(&self) -> impl Iterator<Item = (&Token, &TermId)> {
        self.annotated_tokens()
            .filter(|(_, a)| a.is_term)
            .filter_map(|(token, a)| a.term_id.as_ref().map(|id| (token, id)))
    }

    /// Merged concept spans in document order.
    pub fn concepts(&self) -> &[ConceptSpan] {
        &self.concepts
    }

    /// Whether any token in the document is part of a matched term.
    pub fn has_concepts(&self) -> bool {
        self.annotations.iter().any(|a| a.is_term)
    }

    /// Whether any token in `range` (token indices) is part of a matched term.
    /// Out-of-range indices are ignored.
    pub fn span_has_concepts(&self, range: Range<usize>) -> bool {
        let end = range.end.min(self.annotations.len());
        let start = range.start.min(end);
        self.annotations[start..end].iter().any(|a| a.is_term)
    }

    /// Term ids of the merged concepts, in document order.
    pub fn term_ids(&self) -> Vec<&TermId> {
        self.concepts.iter().map(|c| &c.term_id).collect()
    }
}
