// Ontology concept extractor.
//
// Registers every named ontology term as a phrase pattern, then tags text:
// find all pattern matches, annotate the tokens they cover, keep the
// longest non-overlapping matches, and merge each kept match into one
// token. Term ids travel with the pattern that matched, so the span's
// surface text (which may differ in case or spacing) is never used as a
// lookup key.

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ontology::{Ontology, SynonymScope, TermId};

use super::document::{ConceptSpan, TaggedDoc, TokenAnnotation};
use super::matcher::{PhraseMatch, PhraseMatcher};
use super::spans::filter_spans;
use super::tokenizer::{Token, Tokenizer};

/// Knobs for building an extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggerOptions {
    /// Label attached to every concept span
    pub label: String,
    /// Also register EXACT synonyms as patterns
    pub match_synonyms: bool,
    /// Leave obsolete terms out of the index
    pub skip_obsolete: bool,
}

impl Default for TaggerOptions {
    fn default() -> Self {
        Self {
            label: "DOID".to_string(),
            match_synonyms: false,
            skip_obsolete: false,
        }
    }
}

/// Terms registered under one pattern, in ontology order.
#[derive(Debug, Clone, Default)]
struct PatternEntry {
    ids: Vec<TermId>,
}

pub struct ConceptExtractor {
    label: String,
    tokenizer: Tokenizer,
    matcher: PhraseMatcher,
    entries: Vec<PatternEntry>,
}

impl ConceptExtractor {
    /// Index every named term in `ontology`.
    pub fn new(ontology: &Ontology, options: &TaggerOptions) -> Self {
        let tokenizer = Tokenizer::new();
        let mut matcher = PhraseMatcher::new();
        let mut entries: Vec<PatternEntry> = Vec::new();
        let mut shared_names = 0usize;

        let pb = ProgressBar::new(ontology.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40}] {percent}% {msg}")
                .expect("valid template")
                .progress_chars("=> "),
        );
        pb.set_message("importing terms");

        for term in ontology.terms() {
            pb.inc(1);
            if options.skip_obsolete && term.obsolete {
                continue;
            }

            let mut names: Vec<&str> = term.name.as_deref().into_iter().collect();
            if options.match_synonyms {
                names.extend(
                    term.synonyms
                        .iter()
                        .filter(|s| s.scope == SynonymScope::Exact)
                        .map(|s| s.text.as_str()),
                );
            }

            for name in names {
                let Some(pattern) = matcher.add(&tokenizer.lowered(name)) else {
                    continue;
                };
                if pattern == entries.len() {
                    entries.push(PatternEntry::default());
                }
                let entry = &mut entries[pattern];
                if !entry.ids.contains(&term.id) {
                    if let Some(first) = entry.ids.first() {
                        shared_names += 1;
                        debug!(term_name = name, first = %first, also = %term.id, "Name shared by several terms");
                    }
                    entry.ids.push(term.id.clone());
                }
            }
        }
        pb.finish_and_clear();

        if shared_names > 0 {
            warn!(
                shared_names,
                "Some names map to more than one term; the first term in ontology order is reported"
            );
        }
        info!(patterns = matcher.len(), "Built concept matcher");

        Self {
            label: options.label.clone(),
            tokenizer,
            matcher,
            entries,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of distinct name patterns.
    pub fn pattern_count(&self) -> usize {
        self.matcher.len()
    }

    /// Tokenize and tag a text.
    pub fn tag(&self, text: &str) -> TaggedDoc {
        let tokens = self.tokenizer.tokenize(text);
        let matches = self.matcher.find(&tokens);
        let kept = filter_spans(&matches);

        let mut annotations = vec![TokenAnnotation::default(); tokens.len()];

        // Shorter matches first so longer ones overwrite them, kept spans last
        let mut ordered = matches.clone();
        ordered.sort_by(|a, b| a.len().cmp(&b.len()).then(a.start.cmp(&b.start)));
        for m in ordered.iter().chain(&kept) {
            let id = self.primary_id(m);
            for annotation in &mut annotations[m.start..m.end] {
                annotation.is_term = true;
                annotation.term_id = Some(id.clone());
            }
        }

        let (tokens, annotations, concepts) = self.merge(text, tokens, annotations, &kept);
        debug!(
            tokens = tokens.len(),
            matches = matches.len(),
            concepts = concepts.len(),
            "Tagged document"
        );
        TaggedDoc::new(text.to_string(), tokens, annotations, concepts)
    }

    fn primary_id(&self, m: &PhraseMatch) -> &TermId {
        // Every registered pattern has at least one id
        &self.entries[m.pattern].ids[0]
    }

    /// Collapse each kept span into a single token.
    fn merge(
        &self,
        text: &str,
        tokens: Vec<Token>,
        annotations: Vec<TokenAnnotation>,
        kept: &[PhraseMatch],
    ) -> (Vec<Token>, Vec<TokenAnnotation>, Vec<ConceptSpan>) {
        let mut out_tokens = Vec::with_capacity(tokens.len());
        let mut out_annotations = Vec::with_capacity(tokens.len());
        let mut concepts = Vec::with_capacity(kept.len());

        let mut spans = kept.iter().peekable();
        let mut i = 0;
        while i < tokens.len() {
            match spans.peek() {
                Some(span) if span.start == i => {
                    let first = &tokens[span.start];
                    let last = &tokens[span.end - 1];
                    let surface = &text[first.start..last.end];
                    let ids = &self.entries[span.pattern].ids;

                    concepts.push(ConceptSpan {
                        token: out_tokens.len(),
                        start: first.start,
                        end: last.end,
                        text: surface.to_string(),
                        label: self.label.clone(),
                        term_id: ids[0].clone(),
                        alternative_ids: ids[1..].to_vec(),
                    });
                    out_tokens.push(Token {
                        text: surface.to_string(),
                        start: first.start,
                        end: last.end,
                        whitespace_after: last.whitespace_after,
                    });
                    out_annotations.push(TokenAnnotation {
                        is_term: true,
                        term_id: Some(ids[0].clone()),
                        merged_concept: true,
                    });

                    i = span.end;
                    spans.next();
                }
                _ => {
                    out_tokens.push(tokens[i].clone());
                    out_annotations.push(annotations[i].clone());
                    i += 1;
                }
            }
        }
        (out_tokens, out_annotations, concepts)
    }
}
