// Concept tagging — match ontology term names in free text.

pub mod document;
pub mod extractor;
pub mod matcher;
pub mod spans;
pub mod tokenizer;

pub use document::{ConceptSpan, TaggedDoc, TokenAnnotation};
pub use extractor::{ConceptExtractor, TaggerOptions};
