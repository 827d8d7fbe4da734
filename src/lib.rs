// Lexis: classic NLP toolkit
//
// This is the library root. Each module is one self-contained capability;
// only `tagging` reaches into another module (`ontology`, for term names).

pub mod bleu;
pub mod config;
pub mod fuzzy;
pub mod ontology;
pub mod output;
pub mod tagging;
pub mod topics;
