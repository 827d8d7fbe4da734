// Ontology loading and hierarchy navigation (OBO format).

pub mod download;
pub mod model;
pub mod obo;

use std::path::Path;

use anyhow::{Context, Result};

pub use model::{Ontology, Synonym, SynonymScope, Term, TermId};

impl Ontology {
    /// Parse OBO text.
    pub fn parse(text: &str) -> Result<Self> {
        obo::parse(text)
    }

    /// Read and parse an OBO file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ontology file: {}", path.display()))?;
        obo::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
