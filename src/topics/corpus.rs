// Corpus loading — one document per line.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

/// Maximum characters kept for a document's title.
const TITLE_CHARS: usize = 100;

/// Raw documents plus a short title for each.
#[derive(Debug, Clone, Serialize)]
pub struct Corpus {
    pub documents: Vec<String>,
    pub titles: Vec<String>,
}

impl Corpus {
    /// Build a corpus from text, one document per line (lines are trimmed).
    pub fn from_text(text: &str) -> Self {
        let documents: Vec<String> = text.lines().map(|l| l.trim().to_string()).collect();
        let titles = documents
            .iter()
            .map(|d| d.chars().take(TITLE_CHARS).collect())
            .collect();
        Self { documents, titles }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Read a corpus file from disk.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    let corpus = Corpus::from_text(&text);
    info!(
        documents = corpus.len(),
        path = %path.display(),
        "Loaded corpus"
    );
    Ok(corpus)
}
