use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables.
///
/// Nothing is required: every setting has a default that reproduces the
/// stock demos. The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where to download the ontology from (defaults to the Disease Ontology)
    pub ontology_url: String,
    /// Local OBO file to use instead of downloading
    pub ontology_path: Option<PathBuf>,
    /// Directory for the downloaded ontology
    pub cache_dir: PathBuf,
    /// Re-download the cached ontology once it is this many days old
    pub ontology_max_age_days: u32,
    /// One-document-per-line corpus for topic modeling
    pub corpus_path: PathBuf,
    /// Also tag EXACT synonyms, not only primary term names
    pub match_synonyms: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let cache_dir = env::var("LEXIS_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::ontology::download::default_cache_dir());

        let ontology_max_age_days = match env::var("LEXIS_ONTOLOGY_MAX_AGE_DAYS") {
            Ok(raw) => raw.trim().parse().with_context(|| {
                format!("LEXIS_ONTOLOGY_MAX_AGE_DAYS must be a whole number of days, got {raw:?}")
            })?,
            Err(_) => 30,
        };

        let match_synonyms = match env::var("LEXIS_MATCH_SYNONYMS").as_deref() {
            Ok("1") | Ok("true") | Ok("yes") => true,
            Ok("0") | Ok("false") | Ok("no") | Ok("") | Err(_) => false,
            Ok(other) => anyhow::bail!(
                "LEXIS_MATCH_SYNONYMS must be true or false, got {other:?}"
            ),
        };

        Ok(Self {
            ontology_url: env::var("LEXIS_ONTOLOGY_URL")
                .unwrap_or_else(|_| crate::ontology::download::DEFAULT_ONTOLOGY_URL.to_string()),
            ontology_path: env::var("LEXIS_ONTOLOGY_PATH").ok().map(PathBuf::from),
            cache_dir,
            ontology_max_age_days,
            corpus_path: env::var("LEXIS_CORPUS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("lsa_practice.txt")),
            match_synonyms,
        })
    }

    /// Check that a configured local ontology file exists.
    /// Call this before any operation that loads the ontology.
    pub fn require_ontology(&self) -> Result<()> {
        if let Some(path) = &self.ontology_path {
            if !path.exists() {
                anyhow::bail!(
                    "LEXIS_ONTOLOGY_PATH points to {}, which does not exist.\n\
                     Unset it to download from {} instead.",
                    path.display(),
                    self.ontology_url
                );
            }
        }
        Ok(())
    }
}
