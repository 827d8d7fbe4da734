// Ontology download and on-disk cache.
//
// Ontology releases are tens of megabytes and change monthly at most, so
// the file is fetched once into a platform cache directory
// (~/.cache/lexis/ on Linux) and reused until it is older than the
// configured max age.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::config::Config;

use super::model::Ontology;

/// The Disease Ontology release in OBO format.
pub const DEFAULT_ONTOLOGY_URL: &str = "http://purl.obolibrary.org/obo/doid.obo";

/// Returns the default cache directory.
/// Uses the platform cache directory: ~/.cache/lexis/ on Linux.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lexis")
}

/// Where a given ontology URL is cached: the URL's last path segment
/// inside the cache directory.
pub fn cache_path(cache_dir: &Path, url: &str) -> PathBuf {
    let file_name = url
        .split(['?', '#'])
        .next()
        .and_then(|u| u.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("ontology.obo");
    cache_dir.join(file_name)
}

/// State of the cached ontology file.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub path: PathBuf,
    pub modified: Option<DateTime<Local>>,
    /// Age in whole days, when the file exists
    pub age_days: Option<i64>,
    pub fresh: bool,
}

/// Inspect the cached file for `url`.
pub fn cache_status(cache_dir: &Path, url: &str, max_age_days: u32) -> CacheStatus {
    let path = cache_path(cache_dir, url);
    let modified: Option<DateTime<Local>> = std::fs::metadata(&path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::from);
    let age_days = modified.map(|m| (Local::now() - m).num_days());
    let fresh = age_days.is_some_and(|days| days < i64::from(max_age_days));

    CacheStatus {
        path,
        modified,
        age_days,
        fresh,
    }
}

/// Load the configured ontology.
///
/// A local `ontology_path` wins. Otherwise the URL is downloaded into the
/// cache unless a fresh copy is already there (or `refresh` forces it).
pub async fn load_ontology(config: &Config, refresh: bool) -> Result<Ontology> {
    let path = match &config.ontology_path {
        Some(path) => path.clone(),
        None => ensure_cached(config, refresh).await?,
    };
    info!(path = %path.display(), "Loading ontology");
    Ontology::from_path(&path)
}

/// Make sure the configured URL is in the cache and return its path.
pub async fn ensure_cached(config: &Config, refresh: bool) -> Result<PathBuf> {
    let status = cache_status(&config.cache_dir, &config.ontology_url, config.ontology_max_age_days);
    if status.fresh && !refresh {
        info!(path = %status.path.display(), age_days = ?status.age_days, "Using cached ontology");
        return Ok(status.path);
    }

    std::fs::create_dir_all(&config.cache_dir).with_context(|| {
        format!("Failed to create cache directory: {}", config.cache_dir.display())
    })?;

    info!(url = %config.ontology_url, "Downloading ontology");
    download_file(&config.ontology_url, &status.path).await?;
    Ok(status.path)
}

/// Download a single file from a URL to a local path, with a progress bar.
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("valid template")
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .expect("valid template"),
            );
            pb
        }
    };

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        body.extend_from_slice(&chunk);
        pb.set_position(body.len() as u64);
    }

    // Write to a sibling file first so an interrupted download never
    // replaces a good cache entry
    let partial = dest.with_extension("part");
    std::fs::write(&partial, &body)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;

    pb.finish_and_clear();
    info!(bytes = body.len(), "Downloaded {} to {}", url, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_dir_is_under_lexis() {
        let dir = default_cache_dir();
        assert!(dir.ends_with("lexis"), "got: {}", dir.display());
    }

    #[test]
    fn test_cache_path_uses_last_segment() {
        let base = PathBuf::from("/tmp/lexis-cache");
        assert_eq!(
            cache_path(&base, "http://purl.obolibrary.org/obo/doid.obo"),
            base.join("doid.obo")
        );
        assert_eq!(
            cache_path(&base, "https://example.org/files/hp.obo?download=1"),
            base.join("hp.obo")
        );
        assert_eq!(cache_path(&base, "https://example.org/"), base.join("ontology.obo"));
    }

    #[test]
    fn test_cache_status_missing_file_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let status = cache_status(dir.path(), DEFAULT_ONTOLOGY_URL, 30);
        assert!(!status.fresh);
        assert!(status.modified.is_none());
    }

    #[test]
    fn test_cache_status_new_file_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doid.obo"), b"format-version: 1.2\n").unwrap();
        let status = cache_status(dir.path(), DEFAULT_ONTOLOGY_URL, 30);
        assert!(status.fresh);
        assert_eq!(status.age_days, Some(0));
    }
}
