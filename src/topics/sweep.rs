// Topic-count sweep — fit one model per candidate count and score its coherence.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::coherence::{coherence_cv, DEFAULT_WINDOW};
use super::dictionary::{Bow, Dictionary};
use super::lsa::{LsaConfig, LsaModel};

/// Coherence for one topic count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub num_topics: usize,
    /// Topics the model actually produced (may be below `num_topics` for low-rank corpora)
    pub fitted_topics: usize,
    pub coherence: f64,
}

/// Sweep parameters: topic counts in `start..stop` by `step`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
    /// Top words per topic fed to the coherence measure
    pub top_n: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 2,
            stop: 12,
            step: 1,
            top_n: 10,
        }
    }
}

/// Fit a model for every topic count in the sweep and score each one.
///
/// `texts` are the preprocessed documents; the dictionary and
/// bag-of-words vectors are built once and shared by every fit.
pub fn sweep(
    texts: &[Vec<String>],
    sweep: &SweepConfig,
    lsa: &LsaConfig,
) -> Result<Vec<SweepPoint>> {
    if sweep.step == 0 {
        anyhow::bail!("Sweep step must be at least 1");
    }
    if sweep.start == 0 || sweep.start >= sweep.stop {
        anyhow::bail!(
            "Empty sweep range {}..{} (start must be at least 1 and below stop)",
            sweep.start,
            sweep.stop
        );
    }

    let dictionary = Dictionary::from_documents(texts);
    let bows: Vec<Bow> = texts.iter().map(|t| dictionary.doc2bow(t)).collect();

    let mut points = Vec::new();
    for num_topics in (sweep.start..sweep.stop).step_by(sweep.step) {
        let config = LsaConfig {
            num_topics,
            ..lsa.clone()
        };
        let model = LsaModel::fit(&bows, &dictionary, &config)?;
        let topic_words: Vec<Vec<String>> = model
            .topics(sweep.top_n)
            .into_iter()
            .map(|t| t.terms.into_iter().map(|(w, _)| w).collect())
            .collect();
        let coherence = coherence_cv(&topic_words, texts, DEFAULT_WINDOW);

        info!(num_topics, coherence, "Scored topic count");
        points.push(SweepPoint {
            num_topics,
            fitted_topics: model.num_topics(),
            coherence,
        });
    }
    Ok(points)
}

/// The sweep point with the highest coherence (earliest on ties).
pub fn best_point(points: &[SweepPoint]) -> Option<SweepPoint> {
    points.iter().copied().fold(None, |best, p| match best {
        Some(b) if b.coherence >= p.coherence => Some(b),
        _ => Some(p),
    })
}
