// Latent semantic analysis — truncated SVD of the term-document matrix.
//
// The factorization is a randomized range finder (Halko, Martinsson & Tropp):
// sample the column space of A with a seeded random matrix, sharpen it with
// a few power iterations, then take an exact SVD of the small projected
// matrix. When the sample covers the full rank of A the result equals the
// exact decomposition. Everything is driven by the seed, so repeated fits
// on the same corpus give identical topics.

use std::fmt;

use anyhow::{anyhow, Result};
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::dictionary::{Bow, Dictionary};

/// Singular values below this fraction of the largest are treated as noise.
const SPECTRUM_CUTOFF: f64 = 1e-10;

/// Fitting parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsaConfig {
    pub num_topics: usize,
    /// Extra random samples beyond `num_topics` for the range finder
    pub oversample: usize,
    pub power_iters: usize,
    pub seed: u64,
}

impl Default for LsaConfig {
    fn default() -> Self {
        Self {
            num_topics: 2,
            oversample: 100,
            power_iters: 2,
            seed: 0,
        }
    }
}

/// One latent topic: terms with their weights, strongest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub index: usize,
    pub terms: Vec<(String, f64)>,
}

impl fmt::Display for Topic {
    /// Renders as `0.361*"term" + -0.120*"other"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .terms
            .iter()
            .map(|(term, weight)| format!("{weight:.3}*\"{term}\""))
            .collect();
        write!(f, "{}", parts.join(" + "))
    }
}

/// A fitted LSA model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsaModel {
    /// Vocabulary in term-id order
    terms: Vec<String>,
    /// One row per topic, one column per term
    topic_weights: Vec<Vec<f64>>,
    singular_values: Vec<f64>,
}

impl LsaModel {
    /// Fit `config.num_topics` topics to bag-of-words documents.
    ///
    /// Fewer topics come back when the corpus has lower rank than requested.
    pub fn fit(bows: &[Bow], dictionary: &Dictionary, config: &LsaConfig) -> Result<Self> {
        if config.num_topics == 0 {
            anyhow::bail!("Number of topics must be at least 1");
        }
        if bows.is_empty() || dictionary.is_empty() {
            anyhow::bail!("Cannot fit topics to an empty corpus");
        }

        let num_terms = dictionary.len();
        if let Some(&(id, _)) = bows.iter().flatten().find(|&&(id, _)| id >= num_terms) {
            anyhow::bail!("Term id {id} is outside the dictionary ({num_terms} terms)");
        }

        let a = SparseCounts::new(bows, num_terms);
        let (u, sigma) = randomized_svd(&a, config)?;

        let max_sigma = sigma.first().copied().unwrap_or(0.0);
        let rank = sigma
            .iter()
            .take_while(|&&s| s > max_sigma * SPECTRUM_CUTOFF && s > 0.0)
            .count();
        let k = config.num_topics.min(rank);
        if k < config.num_topics {
            warn!(
                requested = config.num_topics,
                fitted = k,
                "Corpus rank is lower than the requested number of topics"
            );
        }
        if k == 0 {
            anyhow::bail!("Term-document matrix has no non-zero singular values");
        }

        let topic_weights: Vec<Vec<f64>> = (0..k)
            .map(|t| {
                let mut column: Vec<f64> = u.column(t).iter().copied().collect();
                normalize_sign(&mut column);
                column
            })
            .collect();

        info!(
            topics = k,
            terms = num_terms,
            documents = bows.len(),
            "Fitted LSA model"
        );

        Ok(Self {
            terms: dictionary.tokens().to_vec(),
            topic_weights,
            singular_values: sigma[..k].to_vec(),
        })
    }

    pub fn num_topics(&self) -> usize {
        self.topic_weights.len()
    }

    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// The `num_words` strongest terms of one topic, by absolute weight.
    pub fn topic_terms(&self, topic: usize, num_words: usize) -> Vec<(String, f64)> {
        let Some(weights) = self.topic_weights.get(topic) else {
            return Vec::new();
        };
        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.sort_by(|&a, &b| {
            weights[b]
                .abs()
                .partial_cmp(&weights[a].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        order
            .into_iter()
            .take(num_words)
            .map(|id| (self.terms[id].clone(), weights[id]))
            .collect()
    }

    pub fn topics(&self, num_words: usize) -> Vec<Topic> {
        (0..self.num_topics())
            .map(|index| Topic {
                index,
                terms: self.topic_terms(index, num_words),
            })
            .collect()
    }

    /// Topics rendered as `(index, "0.361*\"term\" + ...")`.
    pub fn print_topics(&self, num_words: usize) -> Vec<(usize, String)> {
        self.topics(num_words)
            .into_iter()
            .map(|t| (t.index, t.to_string()))
            .collect()
    }

    /// Map a bag-of-words document into topic space.
    pub fn project(&self, bow: &[(usize, u32)]) -> Vec<f64> {
        self.topic_weights
            .iter()
            .map(|weights| {
                bow.iter()
                    .filter_map(|&(id, count)| weights.get(id).map(|w| w * count as f64))
                    .sum()
            })
            .collect()
    }
}

/// Flip a singular vector so its largest-magnitude entry is positive.
fn normalize_sign(v: &mut [f64]) {
    let pivot = v
        .iter()
        .copied()
        .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if pivot < 0.0 {
        for x in v.iter_mut() {
            *x = -*x;
        }
    }
}

/// Term-document counts stored per document.
struct SparseCounts<'a> {
    docs: &'a [Bow],
    num_terms: usize,
}

impl<'a> SparseCounts<'a> {
    fn new(docs: &'a [Bow], num_terms: usize) -> Self {
        Self { docs, num_terms }
    }

    fn num_docs(&self) -> usize {
        self.docs.len()
    }

    /// A · X, with X shaped documents × l.
    fn mul(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        let mut out = DMatrix::zeros(self.num_terms, x.ncols());
        for (j, bow) in self.docs.iter().enumerate() {
            for &(i, count) in bow {
                for c in 0..x.ncols() {
                    out[(i, c)] += count as f64 * x[(j, c)];
                }
            }
        }
        out
    }

    /// Aᵀ · Y, with Y shaped terms × l.
    fn mul_transpose(&self, y: &DMatrix<f64>) -> DMatrix<f64> {
        let mut out = DMatrix::zeros(self.num_docs(), y.ncols());
        for (j, bow) in self.docs.iter().enumerate() {
            for &(i, count) in bow {
                for c in 0..y.ncols() {
                    out[(j, c)] += count as f64 * y[(i, c)];
                }
            }
        }
        out
    }
}

/// Left singular vectors (terms × r) and singular values, descending.
fn randomized_svd(a: &SparseCounts<'_>, config: &LsaConfig) -> Result<(DMatrix<f64>, Vec<f64>)> {
    let samples = (config.num_topics + config.oversample)
        .min(a.num_terms)
        .min(a.num_docs())
        .max(1);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let omega = DMatrix::from_fn(a.num_docs(), samples, |_, _| rng.random_range(-1.0..1.0));

    let mut q = a.mul(&omega).qr().q();
    for _ in 0..config.power_iters {
        let z = a.mul_transpose(&q).qr().q();
        q = a.mul(&z).qr().q();
    }

    // B = Qᵀ A is small: samples × documents
    let b = a.mul_transpose(&q).transpose();
    let svd = b.svd(true, false);
    let u_b = svd
        .u
        .ok_or_else(|| anyhow!("SVD did not produce left singular vectors"))?;
    let sigma = svd.singular_values;

    let mut order: Vec<usize> = (0..sigma.len()).collect();
    order.sort_by(|&x, &y| {
        sigma[y]
            .partial_cmp(&sigma[x])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let u_full = q * u_b;
    let u = DMatrix::from_fn(u_full.nrows(), order.len(), |r, c| u_full[(r, order[c])]);
    let values = order.iter().map(|&i| sigma[i]).collect();
    Ok((u, values))
}
