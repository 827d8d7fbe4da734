// Sentence- and corpus-level BLEU.
//
// The corpus variant sums clipped match counts and lengths over every
// candidate/reference pair before computing one score. Averaging
// sentence scores instead would overweight short sentences.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ngrams::count_ngrams;
use super::smoothing::Smoothing;

/// Scoring knobs: one weight per n-gram order, plus smoothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BleuConfig {
    /// Weight for each order, unigrams first. The length sets the maximum order.
    pub weights: Vec<f64>,
    pub smoothing: Smoothing,
}

impl Default for BleuConfig {
    fn default() -> Self {
        Self {
            weights: vec![0.25; 4],
            smoothing: Smoothing::None,
        }
    }
}

impl BleuConfig {
    /// Config with custom weights and no smoothing.
    pub fn with_weights(weights: &[f64]) -> Self {
        Self {
            weights: weights.to_vec(),
            smoothing: Smoothing::None,
        }
    }
}

/// Clipped n-gram matches over total candidate n-grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    pub numerator: usize,
    /// Never zero — an empty candidate counts as one n-gram.
    pub denominator: usize,
}

impl Precision {
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// A BLEU score with the intermediate quantities that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BleuScore {
    pub score: f64,
    /// Aggregated precision per order, unigrams first
    pub precisions: Vec<Precision>,
    pub brevity_penalty: f64,
    /// Total candidate length
    pub hyp_len: usize,
    /// Total closest-reference length
    pub ref_len: usize,
}

/// Clipped precision of `candidate` n-grams against all `references`.
///
/// Each candidate n-gram counts at most as often as it appears in the single
/// reference where it is most frequent.
pub fn modified_precision<R, S>(references: &[R], candidate: &[S], n: usize) -> Precision
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let counts = count_ngrams(candidate, n);

    let mut max_ref_counts: HashMap<Vec<&str>, usize> = HashMap::new();
    for reference in references {
        let ref_counts = count_ngrams(reference.as_ref(), n);
        for ngram in counts.keys() {
            let c = ref_counts.get(ngram).copied().unwrap_or(0);
            let entry = max_ref_counts.entry(ngram.clone()).or_insert(0);
            *entry = (*entry).max(c);
        }
    }

    let numerator = counts
        .iter()
        .map(|(ngram, &count)| count.min(max_ref_counts.get(ngram).copied().unwrap_or(0)))
        .sum();
    let denominator = counts.values().sum::<usize>().max(1);

    Precision {
        numerator,
        denominator,
    }
}

/// Length of the reference closest to `hyp_len`; ties go to the shorter one.
pub fn closest_ref_length<R, S>(references: &[R], hyp_len: usize) -> usize
where
    R: AsRef<[S]>,
{
    references
        .iter()
        .map(|r| r.as_ref().len())
        .min_by_key(|&len| (len.abs_diff(hyp_len), len))
        .unwrap_or(0)
}

/// Penalty for candidates shorter than their references.
pub fn brevity_penalty(closest_ref_len: usize, hyp_len: usize) -> f64 {
    if hyp_len > closest_ref_len {
        1.0
    } else if hyp_len == 0 {
        0.0
    } else {
        (1.0 - closest_ref_len as f64 / hyp_len as f64).exp()
    }
}

/// BLEU for one candidate against its references.
pub fn sentence_bleu<R, S>(references: &[R], candidate: &[S], config: &BleuConfig) -> f64
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut acc = Accumulator::new(config.weights.len());
    acc.add(references, candidate);
    acc.finish(config).score
}

/// Corpus BLEU over parallel lists of reference sets and candidates.
pub fn corpus_bleu<R, S>(
    list_of_references: &[Vec<R>],
    candidates: &[Vec<S>],
    config: &BleuConfig,
) -> Result<f64>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    Ok(score_corpus(list_of_references, candidates, config)?.score)
}

/// Corpus BLEU returning the full breakdown.
pub fn score_corpus<R, S>(
    list_of_references: &[Vec<R>],
    candidates: &[Vec<S>],
    config: &BleuConfig,
) -> Result<BleuScore>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    if list_of_references.len() != candidates.len() {
        anyhow::bail!(
            "Corpus BLEU needs one reference set per candidate: got {} reference sets for {} candidates",
            list_of_references.len(),
            candidates.len()
        );
    }

    let mut acc = Accumulator::new(config.weights.len());
    for (references, candidate) in list_of_references.iter().zip(candidates) {
        acc.add(references, candidate);
    }
    Ok(acc.finish(config))
}

/// Running totals across candidate/reference pairs.
struct Accumulator {
    numerators: Vec<usize>,
    denominators: Vec<usize>,
    hyp_len: usize,
    ref_len: usize,
}

impl Accumulator {
    fn new(max_order: usize) -> Self {
        Self {
            numerators: vec![0; max_order],
            denominators: vec![0; max_order],
            hyp_len: 0,
            ref_len: 0,
        }
    }

    fn add<R, S>(&mut self, references: &[R], candidate: &[S])
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        for (i, (num, den)) in self
            .numerators
            .iter_mut()
            .zip(self.denominators.iter_mut())
            .enumerate()
        {
            let p = modified_precision(references, candidate, i + 1);
            *num += p.numerator;
            *den += p.denominator;
        }
        self.hyp_len += candidate.len();
        self.ref_len += closest_ref_length(references, candidate.len());
    }

    fn finish(self, config: &BleuConfig) -> BleuScore {
        let precisions: Vec<Precision> = self
            .numerators
            .iter()
            .zip(&self.denominators)
            .map(|(&numerator, &denominator)| Precision {
                numerator,
                denominator: denominator.max(1),
            })
            .collect();
        let bp = brevity_penalty(self.ref_len, self.hyp_len);

        let score = Self::geometric_mean(&precisions, config) * bp;
        debug!(
            score,
            brevity_penalty = bp,
            hyp_len = self.hyp_len,
            ref_len = self.ref_len,
            "Computed BLEU"
        );

        BleuScore {
            score,
            precisions,
            brevity_penalty: bp,
            hyp_len: self.hyp_len,
            ref_len: self.ref_len,
        }
    }

    fn geometric_mean(precisions: &[Precision], config: &BleuConfig) -> f64 {
        // No unigram overlap at all means no score, smoothed or not
        if precisions.first().map_or(true, |p| p.numerator == 0) {
            return 0.0;
        }

        let smoothed = config.smoothing.apply(precisions);
        let mut log_sum = 0.0;
        for (weight, p) in config.weights.iter().zip(smoothed) {
            if *weight == 0.0 {
                continue;
            }
            match p {
                Some(p) if p > 0.0 => log_sum += weight * p.ln(),
                _ => return 0.0,
            }
        }
        log_sum.exp()
    }
}
