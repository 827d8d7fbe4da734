// C_v topic coherence.
//
// Word statistics come from boolean sliding windows over the preprocessed
// texts. For each topic, every top word's NPMI vector (against all the
// topic's words) is compared by cosine to the summed vector of the whole
// topic, and those similarities are averaged. The corpus score is the
// mean over topics. Higher is more coherent; values land roughly in [0, 1].

use std::collections::HashMap;

/// Window size used by the c_v measure.
pub const DEFAULT_WINDOW: usize = 110;

const EPSILON: f64 = 1e-12;

/// Co-occurrence statistics for a fixed set of words.
struct WindowStats {
    num_windows: usize,
    occurrences: Vec<usize>,
    /// Row-major word × word co-occurrence counts
    cooccurrences: Vec<usize>,
    vocab: usize,
}

impl WindowStats {
    fn collect(word_ids: &HashMap<&str, usize>, texts: &[Vec<String>], window: usize) -> Self {
        let vocab = word_ids.len();
        let mut stats = Self {
            num_windows: 0,
            occurrences: vec![0; vocab],
            cooccurrences: vec![0; vocab * vocab],
            vocab,
        };

        for text in texts {
            if text.is_empty() {
                continue;
            }
            let ids: Vec<Option<usize>> = text
                .iter()
                .map(|t| word_ids.get(t.as_str()).copied())
                .collect();

            if ids.len() <= window {
                stats.add_window(&ids);
            } else {
                for w in ids.windows(window) {
                    stats.add_window(w);
                }
            }
        }
        stats
    }

    fn add_window(&mut self, window: &[Option<usize>]) {
        let mut present: Vec<usize> = window.iter().flatten().copied().collect();
        present.sort_unstable();
        present.dedup();

        self.num_windows += 1;
        for &a in &present {
            self.occurrences[a] += 1;
            for &b in &present {
                self.cooccurrences[a * self.vocab + b] += 1;
            }
        }
    }

    fn npmi(&self, a: usize, b: usize) -> f64 {
        if self.num_windows == 0 {
            return 0.0;
        }
        let n = self.num_windows as f64;
        let p_a = self.occurrences[a] as f64 / n;
        let p_b = self.occurrences[b] as f64 / n;
        if p_a == 0.0 || p_b == 0.0 {
            return 0.0;
        }
        let p_ab = self.cooccurrences[a * self.vocab + b] as f64 / n + EPSILON;
        let pmi = (p_ab / (p_a * p_b)).ln();
        pmi / -p_ab.ln()
    }
}

/// C_v coherence of a set of topics, each given as its top words.
///
/// Topics with fewer than two words are skipped; an empty result scores 0.
pub fn coherence_cv(topics: &[Vec<String>], texts: &[Vec<String>], window: usize) -> f64 {
    let mut word_ids: HashMap<&str, usize> = HashMap::new();
    for word in topics.iter().flatten() {
        let next = word_ids.len();
        word_ids.entry(word.as_str()).or_insert(next);
    }

    let stats = WindowStats::collect(&word_ids, texts, window.max(1));

    let per_topic: Vec<f64> = topics
        .iter()
        .filter(|t| t.len() >= 2)
        .map(|topic| {
            let ids: Vec<usize> = topic.iter().map(|w| word_ids[w.as_str()]).collect();
            topic_coherence(&stats, &ids)
        })
        .collect();

    if per_topic.is_empty() {
        0.0
    } else {
        per_topic.iter().sum::<f64>() / per_topic.len() as f64
    }
}

fn topic_coherence(stats: &WindowStats, ids: &[usize]) -> f64 {
    let vectors: Vec<Vec<f64>> = ids
        .iter()
        .map(|&a| ids.iter().map(|&b| stats.npmi(a, b)).collect())
        .collect();

    let mut topic_vector = vec![0.0; ids.len()];
    for v in &vectors {
        for (acc, x) in topic_vector.iter_mut().zip(v) {
            *acc += x;
        }
    }

    let sims: f64 = vectors.iter().map(|v| cosine(v, &topic_vector)).sum();
    sims / vectors.len() as f64
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}
