// Term dictionary and bag-of-words conversion.
//
// Ids are handed out as terms are first seen; within one document the new
// terms are sorted before assignment, so ids don't depend on hash order.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A bag-of-words vector: `(term id, count)` sorted by id.
pub type Bow = Vec<(usize, u32)>;

/// Mapping between terms and integer ids, with document frequencies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dictionary {
    token2id: HashMap<String, usize>,
    id2token: Vec<String>,
    dfs: Vec<u32>,
    num_docs: usize,
}

impl Dictionary {
    pub fn from_documents(documents: &[Vec<String>]) -> Self {
        let mut dictionary = Self::default();
        for doc in documents {
            dictionary.add_document(doc);
        }
        debug!(
            terms = dictionary.len(),
            documents = dictionary.num_docs,
            "Built dictionary"
        );
        dictionary
    }

    /// Register a document's terms and update document frequencies.
    pub fn add_document(&mut self, document: &[String]) {
        let counts = count_tokens(document);

        for token in counts.keys() {
            if !self.token2id.contains_key(*token) {
                let id = self.id2token.len();
                self.token2id.insert(token.to_string(), id);
                self.id2token.push(token.to_string());
                self.dfs.push(0);
            }
            self.dfs[self.token2id[*token]] += 1;
        }
        self.num_docs += 1;
    }

    /// Convert a document to a bag-of-words vector. Unknown terms are ignored.
    pub fn doc2bow(&self, document: &[String]) -> Bow {
        let mut bow: Bow = count_tokens(document)
            .into_iter()
            .filter_map(|(token, count)| self.token2id.get(token).map(|&id| (id, count)))
            .collect();
        bow.sort_unstable_by_key(|&(id, _)| id);
        bow
    }

    /// Drop rare and overly common terms, then renumber ids densely.
    ///
    /// Keeps terms appearing in at least `no_below` documents and in at most
    /// `no_above` (a fraction) of documents. With `keep_n`, only the most
    /// frequent survivors are kept.
    pub fn filter_extremes(&mut self, no_below: u32, no_above: f64, keep_n: Option<usize>) {
        let max_df = (no_above * self.num_docs as f64) as u32;
        let mut keep: Vec<usize> = (0..self.id2token.len())
            .filter(|&id| self.dfs[id] >= no_below && self.dfs[id] <= max_df)
            .collect();

        if let Some(n) = keep_n {
            keep.sort_by(|&a, &b| self.dfs[b].cmp(&self.dfs[a]).then(a.cmp(&b)));
            keep.truncate(n);
            keep.sort_unstable();
        }

        let before = self.id2token.len();
        let id2token: Vec<String> = keep.iter().map(|&id| self.id2token[id].clone()).collect();
        let dfs: Vec<u32> = keep.iter().map(|&id| self.dfs[id]).collect();
        self.token2id = id2token
            .iter()
            .enumerate()
            .map(|(id, t)| (t.clone(), id))
            .collect();
        self.id2token = id2token;
        self.dfs = dfs;

        debug!(before, after = self.id2token.len(), "Filtered dictionary extremes");
    }

    pub fn len(&self) -> usize {
        self.id2token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2token.is_empty()
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.id2token.get(id).map(|s| s.as_str())
    }

    pub fn id(&self, token: &str) -> Option<usize> {
        self.token2id.get(token).copied()
    }

    /// Number of documents containing the term.
    pub fn doc_freq(&self, id: usize) -> Option<u32> {
        self.dfs.get(id).copied()
    }

    /// Terms in id order.
    pub fn tokens(&self) -> &[String] {
        &self.id2token
    }
}

// BTreeMap so new terms come out sorted
fn count_tokens(document: &[String]) -> BTreeMap<&str, u32> {
    let mut counts = BTreeMap::new();
    for token in document {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}
