// Topic modeler trait — swap-ready abstraction.
//
// The CLI only needs "documents in, summary out". LSA is the implementation
// today; another factorization can slot in behind the same trait.

use anyhow::Result;

use super::summary::TopicSummary;

/// Trait for building a topic summary from raw documents.
pub trait TopicModeler {
    /// Preprocess `documents`, fit a model, and summarize its topics.
    fn model(&self, documents: &[String]) -> Result<TopicSummary>;
}
