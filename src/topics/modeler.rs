// LSA-backed TopicModeler: preprocess → dictionary → bag-of-words → fit.

use anyhow::Result;
use tracing::info;

use super::dictionary::{Bow, Dictionary};
use super::lsa::{LsaConfig, LsaModel};
use super::preprocess::Preprocessor;
use super::summary::TopicSummary;
use super::traits::TopicModeler;

pub struct LsaModeler {
    pub config: LsaConfig,
    /// Terms reported per topic
    pub num_words: usize,
    preprocessor: Preprocessor,
}

impl LsaModeler {
    pub fn new(config: LsaConfig, num_words: usize) -> Result<Self> {
        Ok(Self {
            config,
            num_words,
            preprocessor: Preprocessor::new()?,
        })
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Fit and return the raw model alongside its dictionary.
    pub fn fit(&self, documents: &[String]) -> Result<(LsaModel, Dictionary)> {
        let texts = self.preprocessor.process_all(documents);
        let dictionary = Dictionary::from_documents(&texts);
        let bows: Vec<Bow> = texts.iter().map(|t| dictionary.doc2bow(t)).collect();
        let model = LsaModel::fit(&bows, &dictionary, &self.config)?;
        Ok((model, dictionary))
    }
}

impl TopicModeler for LsaModeler {
    fn model(&self, documents: &[String]) -> Result<TopicSummary> {
        if documents.is_empty() {
            anyhow::bail!("No documents to analyze — cannot build topics");
        }

        let (model, dictionary) = self.fit(documents)?;
        let topics = model.topics(self.num_words);

        for (index, rendered) in model.print_topics(self.num_words) {
            info!(topic = index, terms = %rendered, "Topic");
        }

        Ok(TopicSummary {
            topics,
            singular_values: model.singular_values().to_vec(),
            document_count: documents.len(),
            vocabulary_size: dictionary.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_empty_fails() {
        let modeler = LsaModeler::new(LsaConfig::default(), 5).unwrap();
        assert!(modeler.model(&[]).is_err());
    }

    #[test]
    fn test_model_reports_requested_words() {
        let modeler = LsaModeler::new(LsaConfig::default(), 3).unwrap();
        let docs = vec![
            "Volcanoes erupt molten lava and volcanic ash".to_string(),
            "Lava flows from erupting volcanoes cool into basalt".to_string(),
            "Orchestras rehearse symphonies with violins and cellos".to_string(),
            "Violins and cellos anchor the orchestra string section".to_string(),
        ];
        let summary = modeler.model(&docs).unwrap();
        assert_eq!(summary.document_count, 4);
        assert_eq!(summary.topics.len(), 2);
        assert!(summary.topics.iter().all(|t| t.terms.len() == 3));
    }
}
