// BLEU — modified n-gram precision scoring with a brevity penalty.

pub mod ngrams;
pub mod score;
pub mod smoothing;

pub use score::{corpus_bleu, sentence_bleu, BleuConfig, BleuScore};
pub use smoothing::Smoothing;
