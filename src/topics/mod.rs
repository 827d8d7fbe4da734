// Topic modeling — preprocessing, bag-of-words, LSA, and coherence scoring.

pub mod coherence;
pub mod corpus;
pub mod dictionary;
pub mod lsa;
pub mod modeler;
pub mod preprocess;
pub mod summary;
pub mod sweep;
pub mod traits;
