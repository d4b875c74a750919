mod aggregator;
mod classifier;
mod lexicon;

pub use aggregator::summarize;
pub use lexicon::LexiconScorer;
