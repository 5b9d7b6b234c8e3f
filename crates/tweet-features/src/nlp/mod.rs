//! Annotators the features depend on. Each carries a version string; a fitted
//! model is only valid with the versions it was fitted against.

pub mod pos;
pub mod sentiment;
pub mod syllables;

pub use pos::{PosTagger, RuleTagger, RULE_TAGGER_VERSION};
pub use sentiment::{SentimentAnalyzer, SentimentScores, VaderAnalyzer, VADER_LEXICON_VERSION};
pub use syllables::{count_syllables, SYLLABLE_COUNTER_VERSION};
