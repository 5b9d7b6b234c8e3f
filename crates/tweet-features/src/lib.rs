//! Fixed-width feature vectors for tweets.
//!
//! Every row is `[lexical TF-IDF | POS n-gram counts | 17 scalar features]`.
//! Vocabularies and IDF weights are fitted once with [`FeatureExtractor::fit`]
//! (or [`assemble`]) and reused unchanged by every later
//! [`FeatureExtractor::transform`], so columns line up across calls.
//!
//! ```no_run
//! use tweet_features::{FeatureExtractor, PipelineConfig};
//!
//! # fn main() -> tweet_features::Result<()> {
//! let corpus = vec!["first tweet".to_string(), "second tweet".to_string()];
//! let mut extractor = FeatureExtractor::new(PipelineConfig::default())?;
//! let train = extractor.fit_transform(&corpus)?;
//! let new_rows = extractor.transform(&["a new tweet"])?;
//! assert_eq!(train.num_features(), new_rows.num_features());
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
pub mod features;
pub mod input;
pub mod nlp;
pub mod pre_processor;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use features::{
    assemble, FeatureExtractor, FeatureMatrix, FittedModel, ResourceVersions, ScalarFeatures,
    NUM_SCALAR_FEATURES, SCALAR_FEATURE_NAMES,
};
pub use pre_processor::{
    basic_tokenize, count_twitter_objects, normalize, tokenize, Stopwords, SyntacticVectorizer,
    TfidfVectorizer, VectorizerParams,
};

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(-3.79, 1), -3.8);
        assert_eq!(round_to(2.5, 0), 3.0);
    }
}
