use ahash::HashSet;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    nlp::{syllables::count_syllables, SentimentAnalyzer},
    pre_processor::{count_twitter_objects, normalize, tokenizer},
    round_to,
};

pub const NUM_SCALAR_FEATURES: usize = 17;

/// Column names of the scalar block, in output order.
pub const SCALAR_FEATURE_NAMES: [&str; NUM_SCALAR_FEATURES] = [
    "FKRA",
    "FRE",
    "num_syllables",
    "avg_syl_per_word",
    "num_chars",
    "num_chars_total",
    "num_terms",
    "num_words",
    "num_unique_words",
    "vader neg",
    "vader pos",
    "vader neu",
    "vader compound",
    "num_hashtags",
    "num_mentions",
    "num_urls",
    "is_retweet",
];

/// Hand-crafted per-text features. Readability treats every text as one sentence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarFeatures {
    /// Flesch-Kincaid grade level.
    #[serde(rename = "FKRA")]
    pub fkra: f64,
    /// Flesch reading ease.
    #[serde(rename = "FRE")]
    pub fre: f64,
    pub num_syllables: usize,
    pub avg_syl_per_word: f64,
    pub num_chars: usize,
    pub num_chars_total: usize,
    pub num_terms: usize,
    pub num_words: usize,
    pub num_unique_words: usize,
    #[serde(rename = "vader neg")]
    pub vader_neg: f64,
    #[serde(rename = "vader pos")]
    pub vader_pos: f64,
    #[serde(rename = "vader neu")]
    pub vader_neu: f64,
    #[serde(rename = "vader compound")]
    pub vader_compound: f64,
    pub num_hashtags: usize,
    pub num_mentions: usize,
    pub num_urls: usize,
    pub is_retweet: bool,
}

impl ScalarFeatures {
    /// Computes every scalar feature of one raw text.
    pub fn extract(text: &str, sentiment: &dyn SentimentAnalyzer) -> Result<Self> {
        let scores = sentiment.polarity_scores(text)?;
        let objects = count_twitter_objects(text);

        let words = normalize(text);
        let word_list = words.split_whitespace().collect::<Vec<_>>();
        let num_words = word_list.len();
        let num_syllables = count_syllables(&words);

        let avg_syl_per_word =
            round_to((num_syllables as f64 + 0.001) / (num_words as f64 + 0.001), 4);
        let fkra = round_to(0.39 * num_words as f64 + 11.8 * avg_syl_per_word - 15.59, 1);
        let fre = round_to(206.835 - 1.015 * num_words as f64 - 84.6 * avg_syl_per_word, 2);

        Ok(Self {
            fkra,
            fre,
            num_syllables,
            avg_syl_per_word,
            num_chars: word_list.iter().map(|w| w.chars().count()).sum(),
            num_chars_total: text.chars().count(),
            num_terms: text.split_whitespace().count(),
            num_words,
            num_unique_words: word_list.iter().collect::<HashSet<_>>().len(),
            vader_neg: scores.neg,
            vader_pos: scores.pos,
            vader_neu: scores.neu,
            vader_compound: scores.compound,
            num_hashtags: objects.hashtags,
            num_mentions: objects.mentions,
            num_urls: objects.urls,
            is_retweet: word_list.contains(&"rt"),
        })
    }

    /// Scalar features of every text, in input order.
    pub fn extract_all<T: AsRef<str> + Sync>(
        texts: &[T],
        sentiment: &dyn SentimentAnalyzer,
        show_progress: bool,
    ) -> Result<Vec<Self>> {
        tokenizer::analyze_documents(texts, "Scoring texts", show_progress, |text| {
            Self::extract(text, sentiment)
        })
        .into_iter()
        .collect()
    }

    /// Values in [`SCALAR_FEATURE_NAMES`] order.
    #[must_use]
    pub fn to_array(&self) -> [f64; NUM_SCALAR_FEATURES] {
        [
            self.fkra,
            self.fre,
            self.num_syllables as f64,
            self.avg_syl_per_word,
            self.num_chars as f64,
            self.num_chars_total as f64,
            self.num_terms as f64,
            self.num_words as f64,
            self.num_unique_words as f64,
            self.vader_neg,
            self.vader_pos,
            self.vader_neu,
            self.vader_compound,
            self.num_hashtags as f64,
            self.num_mentions as f64,
            self.num_urls as f64,
            f64::from(u8::from(self.is_retweet)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::VaderAnalyzer;

    fn extract(text: &str) -> ScalarFeatures {
        ScalarFeatures::extract(text, &VaderAnalyzer::new()).unwrap()
    }

    #[test]
    fn test_scenario_tweet() {
        let features = extract("I love this! #great @friend http://x.co");
        assert_eq!(features.num_urls, 1);
        assert_eq!(features.num_mentions, 1);
        assert_eq!(features.num_hashtags, 1);
        assert!(!features.is_retweet);
        assert_eq!(features.num_words, 4);
        assert_eq!(features.num_terms, 6);
        assert_eq!(features.num_chars, 16);
        assert_eq!(features.num_chars_total, 39);
        assert_eq!(features.num_syllables, 4);
        assert_eq!(features.avg_syl_per_word, 1.0);
        assert_eq!(features.fkra, -2.2);
        assert!(features.vader_compound > 0.0);
    }

    #[test]
    fn test_empty_text_is_well_defined() {
        let features = extract("");
        assert_eq!(features.num_words, 0);
        assert_eq!(features.num_syllables, 0);
        assert_eq!(features.avg_syl_per_word, 1.0);
        assert_eq!(features.fkra, -3.8);
        assert!((features.fre - 122.235).abs() < 0.01);
        assert_eq!(features.vader_compound, 0.0);
        assert!(features.to_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_retweet_and_unique_words() {
        let features = extract("rt rt rt");
        assert!(features.is_retweet);
        assert_eq!(features.num_unique_words, 1);
        assert_eq!(features.num_words, 3);
        assert_eq!(features.to_array()[16], 1.0);
    }

    #[test]
    fn test_retweet_needs_the_exact_token() {
        assert!(!extract("RT @user hello").is_retweet);
        assert!(!extract("start the party").is_retweet);
    }

    #[test]
    fn test_array_order_matches_names() {
        let features = extract("#a #b @c http://d.co");
        let values = features.to_array();
        let column = |name: &str| SCALAR_FEATURE_NAMES.iter().position(|n| *n == name).unwrap();
        assert_eq!(values[column("num_hashtags")], 2.0);
        assert_eq!(values[column("num_mentions")], 1.0);
        assert_eq!(values[column("num_urls")], 1.0);
        assert_eq!(column("num_hashtags") + 2, column("num_urls"));
    }

    #[test]
    fn test_serializes_with_column_names() {
        let json = serde_json::to_value(extract("hello")).unwrap();
        for name in SCALAR_FEATURE_NAMES {
            assert!(json.get(name).is_some(), "{name}");
        }
    }

    #[test]
    fn test_extract_all_keeps_order() {
        let texts = ["one", "two words", "three words here"];
        let all = ScalarFeatures::extract_all(&texts, &VaderAnalyzer::new(), false).unwrap();
        let counts = all.iter().map(|f| f.num_words).collect::<Vec<_>>();
        assert_eq!(counts, [1, 2, 3]);
    }
}
