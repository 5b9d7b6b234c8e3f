use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MIN_NGRAM: usize = 1;
pub const DEFAULT_MAX_NGRAM: usize = 3;
pub const DEFAULT_MIN_DF: f64 = 5.0;
pub const DEFAULT_MAX_DF: f64 = 0.501;
pub const LEXICAL_MAX_FEATURES: usize = 10_000;
pub const SYNTACTIC_MAX_FEATURES: usize = 5_000;

#[derive(Clone, Debug, PartialEq, Serialize, bincode::Encode, bincode::Decode)]
pub struct VectorizerParams {
    /// Smallest and largest n-gram order, both inclusive.
    ngram_range: (usize, usize),
    /// Minimum document frequency for filtering vocabulary.
    /// - If `min_df` is in (0.0, 1.0), it's a proportion of documents
    /// - If `min_df` >= 1.0, it's an absolute document count
    min_df: f64,
    /// Maximum document frequency for filtering vocabulary.
    /// - If `max_df` is in (0.0, 1.0], it's a proportion of documents
    /// - If `max_df` > 1.0, it's an absolute document count
    max_df: f64,
    /// Keep at most this many n-grams, ranked by total corpus term count.
    max_features: Option<usize>,
}

impl VectorizerParams {
    pub fn new(
        ngram_range: impl Into<RangeInclusive<usize>>,
        min_df: f64,
        max_df: f64,
        max_features: Option<usize>,
    ) -> Result<Self> {
        let range = ngram_range.into();
        let params = Self {
            ngram_range: (*range.start(), *range.end()),
            min_df,
            max_df,
            max_features,
        };
        params.validate()?;
        Ok(params)
    }

    /// Stemmed word n-grams for the TF-IDF block.
    #[must_use]
    pub fn lexical() -> Self {
        Self {
            ngram_range: (DEFAULT_MIN_NGRAM, DEFAULT_MAX_NGRAM),
            min_df: DEFAULT_MIN_DF,
            max_df: DEFAULT_MAX_DF,
            max_features: Some(LEXICAL_MAX_FEATURES),
        }
    }

    /// Part-of-speech tag n-grams for the count block.
    #[must_use]
    pub fn syntactic() -> Self {
        Self {
            max_features: Some(SYNTACTIC_MAX_FEATURES),
            ..Self::lexical()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::InvalidParameter {
                param: "ngram_range",
                value: format!("({min_n}, {max_n})"),
                constraint: "must satisfy 1 <= min <= max",
            });
        }
        if !(self.min_df > 0.0) {
            return Err(Error::InvalidParameter {
                param: "min_df",
                value: self.min_df.to_string(),
                constraint: "must be positive (proportion in (0.0, 1.0) or absolute count >= 1.0)",
            });
        }
        if !(self.max_df > 0.0) {
            return Err(Error::InvalidParameter {
                param: "max_df",
                value: self.max_df.to_string(),
                constraint: "must be positive (proportion in (0.0, 1.0] or absolute count > 1.0)",
            });
        }
        if self.max_features == Some(0) {
            return Err(Error::InvalidParameter {
                param: "max_features",
                value: "0".to_string(),
                constraint: "must be at least 1 when set",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    #[must_use]
    pub fn ngram_sizes(&self) -> RangeInclusive<usize> {
        self.ngram_range.0..=self.ngram_range.1
    }

    #[must_use]
    pub fn min_df(&self) -> f64 {
        self.min_df
    }

    #[must_use]
    pub fn max_df(&self) -> f64 {
        self.max_df
    }

    #[must_use]
    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    /// Lowest document count an n-gram may have in a corpus of `n_docs` documents.
    #[must_use]
    pub fn min_doc_count(&self, n_docs: usize) -> f64 {
        if self.min_df >= 1.0 {
            self.min_df
        } else {
            self.min_df * n_docs as f64
        }
    }

    /// Highest document count an n-gram may have in a corpus of `n_docs` documents.
    #[must_use]
    pub fn max_doc_count(&self, n_docs: usize) -> f64 {
        if self.max_df > 1.0 {
            self.max_df
        } else {
            self.max_df * n_docs as f64
        }
    }
}

/// A params object in JSON where every field is optional.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamOverrides {
    ngram_range: Option<(usize, usize)>,
    min_df: Option<f64>,
    max_df: Option<f64>,
    /// Absent keeps the base cap, `null` removes it.
    #[serde(default, deserialize_with = "present")]
    max_features: Option<Option<usize>>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<usize>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<usize>::deserialize(deserializer).map(Some)
}

impl ParamOverrides {
    fn apply(self, base: VectorizerParams) -> VectorizerParams {
        VectorizerParams {
            ngram_range: self.ngram_range.unwrap_or(base.ngram_range),
            min_df: self.min_df.unwrap_or(base.min_df),
            max_df: self.max_df.unwrap_or(base.max_df),
            max_features: self.max_features.unwrap_or(base.max_features),
        }
    }
}

impl VectorizerParams {
    /// Partial JSON object over [`VectorizerParams::lexical`].
    pub(crate) fn deserialize_lexical<'de, D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ParamOverrides::deserialize(deserializer).map(|o| o.apply(Self::lexical()))
    }

    /// Partial JSON object over [`VectorizerParams::syntactic`].
    pub(crate) fn deserialize_syntactic<'de, D>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ParamOverrides::deserialize(deserializer).map(|o| o.apply(Self::syntactic()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_feature_blocks() {
        let lexical = VectorizerParams::lexical();
        assert_eq!(lexical.ngram_range(), (1, 3));
        assert_eq!(lexical.max_features(), Some(10_000));

        let syntactic = VectorizerParams::syntactic();
        assert_eq!(syntactic.ngram_range(), (1, 3));
        assert_eq!(syntactic.max_features(), Some(5_000));
        assert!((syntactic.max_df() - 0.501).abs() < f64::EPSILON);
    }

    #[test]
    fn test_doc_count_bounds() {
        let params = VectorizerParams::lexical();
        assert!((params.min_doc_count(100) - 5.0).abs() < f64::EPSILON);
        assert!((params.max_doc_count(100) - 50.1).abs() < 1e-9);

        let absolute = VectorizerParams::new(1..=1, 0.1, 7.0, None).unwrap();
        assert!((absolute.min_doc_count(50) - 5.0).abs() < 1e-9);
        assert!((absolute.max_doc_count(50) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        assert!(matches!(
            VectorizerParams::new(0..=2, 1.0, 1.0, None),
            Err(Error::InvalidParameter { param: "ngram_range", .. })
        ));
        assert!(matches!(
            VectorizerParams::new(1..=2, 0.0, 1.0, None),
            Err(Error::InvalidParameter { param: "min_df", .. })
        ));
        assert!(matches!(
            VectorizerParams::new(1..=2, 1.0, -1.0, None),
            Err(Error::InvalidParameter { param: "max_df", .. })
        ));
        assert!(matches!(
            VectorizerParams::new(1..=2, 1.0, 1.0, Some(0)),
            Err(Error::InvalidParameter { param: "max_features", .. })
        ));
    }

    #[test]
    fn test_partial_json_merges_over_its_own_base() {
        let syntactic =
            VectorizerParams::deserialize_syntactic(serde_json::json!({"min_df": 2.0})).unwrap();
        assert_eq!(syntactic.min_df(), 2.0);
        assert_eq!(syntactic.max_features(), Some(SYNTACTIC_MAX_FEATURES));

        let lexical =
            VectorizerParams::deserialize_lexical(serde_json::json!({"ngram_range": [1, 2]})).unwrap();
        assert_eq!(lexical.ngram_range(), (1, 2));
        assert_eq!(lexical.max_features(), Some(LEXICAL_MAX_FEATURES));
    }

    #[test]
    fn test_null_max_features_removes_the_cap() {
        let params =
            VectorizerParams::deserialize_syntactic(serde_json::json!({"max_features": null}))
                .unwrap();
        assert_eq!(params.max_features(), None);
        assert!(VectorizerParams::deserialize_lexical(serde_json::json!({"min_dff": 1.0})).is_err());
    }
}
