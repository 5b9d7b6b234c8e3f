use tracing::debug;

use super::scalar::{NUM_SCALAR_FEATURES, SCALAR_FEATURE_NAMES};
use crate::{
    error::{Error, Result},
    nlp::{PosTagger, SentimentAnalyzer, SYLLABLE_COUNTER_VERSION},
    pre_processor::{SyntacticVectorizer, TfidfVectorizer, STEMMER_VERSION},
};

/// Versions of the annotators a model was fitted with. Feature values depend on
/// all of them, so a model only transforms correctly with the same set.
#[derive(Clone, Debug, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct ResourceVersions {
    pub stemmer: String,
    pub tagger: String,
    pub sentiment: String,
    pub syllables: String,
}

impl ResourceVersions {
    #[must_use]
    pub fn current(tagger: &dyn PosTagger, sentiment: &dyn SentimentAnalyzer) -> Self {
        Self {
            stemmer: STEMMER_VERSION.to_owned(),
            tagger: tagger.version().to_owned(),
            sentiment: sentiment.version().to_owned(),
            syllables: SYLLABLE_COUNTER_VERSION.to_owned(),
        }
    }

    /// Fails on the first resource whose version differs from `found`.
    pub fn check_compatible(&self, found: &Self) -> Result<()> {
        let pairs = [
            ("stemmer", &self.stemmer, &found.stemmer),
            ("part-of-speech tagger", &self.tagger, &found.tagger),
            ("sentiment lexicon", &self.sentiment, &found.sentiment),
            ("syllable counter", &self.syllables, &found.syllables),
        ];
        for (resource, expected, found) in pairs {
            if expected != found {
                return Err(Error::IncompatibleResource {
                    resource,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Everything `transform` needs: both fitted vectorizers and the annotator
/// versions they were fitted against.
#[derive(Clone, Debug, PartialEq, bincode::Encode, bincode::Decode)]
pub struct FittedModel {
    lexical: TfidfVectorizer,
    syntactic: SyntacticVectorizer,
    versions: ResourceVersions,
}

impl FittedModel {
    pub(crate) fn new(
        lexical: TfidfVectorizer,
        syntactic: SyntacticVectorizer,
        versions: ResourceVersions,
    ) -> Result<Self> {
        let model = Self {
            lexical,
            syntactic,
            versions,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if !self.lexical.is_fitted() {
            return Err(Error::NotFitted {
                component: "lexical vectorizer",
            });
        }
        if !self.syntactic.is_fitted() {
            return Err(Error::NotFitted {
                component: "syntactic vectorizer",
            });
        }
        let idf_len = self.lexical.idf().map_or(0, |idf| idf.len());
        if idf_len != self.lexical.num_features() {
            return Err(Error::InconsistentModel {
                reason: format!(
                    "IDF table has {idf_len} entries for a vocabulary of {}",
                    self.lexical.num_features()
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn lexical(&self) -> &TfidfVectorizer {
        &self.lexical
    }

    #[must_use]
    pub fn syntactic(&self) -> &SyntacticVectorizer {
        &self.syntactic
    }

    #[must_use]
    pub fn versions(&self) -> &ResourceVersions {
        &self.versions
    }

    #[must_use]
    pub fn num_lexical_features(&self) -> usize {
        self.lexical.num_features()
    }

    #[must_use]
    pub fn num_syntactic_features(&self) -> usize {
        self.syntactic.num_features()
    }

    /// Row width: lexical + syntactic + scalar columns.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.num_lexical_features() + self.num_syntactic_features() + NUM_SCALAR_FEATURES
    }

    /// Column names in output order.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        let lexical = self.lexical.vocabulary().map(|v| v.terms()).unwrap_or_default();
        let syntactic = self.syntactic.vocabulary().map(|v| v.terms()).unwrap_or_default();
        lexical
            .iter()
            .chain(syntactic)
            .cloned()
            .chain(SCALAR_FEATURE_NAMES.iter().map(|n| (*n).to_owned()))
            .collect()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let bytes = bincode::encode_to_vec(self, bincode::config::standard())?;
        debug!(num_bytes = bytes.len(), "Encoded fitted model");
        Ok(bytes)
    }

    /// Decodes a model and checks that its parts agree with each other.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (model, _): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        model.validate()?;
        debug!(
            lexical = model.num_lexical_features(),
            syntactic = model.num_syntactic_features(),
            "Decoded fitted model"
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        nlp::{RuleTagger, VaderAnalyzer},
        pre_processor::VectorizerParams,
    };

    fn versions() -> ResourceVersions {
        ResourceVersions::current(&RuleTagger::new(), &VaderAnalyzer::new())
    }

    fn fitted() -> FittedModel {
        let texts = ["a dog barks", "a dog sleeps", "the cat sleeps", "the cat"];
        let params = VectorizerParams::new(1..=2, 2.0, 1.0, None).unwrap();
        let mut lexical = TfidfVectorizer::new(params.clone()).unwrap();
        lexical.fit(&texts, &crate::Stopwords::default(), false).unwrap();
        let mut syntactic = SyntacticVectorizer::new(params).unwrap();
        syntactic.fit(&texts, &RuleTagger::new(), false).unwrap();
        FittedModel::new(lexical, syntactic, versions()).unwrap()
    }

    #[test]
    fn test_unfitted_parts_are_rejected() {
        let params = VectorizerParams::lexical();
        let err = FittedModel::new(
            TfidfVectorizer::new(params.clone()).unwrap(),
            SyntacticVectorizer::new(params).unwrap(),
            versions(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFitted { .. }));
    }

    #[test]
    fn test_feature_names_follow_block_order() {
        let model = fitted();
        let names = model.feature_names();
        assert_eq!(names.len(), model.num_features());
        assert_eq!(names[..model.num_lexical_features()], *model.lexical().vocabulary().unwrap().terms());
        assert_eq!(names.last().map(String::as_str), Some("is_retweet"));
        assert_eq!(names[names.len() - NUM_SCALAR_FEATURES], "FKRA");
    }

    #[test]
    fn test_bytes_round_trip() {
        let model = fitted();
        let decoded = FittedModel::from_bytes(&model.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(matches!(
            FittedModel::from_bytes(&[0xff, 0x01]),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let expected = versions();
        let found = ResourceVersions {
            tagger: "other-tagger".to_owned(),
            ..expected.clone()
        };
        assert!(expected.check_compatible(&expected).is_ok());
        let err = expected.check_compatible(&found).unwrap_err();
        assert!(matches!(
            err,
            Error::IncompatibleResource { resource: "part-of-speech tagger", .. }
        ));
    }
}
