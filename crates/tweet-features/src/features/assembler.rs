use std::{ops::Range, sync::Arc};

use ndarray::{Array2, ArrayView2};
use sprs::CsMat;
use tracing::debug;

use super::{
    model::{FittedModel, ResourceVersions},
    scalar::{ScalarFeatures, NUM_SCALAR_FEATURES},
};
use crate::{
    config::PipelineConfig,
    error::{Error, Result},
    nlp::{PosTagger, RuleTagger, SentimentAnalyzer, VaderAnalyzer},
    pre_processor::{Stopwords, SyntacticVectorizer, TfidfVectorizer},
};

/// Dense rows of `[lexical | syntactic | scalar]` columns, one per input text.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    values: Array2<f64>,
    num_lexical: usize,
    num_syntactic: usize,
}

impl FeatureMatrix {
    fn from_blocks(lexical: &CsMat<f64>, syntactic: &CsMat<f64>, scalars: &[ScalarFeatures]) -> Self {
        let num_lexical = lexical.cols();
        let num_syntactic = syntactic.cols();
        let scalar_offset = num_lexical + num_syntactic;
        let mut values = Array2::zeros((scalars.len(), scalar_offset + NUM_SCALAR_FEATURES));

        for (row, row_vec) in lexical.outer_iterator().enumerate() {
            for (col, &value) in row_vec.iter() {
                values[[row, col]] = value;
            }
        }
        for (row, row_vec) in syntactic.outer_iterator().enumerate() {
            for (col, &value) in row_vec.iter() {
                values[[row, num_lexical + col]] = value;
            }
        }
        for (row, features) in scalars.iter().enumerate() {
            for (col, value) in features.to_array().into_iter().enumerate() {
                values[[row, scalar_offset + col]] = value;
            }
        }

        Self {
            values,
            num_lexical,
            num_syntactic,
        }
    }

    #[must_use]
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.values.nrows()
    }

    #[must_use]
    pub fn num_features(&self) -> usize {
        self.values.ncols()
    }

    #[must_use]
    pub fn lexical_columns(&self) -> Range<usize> {
        0..self.num_lexical
    }

    #[must_use]
    pub fn syntactic_columns(&self) -> Range<usize> {
        self.num_lexical..self.num_lexical + self.num_syntactic
    }

    #[must_use]
    pub fn scalar_columns(&self) -> Range<usize> {
        let start = self.num_lexical + self.num_syntactic;
        start..start + NUM_SCALAR_FEATURES
    }
}

/// Fits the vectorizers on a corpus and turns texts into [`FeatureMatrix`] rows.
pub struct FeatureExtractor {
    config: PipelineConfig,
    stopwords: Stopwords,
    tagger: Arc<dyn PosTagger>,
    sentiment: Arc<dyn SentimentAnalyzer>,
    model: Option<FittedModel>,
}

impl FeatureExtractor {
    /// Uses the built-in rule tagger and VADER analyzer.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            stopwords: config.stopwords(),
            config,
            tagger: Arc::new(RuleTagger::new()),
            sentiment: Arc::new(VaderAnalyzer::new()),
            model: None,
        })
    }

    #[must_use]
    pub fn with_tagger(mut self, tagger: Arc<dyn PosTagger>) -> Self {
        self.tagger = tagger;
        self
    }

    #[must_use]
    pub fn with_sentiment(mut self, sentiment: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn fit<T: AsRef<str> + Sync>(&mut self, texts: &[T]) -> Result<()> {
        self.fit_transform(texts).map(|_| ())
    }

    /// Fits both vectorizers on `texts` and returns their feature rows.
    pub fn fit_transform<T: AsRef<str> + Sync>(&mut self, texts: &[T]) -> Result<FeatureMatrix> {
        debug!(num_texts = texts.len(), "Fitting feature extractor");
        let show_progress = self.config.show_progress;

        let mut lexical = TfidfVectorizer::new(self.config.lexical.clone())?;
        let lexical_block = lexical.fit_transform(texts, &self.stopwords, show_progress)?;

        let mut syntactic = SyntacticVectorizer::new(self.config.syntactic.clone())?;
        let syntactic_block = syntactic.fit_transform(texts, self.tagger.as_ref(), show_progress)?;

        let scalars = ScalarFeatures::extract_all(texts, self.sentiment.as_ref(), show_progress)?;

        self.model = Some(FittedModel::new(lexical, syntactic, self.versions())?);
        let matrix = FeatureMatrix::from_blocks(&lexical_block, &syntactic_block, &scalars);
        debug!(
            num_rows = matrix.num_rows(),
            num_features = matrix.num_features(),
            "Feature extractor fitting complete"
        );
        Ok(matrix)
    }

    /// Rows for `texts` using the fitted vocabularies; columns match the fit output.
    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> Result<FeatureMatrix> {
        let model = self.model.as_ref().ok_or(Error::NotFitted {
            component: "feature extractor",
        })?;
        model.versions().check_compatible(&self.versions())?;
        debug!(num_texts = texts.len(), "Transforming texts");
        let show_progress = self.config.show_progress;

        let lexical_block = model.lexical().transform(texts, show_progress)?;
        let syntactic_block = model
            .syntactic()
            .transform(texts, self.tagger.as_ref(), show_progress)?;
        let scalars = ScalarFeatures::extract_all(texts, self.sentiment.as_ref(), show_progress)?;

        Ok(FeatureMatrix::from_blocks(&lexical_block, &syntactic_block, &scalars))
    }

    /// Installs a previously fitted model after checking its annotator versions.
    pub fn load_model(&mut self, model: FittedModel) -> Result<()> {
        model.versions().check_compatible(&self.versions())?;
        self.model = Some(model);
        Ok(())
    }

    #[must_use]
    pub fn model(&self) -> Option<&FittedModel> {
        self.model.as_ref()
    }

    #[must_use]
    pub fn into_model(self) -> Option<FittedModel> {
        self.model
    }

    /// Versions of the annotators this extractor currently uses.
    #[must_use]
    pub fn versions(&self) -> ResourceVersions {
        ResourceVersions::current(self.tagger.as_ref(), self.sentiment.as_ref())
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

/// Fits with the default configuration and returns the rows plus the fitted state.
pub fn assemble<T: AsRef<str> + Sync>(texts: &[T]) -> Result<(FeatureMatrix, FittedModel)> {
    let mut extractor = FeatureExtractor::new(PipelineConfig::default())?;
    let matrix = extractor.fit_transform(texts)?;
    let model = extractor.into_model().ok_or(Error::NotFitted {
        component: "feature extractor",
    })?;
    Ok((matrix, model))
}

#[cfg(test)]
mod tests {
    use ndarray::s;

    use super::*;
    use crate::{nlp::SentimentScores, pre_processor::VectorizerParams};

    struct OfflineAnalyzer;

    impl SentimentAnalyzer for OfflineAnalyzer {
        fn version(&self) -> &str {
            "offline"
        }

        fn polarity_scores(&self, _text: &str) -> Result<SentimentScores> {
            Err(Error::ExternalDependency {
                dependency: "sentiment analyzer",
                message: "lexicon not available".to_owned(),
            })
        }
    }

    fn small_config() -> PipelineConfig {
        let params = VectorizerParams::new(1..=2, 2.0, 0.9, None).unwrap();
        PipelineConfig {
            lexical: params.clone(),
            syntactic: params,
            ..PipelineConfig::default()
        }
    }

    fn corpus() -> Vec<&'static str> {
        vec![
            "I love this dog!",
            "i love this cat @friend",
            "the dogs are barking loudly http://t.co/a",
            "the dogs are sleeping",
            "RT what a day #monday",
        ]
    }

    #[test]
    fn test_blocks_are_concatenated_in_order() {
        let mut extractor = FeatureExtractor::new(small_config()).unwrap();
        let matrix = extractor.fit_transform(&corpus()).unwrap();
        let model = extractor.model().unwrap();

        assert_eq!(matrix.num_rows(), 5);
        assert_eq!(matrix.num_features(), model.num_features());
        assert_eq!(matrix.lexical_columns().len(), model.num_lexical_features());
        assert_eq!(matrix.syntactic_columns().len(), model.num_syntactic_features());
        assert_eq!(matrix.scalar_columns().end, matrix.num_features());

        let love = model.lexical().vocabulary().unwrap().get("love").unwrap();
        let idf = model.lexical().idf_of("love").unwrap();
        assert_eq!(matrix.values()[[0, love]], idf);

        // num_words of the last row
        let num_words = matrix.scalar_columns().start + 7;
        assert_eq!(matrix.values()[[4, num_words]], 5.0);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let extractor = FeatureExtractor::new(small_config()).unwrap();
        assert!(matches!(
            extractor.transform(&["hello"]),
            Err(Error::NotFitted { component: "feature extractor" })
        ));
    }

    #[test]
    fn test_transform_reuses_fitted_columns() {
        let mut extractor = FeatureExtractor::new(small_config()).unwrap();
        let fitted = extractor.fit_transform(&corpus()).unwrap();
        let again = extractor.transform(&corpus()).unwrap();
        assert_eq!(fitted, again);

        let unseen = extractor.transform(&["completely unrelated words"]).unwrap();
        assert_eq!(unseen.num_features(), fitted.num_features());
        let lexical_end = fitted.lexical_columns().end;
        assert!(unseen.values().slice(s![0, ..lexical_end]).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_sentiment_failure_propagates() {
        let mut extractor = FeatureExtractor::new(small_config())
            .unwrap()
            .with_sentiment(Arc::new(OfflineAnalyzer));
        assert!(matches!(
            extractor.fit(&corpus()),
            Err(Error::ExternalDependency { dependency: "sentiment analyzer", .. })
        ));
        assert!(extractor.model().is_none());
    }

    #[test]
    fn test_swapping_analyzer_after_fit_is_rejected() {
        let mut extractor = FeatureExtractor::new(small_config()).unwrap();
        extractor.fit(&corpus()).unwrap();
        let model = extractor.model().cloned().unwrap();

        let mut other = FeatureExtractor::new(small_config())
            .unwrap()
            .with_sentiment(Arc::new(OfflineAnalyzer));
        assert!(matches!(
            other.load_model(model),
            Err(Error::IncompatibleResource { resource: "sentiment lexicon", .. })
        ));
    }

    #[test]
    fn test_empty_corpus() {
        let mut extractor = FeatureExtractor::new(small_config()).unwrap();
        let matrix = extractor.fit_transform(&Vec::<String>::new()).unwrap();
        assert_eq!(matrix.num_rows(), 0);
        assert_eq!(matrix.num_features(), NUM_SCALAR_FEATURES);
    }

    #[test]
    fn test_assemble_uses_defaults() {
        let (matrix, model) = assemble(&corpus()).unwrap();
        // five documents never reach the default min_df of 5 within max_df 0.501
        assert_eq!(model.num_lexical_features(), 0);
        assert_eq!(matrix.num_features(), model.num_features());
        assert_eq!(matrix.num_rows(), 5);
    }
}
