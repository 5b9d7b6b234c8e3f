use sprs::CsMat;
use tracing::debug;

use super::{count_vectorizer::CountVectorizer, params::VectorizerParams, vocabulary::{IdfTable, Vocabulary}};
use crate::{
    error::{Error, Result},
    pre_processor::{normalizer, stopwords::Stopwords, tokenizer},
};

/// TF-IDF over stemmed word n-grams of normalized text.
///
/// Weights are `count * idf` with no row normalization, so repeated terms in a
/// longer tweet produce larger values.
#[derive(Clone, Debug, PartialEq, bincode::Encode, bincode::Decode)]
pub struct TfidfVectorizer {
    count_vectorizer: CountVectorizer,
    idf: Option<IdfTable>,
}

/// Normalize, then stem-tokenize, every text.
fn analyze<T: AsRef<str> + Sync>(texts: &[T], show_progress: bool) -> Vec<Vec<String>> {
    tokenizer::analyze_documents(texts, "Tokenizing texts", show_progress, |text| {
        tokenizer::tokenize(&normalizer::normalize(text))
    })
}

impl TfidfVectorizer {
    pub fn new(params: VectorizerParams) -> Result<Self> {
        Ok(Self {
            count_vectorizer: CountVectorizer::new(params)?,
            idf: None,
        })
    }

    pub fn fit<T: AsRef<str> + Sync>(
        &mut self,
        texts: &[T],
        stopwords: &Stopwords,
        show_progress: bool,
    ) -> Result<()> {
        self.fit_transform(texts, stopwords, show_progress).map(|_| ())
    }

    pub fn fit_transform<T: AsRef<str> + Sync>(
        &mut self,
        texts: &[T],
        stopwords: &Stopwords,
        show_progress: bool,
    ) -> Result<CsMat<f64>> {
        debug!(num_texts = texts.len(), "Fitting TfidfVectorizer");
        let tokenized_texts = analyze(texts, show_progress);
        let tf_matrix = self
            .count_vectorizer
            .fit_transform_from_tokenized(&tokenized_texts, Some(stopwords))?;

        debug!("Calculating IDF values");
        // Count document frequency for each term
        let mut df = vec![0usize; self.count_vectorizer.num_features()];
        for row_vec in tf_matrix.outer_iterator() {
            for (col_idx, _val) in row_vec.iter() {
                df[col_idx] += 1;
            }
        }
        let idf = IdfTable::from_doc_freqs(texts.len(), &df);
        debug!("IDF calculation complete");

        let weighted = Self::apply_idf(tf_matrix, &idf);
        self.idf = Some(idf);
        Ok(weighted)
    }

    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T], show_progress: bool) -> Result<CsMat<f64>> {
        debug!(num_texts = texts.len(), "Transforming texts using TfidfVectorizer");
        let idf = self.fitted_idf()?;
        let tokenized_texts = analyze(texts, show_progress);
        let tf_matrix = self.count_vectorizer.transform_from_tokenized(&tokenized_texts)?;
        Ok(Self::apply_idf(tf_matrix, idf))
    }

    fn apply_idf(mut tf_matrix: CsMat<f64>, idf: &IdfTable) -> CsMat<f64> {
        let weights = idf.as_slice();
        for mut row_vec in tf_matrix.outer_iterator_mut() {
            for (col_idx, val) in row_vec.iter_mut() {
                *val *= weights[col_idx];
            }
        }
        tf_matrix
    }

    fn fitted_idf(&self) -> Result<&IdfTable> {
        let idf = self.idf.as_ref().ok_or(Error::NotFitted {
            component: "lexical vectorizer",
        })?;
        if idf.len() != self.count_vectorizer.num_features() {
            return Err(Error::InconsistentModel {
                reason: format!(
                    "IDF table has {} entries for a vocabulary of {}",
                    idf.len(),
                    self.count_vectorizer.num_features()
                ),
            });
        }
        Ok(idf)
    }

    #[must_use]
    pub fn num_features(&self) -> usize {
        self.count_vectorizer.num_features()
    }

    #[must_use]
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.count_vectorizer.vocabulary()
    }

    #[must_use]
    pub fn idf(&self) -> Option<&IdfTable> {
        self.idf.as_ref()
    }

    /// IDF weight of a vocabulary n-gram, looked up by key.
    #[must_use]
    pub fn idf_of(&self, ngram: &str) -> Option<f64> {
        let column = self.vocabulary()?.get(ngram)?;
        self.idf.as_ref()?.weight(column)
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.idf.is_some() && self.count_vectorizer.is_fitted()
    }

    #[must_use]
    pub fn params(&self) -> &VectorizerParams {
        self.count_vectorizer.params()
    }
}
