use rayon::prelude::*;
use sprs::CsMat;
use tracing::debug;

use super::{
    ngrams::{self, NgramCounts},
    params::VectorizerParams,
    vocabulary::Vocabulary,
};
use crate::{
    error::{Error, Result},
    pre_processor::stopwords::Stopwords,
};

/// Raw n-gram counts over pre-tokenized documents.
#[derive(Clone, Debug, PartialEq, bincode::Encode, bincode::Decode)]
pub struct CountVectorizer {
    params: VectorizerParams,
    /// `None` until fitted.
    vocab: Option<Vocabulary>,
}

impl CountVectorizer {
    pub fn new(params: VectorizerParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            vocab: None,
        })
    }

    /// Counts n-grams for every document, keeping input order.
    pub(crate) fn count_documents(
        &self,
        tokenized_texts: &[Vec<String>],
        stopwords: Option<&Stopwords>,
    ) -> Vec<NgramCounts> {
        tokenized_texts
            .par_iter()
            .map(|tokens| ngrams::count_ngrams(tokens, self.params.ngram_sizes(), stopwords))
            .collect()
    }

    pub fn fit_from_tokenized(
        &mut self,
        tokenized_texts: &[Vec<String>],
        stopwords: Option<&Stopwords>,
    ) -> Result<()> {
        let ngram_maps = self.count_documents(tokenized_texts, stopwords);
        self.fit_from_counts(&ngram_maps);
        Ok(())
    }

    /// Builds the vocabulary from pre-computed per-document n-gram counts.
    pub(crate) fn fit_from_counts(&mut self, ngram_maps: &[NgramCounts]) {
        debug!(num_texts = ngram_maps.len(), "Building vocabulary from n-gram counts");
        let stats = ngrams::corpus_stats(ngram_maps);
        let vocab = Vocabulary::select(&stats, &self.params, ngram_maps.len());
        debug!(vocab_size = vocab.len(), "CountVectorizer fitting complete");
        self.vocab = Some(vocab);
    }

    pub fn transform_from_tokenized(&self, tokenized_texts: &[Vec<String>]) -> Result<CsMat<f64>> {
        let vocab = self.fitted_vocabulary()?;
        let ngram_maps = self.count_documents(tokenized_texts, None);
        Ok(Self::counts_to_matrix(vocab, &ngram_maps))
    }

    /// Transform using pre-computed n-gram counts.
    pub(crate) fn transform_counts(&self, ngram_maps: &[NgramCounts]) -> Result<CsMat<f64>> {
        let vocab = self.fitted_vocabulary()?;
        Ok(Self::counts_to_matrix(vocab, ngram_maps))
    }

    fn counts_to_matrix(vocab: &Vocabulary, ngram_maps: &[NgramCounts]) -> CsMat<f64> {
        // Build CSR format directly
        let mut indptr = Vec::with_capacity(ngram_maps.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);
        for ngrams in ngram_maps {
            let mut row_entries = ngrams
                .iter()
                .filter_map(|(ngram, &count)| vocab.get(ngram).map(|col_idx| (col_idx, count as f64)))
                .collect::<Vec<_>>();

            row_entries.sort_by_key(|(col_idx, _)| *col_idx);
            for (col_idx, count) in row_entries {
                indices.push(col_idx);
                data.push(count);
            }
            indptr.push(indices.len());
        }

        debug!(non_zero_entries = data.len(), "Count transformation complete");
        CsMat::new((ngram_maps.len(), vocab.len()), indptr, indices, data)
    }

    /// Fits on `tokenized_texts` and transforms them, counting n-grams only once.
    pub fn fit_transform_from_tokenized(
        &mut self,
        tokenized_texts: &[Vec<String>],
        stopwords: Option<&Stopwords>,
    ) -> Result<CsMat<f64>> {
        let ngram_maps = self.count_documents(tokenized_texts, stopwords);
        self.fit_from_counts(&ngram_maps);
        self.transform_counts(&ngram_maps)
    }

    fn fitted_vocabulary(&self) -> Result<&Vocabulary> {
        self.vocab.as_ref().ok_or(Error::NotFitted {
            component: "count vectorizer",
        })
    }

    #[must_use]
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocab.as_ref()
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.vocab.is_some()
    }

    /// Number of columns; zero before fitting.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.vocab.as_ref().map_or(0, Vocabulary::len)
    }

    #[must_use]
    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|t| t.split_whitespace().map(str::to_owned).collect())
            .collect()
    }

    fn small_params() -> VectorizerParams {
        VectorizerParams::new(1..=2, 2.0, 0.75, None).unwrap()
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let vectorizer = CountVectorizer::new(small_params()).unwrap();
        let err = vectorizer.transform_from_tokenized(&docs(&["a b"])).unwrap_err();
        assert!(matches!(err, Error::NotFitted { .. }));
    }

    #[test]
    fn test_fit_transform_counts() {
        let corpus = docs(&["a b a", "a b", "c d", "c e", "z"]);
        let mut vectorizer = CountVectorizer::new(small_params()).unwrap();
        let matrix = vectorizer.fit_transform_from_tokenized(&corpus, None).unwrap();

        let vocab = vectorizer.vocabulary().unwrap();
        assert_eq!(vocab.terms(), ["a", "a b", "b", "c"]);
        assert_eq!(matrix.shape(), (5, 4));

        let first = matrix.outer_view(0).unwrap();
        assert_eq!(first.get(vocab.get("a").unwrap()), Some(&2.0));
        assert_eq!(first.get(vocab.get("a b").unwrap()), Some(&1.0));
        assert_eq!(matrix.outer_view(4).unwrap().nnz(), 0);
    }

    #[test]
    fn test_fit_then_transform_matches_fit_transform() {
        let corpus = docs(&["x y", "x y z", "y z", "q", "x"]);
        let mut a = CountVectorizer::new(small_params()).unwrap();
        let combined = a.fit_transform_from_tokenized(&corpus, None).unwrap();

        let mut b = CountVectorizer::new(small_params()).unwrap();
        b.fit_from_tokenized(&corpus, None).unwrap();
        let separate = b.transform_from_tokenized(&corpus).unwrap();
        assert_eq!(combined, separate);
    }

    #[test]
    fn test_unknown_ngrams_are_ignored() {
        let mut vectorizer = CountVectorizer::new(small_params()).unwrap();
        vectorizer
            .fit_from_tokenized(&docs(&["a", "a", "b", "c"]), None)
            .unwrap();
        let matrix = vectorizer.transform_from_tokenized(&docs(&["never seen", "a a"])).unwrap();
        assert_eq!(matrix.outer_view(0).unwrap().nnz(), 0);
        assert_eq!(matrix.outer_view(1).unwrap().get(0), Some(&2.0));
    }
}
