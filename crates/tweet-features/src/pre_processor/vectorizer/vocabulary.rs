use std::cmp::Reverse;

use ahash::HashMap;
use tracing::{debug, warn};

use super::{ngrams::CorpusStats, params::VectorizerParams};

/// Ordered bijection between n-grams and column indices, fixed at fit time.
///
/// Columns are assigned in lexicographic order of the n-grams, so two fits on
/// the same corpus always agree on the layout. Lookups at transform time go
/// through [`Vocabulary::get`], never through positions computed elsewhere.
///
/// Only the ordered terms are persisted; the index is rebuilt on decode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut terms = terms.into_iter().map(Into::into).collect::<Vec<String>>();
        terms.sort();
        terms.dedup();
        Self::index_terms(terms)
    }

    fn index_terms(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
        Self { terms, index }
    }

    /// Applies the document-frequency bounds and the `max_features` cap.
    ///
    /// Among the n-grams inside the bounds the most frequent ones (total corpus
    /// count, ties in lexicographic order) are retained.
    pub fn select(
        stats: &HashMap<&str, CorpusStats>,
        params: &VectorizerParams,
        n_docs: usize,
    ) -> Self {
        let min_count = params.min_doc_count(n_docs);
        let max_count = params.max_doc_count(n_docs);
        debug!(
            original_size = stats.len(),
            min_count, max_count, "Applying document frequency bounds"
        );

        let mut candidates = stats
            .iter()
            .filter(|(_, s)| {
                let df = s.doc_freq as f64;
                df >= min_count && df <= max_count
            })
            .map(|(ngram, s)| (*ngram, s.term_freq))
            .collect::<Vec<_>>();
        debug!(
            filtered_size = candidates.len(),
            "Vocabulary filtered by document frequency"
        );

        if let Some(limit) = params.max_features() {
            if candidates.len() > limit {
                candidates.sort_unstable_by_key(|&(ngram, term_freq)| (Reverse(term_freq), ngram));
                candidates.truncate(limit);
            }
        }

        if candidates.is_empty() && !stats.is_empty() {
            warn!(
                n_docs,
                min_count, max_count, "No n-gram satisfies the document frequency bounds"
            );
        }

        Self::from_terms(candidates.into_iter().map(|(ngram, _)| ngram))
    }

    #[must_use]
    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl bincode::Encode for Vocabulary {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.terms, encoder)
    }
}

impl<Context> bincode::Decode<Context> for Vocabulary {
    fn decode<D: bincode::de::Decoder<Context = Context>>(
        decoder: &mut D,
    ) -> Result<Self, bincode::error::DecodeError> {
        let terms = <Vec<String> as bincode::Decode<Context>>::decode(decoder)?;
        let vocab = Self::index_terms(terms);
        if vocab.index.len() != vocab.terms.len() {
            return Err(bincode::error::DecodeError::OtherString(format!(
                "vocabulary repeats terms: {} entries, {} distinct",
                vocab.terms.len(),
                vocab.index.len()
            )));
        }
        Ok(vocab)
    }
}

bincode::impl_borrow_decode!(Vocabulary);

/// Inverse document frequency per vocabulary column.
#[derive(Clone, Debug, Default, PartialEq, bincode::Encode, bincode::Decode)]
pub struct IdfTable(Vec<f64>);

impl IdfTable {
    /// `idf = ln(n_docs / df) + 1` for each column, without smoothing.
    pub fn from_doc_freqs(n_docs: usize, doc_freqs: &[usize]) -> Self {
        let n_docs = n_docs as f64;
        Self(
            doc_freqs
                .iter()
                .map(|&df| (n_docs / df as f64).ln() + 1.0)
                .collect(),
        )
    }

    #[must_use]
    pub fn weight(&self, column: usize) -> Option<f64> {
        self.0.get(column).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
