use std::ops::RangeInclusive;

use ahash::HashMap;

use crate::pre_processor::stopwords::Stopwords;

/// Per-document n-gram counts, keyed by the space-joined n-gram.
pub type NgramCounts = HashMap<String, usize>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorpusStats {
    /// Number of documents containing the n-gram at least once.
    pub doc_freq: usize,
    /// Occurrences across the whole corpus.
    pub term_freq: usize,
}

/// Counts every contiguous n-gram of the requested orders.
///
/// Unigrams found in `stopwords` are skipped; longer n-grams are kept even when
/// they contain stopwords.
pub fn count_ngrams(
    tokens: &[String],
    sizes: RangeInclusive<usize>,
    stopwords: Option<&Stopwords>,
) -> NgramCounts {
    let mut ngram_counter = NgramCounts::default();

    for n in sizes {
        for window in tokens.windows(n) {
            if n == 1 && stopwords.is_some_and(|sw| sw.contains(&window[0])) {
                continue;
            }
            *ngram_counter.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    ngram_counter
}

/// Single-threaded reduction of per-document counts into corpus statistics.
pub fn corpus_stats(ngram_maps: &[NgramCounts]) -> HashMap<&str, CorpusStats> {
    let mut stats: HashMap<&str, CorpusStats> = HashMap::default();
    for ngram_map in ngram_maps {
        for (ngram, &count) in ngram_map {
            let entry = stats.entry(ngram.as_str()).or_default();
            entry.doc_freq += 1;
            entry.term_freq += count;
        }
    }
    stats
}
