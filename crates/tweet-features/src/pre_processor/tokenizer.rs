use std::{borrow::Cow, sync::LazyLock};

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator, ProgressStyle};
use rayon::prelude::*;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use tracing::debug;

/// Identifies the stemming algorithm; lexical vocabularies are only valid for the stemmer they were fitted with.
pub const STEMMER_VERSION: &str = "snowball-english/rust-stemmers-1";

/// Minimum number of texts to consider parallelization
const MIN_TEXTS_FOR_PARALLEL: usize = 100;

/// Minimum total character count to consider parallelization
const MIN_CHARS_FOR_PARALLEL: usize = 10_000;

static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z]+").expect("valid regex"));

static NON_ALPHA_OR_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z.,!?]+").expect("valid regex"));

static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

fn split_lowercase(text: &str, separators: &Regex) -> Vec<String> {
    let lowered = text.to_lowercase();
    separators
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Lowercases, keeps ASCII letters only and stems every token.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    split_lowercase(text, &NON_ALPHA)
        .into_iter()
        .map(|token| STEMMER.stem(&token).into_owned())
        .collect()
}

/// Lowercases and keeps ASCII letters plus `.`, `,`, `!` and `?`; no stemming.
#[must_use]
pub fn basic_tokenize(text: &str) -> Vec<String> {
    split_lowercase(text, &NON_ALPHA_OR_PUNCT)
}

#[must_use]
pub fn stem(word: &str) -> String {
    STEMMER.stem(word).into_owned()
}

fn progress_bar_setup(len: usize, message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb
}

/// Determine if parallel processing should be used based on workload characteristics.
///
/// Parallelization is beneficial when:
/// - There are many texts (>= 100), OR
/// - The total character count is large (>= 10,000 chars)
#[inline]
fn should_use_parallel<T: AsRef<str>>(texts: &[T]) -> bool {
    let num_texts = texts.len();
    if num_texts >= MIN_TEXTS_FOR_PARALLEL {
        return true;
    }
    let total_chars: usize = texts.iter().map(|s| s.as_ref().len()).sum();
    total_chars >= MIN_CHARS_FOR_PARALLEL
}

/// Applies `analyze` to every document and returns the results in input order.
///
/// Large batches fan out over the rayon pool; the per-document work must not
/// share mutable state.
pub(crate) fn analyze_documents<T, R, F>(
    texts: &[T],
    message: &'static str,
    show_progress: bool,
    analyze: F,
) -> Vec<R>
where
    T: AsRef<str> + Sync,
    R: Send,
    F: Fn(&str) -> R + Sync + Send,
{
    let pb = if show_progress {
        progress_bar_setup(texts.len(), message)
    } else {
        ProgressBar::hidden()
    };

    let result = if should_use_parallel(texts) {
        debug!(num_texts = texts.len(), step = message, "Using parallel analysis");
        texts
            .par_iter()
            .progress_with(pb.clone())
            .map(|text| analyze(text.as_ref()))
            .collect()
    } else {
        debug!(num_texts = texts.len(), step = message, "Using sequential analysis");
        texts
            .iter()
            .progress_with(pb.clone())
            .map(|text| analyze(text.as_ref()))
            .collect()
    };
    pb.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_tokenize_stems_and_drops_non_letters() {
        assert_eq!(
            tokenize("Running DOGS!!! were 2 fast #winning"),
            vec!["run", "dog", "were", "fast", "win"]
        );
    }

    #[test]
    fn test_tokenize_splits_on_apostrophes_and_digits() {
        assert_eq!(tokenize("don't u2"), vec!["don", "t", "u"]);
    }

    #[test]
    fn test_basic_tokenize_keeps_punctuation() {
        assert_eq!(
            basic_tokenize("I love this! #great, OK?"),
            vec!["i", "love", "this!", "great,", "ok?"]
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(tokenize("").is_empty());
        assert!(basic_tokenize("   ").is_empty());
        assert!(tokenize("1234 :-)").is_empty());
    }

    #[test]
    fn test_analyze_documents_preserves_order() {
        let texts: Vec<String> = (0..250).map(|i| format!("doc {i}")).collect();
        let lengths = analyze_documents(&texts, "lengths", false, str::len);
        assert_eq!(lengths.len(), 250);
        for (text, len) in texts.iter().zip(&lengths) {
            assert_eq!(text.len(), *len);
        }
    }

    proptest! {
        #[test]
        fn prop_stems_come_from_basic_alphabetic_tokens(text in "[ a-zA-Z0-9.,!?#@']{0,80}") {
            let stemmed = tokenize(&text);
            let possible: Vec<String> = basic_tokenize(&text)
                .iter()
                .flat_map(|token| {
                    token
                        .split(|c: char| !c.is_ascii_alphabetic())
                        .filter(|part| !part.is_empty())
                        .map(stem)
                        .collect::<Vec<_>>()
                })
                .collect();
            for token in &stemmed {
                prop_assert!(possible.contains(token), "{token} not derivable from basic tokens");
            }
        }
    }
}
