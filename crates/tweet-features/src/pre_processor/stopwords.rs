use std::sync::{Arc, LazyLock};

use ahash::HashSet;

/// NLTK English stopword list.
static ENGLISH_STOPWORDS: &str = include_str!("../../../../resources/stopwords_en.txt");

/// Tweet-specific tokens excluded from the lexical vocabulary on top of the English list.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["#ff", "ff", "rt"];

static ENGLISH: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    ENGLISH_STOPWORDS
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
});

/// Immutable stopword set, assembled once and shared between vectorizers.
#[derive(Clone, Debug)]
pub struct Stopwords(Arc<HashSet<String>>);

impl Stopwords {
    /// The English list plus `extra`.
    pub fn english_with<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = ENGLISH
            .iter()
            .map(|w| (*w).to_owned())
            .chain(extra.into_iter().map(Into::into))
            .collect();
        Self(Arc::new(words))
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
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

impl Default for Stopwords {
    fn default() -> Self {
        Self::english_with(DEFAULT_EXCLUSIONS.iter().copied())
    }
}
