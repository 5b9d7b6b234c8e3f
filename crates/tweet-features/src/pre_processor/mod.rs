pub mod normalizer;
mod stopwords;
pub mod tokenizer;
mod vectorizer;

pub use normalizer::{count_twitter_objects, normalize, substitute_sentinels, TwitterObjectCounts};
pub use stopwords::{Stopwords, DEFAULT_EXCLUSIONS};
pub use tokenizer::{basic_tokenize, tokenize, STEMMER_VERSION};
pub use vectorizer::*;
