mod count_vectorizer;
mod ngrams;
mod params;
mod pos_vectorizer;
mod tfidf_vectorizer;
mod vocabulary;

pub use count_vectorizer::CountVectorizer;
pub use ngrams::{count_ngrams, CorpusStats, NgramCounts};
pub use params::{
    VectorizerParams, DEFAULT_MAX_DF, DEFAULT_MAX_NGRAM, DEFAULT_MIN_DF, DEFAULT_MIN_NGRAM,
    LEXICAL_MAX_FEATURES, SYNTACTIC_MAX_FEATURES,
};
pub use pos_vectorizer::{tag_sequence, SyntacticVectorizer};
pub use tfidf_vectorizer::TfidfVectorizer;
pub use vocabulary::{IdfTable, Vocabulary};
