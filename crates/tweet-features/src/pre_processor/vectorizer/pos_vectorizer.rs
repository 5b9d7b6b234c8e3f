use std::sync::LazyLock;

use regex::Regex;
use sprs::CsMat;
use tracing::debug;

use super::{count_vectorizer::CountVectorizer, params::VectorizerParams, vocabulary::Vocabulary};
use crate::{
    error::{Error, Result},
    nlp::pos::PosTagger,
    pre_processor::{normalizer, tokenizer},
};

/// Two or more word characters; drops punctuation tags and the `$` of `PRP$`.
static TAG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// Raw counts over part-of-speech tag n-grams.
///
/// The tagger is not part of the fitted state; callers pass the same one to
/// `fit` and `transform` (the fitted model records its version).
#[derive(Clone, Debug, PartialEq, bincode::Encode, bincode::Decode)]
pub struct SyntacticVectorizer {
    count_vectorizer: CountVectorizer,
}

/// Tags one normalized, basic-tokenized text and joins the tags with spaces.
pub fn tag_sequence(text: &str, tagger: &dyn PosTagger) -> Result<String> {
    let tokens = tokenizer::basic_tokenize(&normalizer::normalize(text));
    let tags = tagger.tag(&tokens)?;
    if tags.len() != tokens.len() {
        return Err(Error::ExternalDependency {
            dependency: "part-of-speech tagger",
            message: format!("returned {} tags for {} tokens", tags.len(), tokens.len()),
        });
    }
    Ok(tags.join(" "))
}

fn split_tags(tag_string: &str) -> Vec<String> {
    TAG_TOKEN
        .find_iter(tag_string)
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Tag-token sequences for every text, in input order.
fn analyze<T: AsRef<str> + Sync>(
    texts: &[T],
    tagger: &dyn PosTagger,
    show_progress: bool,
) -> Result<Vec<Vec<String>>> {
    tokenizer::analyze_documents(texts, "Tagging texts", show_progress, |text| {
        tag_sequence(text, tagger).map(|tags| split_tags(&tags))
    })
    .into_iter()
    .collect()
}

impl SyntacticVectorizer {
    pub fn new(params: VectorizerParams) -> Result<Self> {
        Ok(Self {
            count_vectorizer: CountVectorizer::new(params)?,
        })
    }

    pub fn fit<T: AsRef<str> + Sync>(
        &mut self,
        texts: &[T],
        tagger: &dyn PosTagger,
        show_progress: bool,
    ) -> Result<()> {
        let tagged = analyze(texts, tagger, show_progress)?;
        self.count_vectorizer.fit_from_tokenized(&tagged, None)
    }

    pub fn fit_transform<T: AsRef<str> + Sync>(
        &mut self,
        texts: &[T],
        tagger: &dyn PosTagger,
        show_progress: bool,
    ) -> Result<CsMat<f64>> {
        debug!(num_texts = texts.len(), tagger = tagger.version(), "Fitting SyntacticVectorizer");
        let tagged = analyze(texts, tagger, show_progress)?;
        self.count_vectorizer.fit_transform_from_tokenized(&tagged, None)
    }

    pub fn transform<T: AsRef<str> + Sync>(
        &self,
        texts: &[T],
        tagger: &dyn PosTagger,
        show_progress: bool,
    ) -> Result<CsMat<f64>> {
        if !self.is_fitted() {
            return Err(Error::NotFitted {
                component: "syntactic vectorizer",
            });
        }
        debug!(num_texts = texts.len(), "Transforming texts using SyntacticVectorizer");
        let tagged = analyze(texts, tagger, show_progress)?;
        self.count_vectorizer.transform_from_tokenized(&tagged)
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
    pub fn is_fitted(&self) -> bool {
        self.count_vectorizer.is_fitted()
    }

    #[must_use]
    pub fn params(&self) -> &VectorizerParams {
        self.count_vectorizer.params()
    }
}
