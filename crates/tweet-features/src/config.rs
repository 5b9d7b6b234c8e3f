use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Result,
    pre_processor::{Stopwords, VectorizerParams, DEFAULT_EXCLUSIONS},
};

/// Pipeline settings. Every field is optional in JSON; missing ones take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Stemmed word n-grams, TF-IDF weighted.
    #[serde(deserialize_with = "VectorizerParams::deserialize_lexical")]
    pub lexical: VectorizerParams,
    /// Part-of-speech tag n-grams, raw counts. Fields missing here fall back
    /// to the syntactic defaults, not the lexical ones.
    #[serde(deserialize_with = "VectorizerParams::deserialize_syntactic")]
    pub syntactic: VectorizerParams,
    /// Appended to the English stopword list for the lexical block.
    pub extra_stopwords: Vec<String>,
    /// Draw progress bars for the per-document passes.
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lexical: VectorizerParams::lexical(),
            syntactic: VectorizerParams::syntactic(),
            extra_stopwords: DEFAULT_EXCLUSIONS.iter().map(|w| (*w).to_owned()).collect(),
            show_progress: false,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading pipeline config");
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.lexical.validate()?;
        self.syntactic.validate()
    }

    /// English stopwords plus `extra_stopwords`, built once per fit.
    #[must_use]
    pub fn stopwords(&self) -> Stopwords {
        Stopwords::english_with(self.extra_stopwords.iter().cloned())
    }
}
