use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// An input element could not be used as text.
    #[error("input element {index} is not usable text: {reason}")]
    Input { index: usize, reason: String },

    /// A transform was requested from a component that has not been fitted.
    #[error("{component} has not been fitted; call `fit` before `transform`")]
    NotFitted { component: &'static str },

    #[error("invalid value `{value}` for `{param}`: {constraint}")]
    InvalidParameter {
        param: &'static str,
        value: String,
        constraint: &'static str,
    },

    /// Fitted state whose parts disagree with each other.
    #[error("inconsistent fitted model: {reason}")]
    InconsistentModel { reason: String },

    /// The fitted model was produced with a different tagger, lexicon or stemmer.
    #[error("{resource} version mismatch: model was fitted with `{expected}`, found `{found}`")]
    IncompatibleResource {
        resource: &'static str,
        expected: String,
        found: String,
    },

    #[error("{dependency} failed: {message}")]
    ExternalDependency {
        dependency: &'static str,
        message: String,
    },

    #[error("failed to encode fitted model")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode fitted model")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
