mod assembler;
mod model;
mod scalar;

pub use assembler::{assemble, FeatureExtractor, FeatureMatrix};
pub use model::{FittedModel, ResourceVersions};
pub use scalar::{ScalarFeatures, NUM_SCALAR_FEATURES, SCALAR_FEATURE_NAMES};
