//! Pre-trained artifact implementations.
//!
//! - [`TfidfVectorizer`] - the feature encoder
//! - [`LinearClassifier`] - the sentiment classifier, evaluated with `candle`

pub mod classifier;
pub mod vectorizer;

pub use classifier::{ClassifierArtifact, LinearClassifier, ProbabilityModel};
pub use vectorizer::{Norm, TfidfVectorizer, VectorizerArtifact};
