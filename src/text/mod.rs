//! Review text cleaning.
//!
//! ## Main Types
//!
//! - [`TextNormalizer`] - Turns raw review text into the cleaned token string
//! - [`StopwordSet`] - Immutable set of tokens excluded from analysis

pub mod normalizer;
pub mod stopwords;

pub use normalizer::TextNormalizer;
pub use stopwords::StopwordSet;
