//! Sentiment analysis pipeline for product reviews.
//!
//! Raw review text is cleaned by a [`TextNormalizer`](crate::text::TextNormalizer),
//! turned into features by a pre-trained vectorizer and scored by a pre-trained
//! linear classifier. Single reviews get a label plus the full per-label
//! confidence breakdown; uploaded tables get a label per row plus a summary of
//! how labels are distributed.
//!
//! ## Main Types
//!
//! - [`SentimentAnalysisPipeline`] - High-level interface for single and batch scoring
//! - [`SentimentAnalysisPipelineBuilder`] - Builder pattern for pipeline configuration
//! - [`FeatureEncoder`] / [`SentimentClassifier`] - Seams for the two trained artifacts
//! - [`BatchPrediction`] - Per-row results plus the label distribution
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use review_sentiment::pipelines::sentiment_analysis_pipeline::*;
//!
//! # fn run() -> anyhow::Result<()> {
//! let pipeline =
//!     SentimentAnalysisPipelineBuilder::local("artifacts/vectorizer.json", "artifacts/classifier.json")
//!         .build()?;
//!
//! let result = pipeline.predict("I love this product!")?;
//! println!("Sentiment: {} (confidence: {:.2}%)", result.label, result.confidence());
//!
//! let batch = pipeline.predict_file("reviews.csv")?;
//! for share in batch.distribution.shares() {
//!     println!("{}: {:.2}%", share.label, share.percent);
//! }
//! std::fs::write("sentiment_results.csv", batch.results.to_csv()?)?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod builder;
pub mod model;
pub mod pipeline;

pub use batch::{BatchPrediction, DistributionSummary, LabelShare, ResultRow, ResultTable};
pub use builder::SentimentAnalysisPipelineBuilder;
pub use model::{FeatureEncoder, FeatureVector, SentimentClassifier};
pub use pipeline::{LabelScore, SentimentAnalysisPipeline, SentimentResult};

pub use crate::core::{SentimentError, TableSchema};
pub use crate::pipelines::utils::DeviceSelectable;
pub use crate::table::{Cell, Table};
