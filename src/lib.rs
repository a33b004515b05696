pub mod core;
pub mod loaders;
pub mod models;
pub mod pipelines;
pub mod render;
pub mod table;
pub mod text;

// Re-export core types
pub use crate::core::{PipelineConfig, SentimentError, TableSchema};
pub use loaders::ArtifactSource;

// Re-export the pipeline entry points for easier access
pub use pipelines::sentiment_analysis_pipeline::{
    BatchPrediction, SentimentAnalysisPipeline, SentimentAnalysisPipelineBuilder, SentimentResult,
};
