// Pipeline modules organized by functionality
pub mod sentiment_analysis_pipeline;
pub mod utils;

pub use sentiment_analysis_pipeline::*;
