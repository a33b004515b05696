pub mod cache;
pub mod config;
pub mod error;

pub use cache::{global_cache, ModelCache, ModelOptions};
pub use config::{PipelineConfig, TableSchema, DEFAULT_OUTPUT_PATH, PREDICTION_COLUMN};
pub use error::{Result, SentimentError};
