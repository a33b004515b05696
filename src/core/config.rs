use crate::loaders::ArtifactSource;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default file name offered for batch results.
pub const DEFAULT_OUTPUT_PATH: &str = "sentiment_results.csv";

/// Name of the predicted label column in batch results.
pub const PREDICTION_COLUMN: &str = "Predicted_Sentiment";

/// Which column of an uploaded table holds the review text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TableSchema {
    pub text_column_index: usize,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            text_column_index: 0,
        }
    }
}

/// Startup configuration, read from a JSON file and overridden by CLI flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub vectorizer: Option<ArtifactSource>,
    pub classifier: Option<ArtifactSource>,
    /// One stopword per line; the built-in English list when absent.
    pub stopwords: Option<PathBuf>,
    pub text_column_index: usize,
    /// Rows encoded and classified per chunk in the batch path.
    pub batch_size: usize,
    pub output_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vectorizer: None,
            classifier: None,
            stopwords: None,
            text_column_index: 0,
            batch_size: 256,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path:?}"))?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {path:?}"))?;
        if config.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }
        Ok(config)
    }

    pub fn schema(&self) -> TableSchema {
        TableSchema {
            text_column_index: self.text_column_index,
        }
    }
}
