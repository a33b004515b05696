use super::pipeline::SentimentAnalysisPipeline;
use crate::core::{global_cache, ModelOptions, PipelineConfig, TableSchema};
use crate::loaders::ArtifactSource;
use crate::models::{LinearClassifier, TfidfVectorizer};
use crate::pipelines::utils::{build_cache_key, DeviceRequest, DeviceSelectable};
use crate::text::{StopwordSet, TextNormalizer};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for configuring and constructing a [`SentimentAnalysisPipeline`].
///
/// Start with `new(vectorizer, classifier)` or `local(..)`, then chain optional settings:
/// - `.stopwords(PathBuf)`: Replace the built-in English stopword list.
/// - `.text_column(usize)`: Column of uploaded tables that holds the review text.
/// - `.batch_size(usize)`: Rows scored per chunk in the batch path.
/// - `.cpu()` / `.cuda_device(i)` / `.device(d)`: Where the classifier runs.
///
/// Finally, call `.build()`. Artifacts are loaded through the global cache, so
/// building a second pipeline from the same files reuses the loaded instances.
#[derive(Debug)]
pub struct SentimentAnalysisPipelineBuilder {
    vectorizer: ArtifactSource,
    classifier: ArtifactSource,
    stopwords: Option<PathBuf>,
    schema: TableSchema,
    batch_size: usize,
    device_request: DeviceRequest,
}

impl SentimentAnalysisPipelineBuilder {
    pub fn new(vectorizer: ArtifactSource, classifier: ArtifactSource) -> Self {
        Self {
            vectorizer,
            classifier,
            stopwords: None,
            schema: TableSchema::default(),
            batch_size: SentimentAnalysisPipeline::<TfidfVectorizer, LinearClassifier>::DEFAULT_BATCH_SIZE,
            device_request: DeviceRequest::Default,
        }
    }

    /// Builder for artifacts on local disk.
    pub fn local(vectorizer: impl Into<PathBuf>, classifier: impl Into<PathBuf>) -> Self {
        Self::new(
            ArtifactSource::Local(vectorizer.into()),
            ArtifactSource::Local(classifier.into()),
        )
    }

    /// Builder seeded from a startup configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let vectorizer = config
            .vectorizer
            .clone()
            .context("no vectorizer artifact configured")?;
        let classifier = config
            .classifier
            .clone()
            .context("no classifier artifact configured")?;

        let mut builder = Self::new(vectorizer, classifier)
            .text_column(config.text_column_index)
            .batch_size(config.batch_size);
        if let Some(path) = &config.stopwords {
            builder = builder.stopwords(path);
        }
        Ok(builder)
    }

    pub fn stopwords(mut self, path: impl Into<PathBuf>) -> Self {
        self.stopwords = Some(path.into());
        self
    }

    pub fn text_column(mut self, index: usize) -> Self {
        self.schema = TableSchema {
            text_column_index: index,
        };
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Loads (or reuses) the artifacts and assembles the pipeline.
    ///
    /// Fails if either artifact is missing, corrupt, or the two do not agree
    /// on the feature dimension.
    pub fn build(self) -> Result<SentimentAnalysisPipeline> {
        let device = self.device_request.resolve()?;

        let vectorizer_source = self.vectorizer;
        let encoder = global_cache()
            .get_or_create(&vectorizer_source.cache_key(), || {
                TfidfVectorizer::load(vectorizer_source.resolve()?)
            })
            .with_context(|| format!("Failed to load vectorizer from {vectorizer_source}"))?;

        let classifier_source = self.classifier;
        let key = build_cache_key(&classifier_source, &device);
        let classifier = global_cache()
            .get_or_create(&key, || {
                LinearClassifier::load(classifier_source.resolve()?, device.clone())
            })
            .with_context(|| format!("Failed to load classifier from {classifier_source}"))?;

        let stopwords = match &self.stopwords {
            Some(path) => Arc::new(StopwordSet::from_file(path)?),
            None => StopwordSet::english(),
        };

        let pipeline =
            SentimentAnalysisPipeline::new(TextNormalizer::new(stopwords), encoder, classifier)?
                .with_schema(self.schema)
                .with_batch_size(self.batch_size);

        tracing::info!(
            labels = ?pipeline.labels(),
            text_column = self.schema.text_column_index,
            "sentiment pipeline ready"
        );
        Ok(pipeline)
    }
}

impl DeviceSelectable for SentimentAnalysisPipelineBuilder {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}
