use super::model::{FeatureEncoder, SentimentClassifier};
use crate::core::{Result, SentimentError, TableSchema};
use crate::models::{LinearClassifier, TfidfVectorizer};
use crate::text::TextNormalizer;
use serde::Serialize;
use std::sync::Arc;

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Probability of one label, as a percentage rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub percent: f64,
}

/// Outcome of scoring one review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    /// Label with the highest probability.
    pub label: String,
    /// The text the vectorizer actually saw.
    pub cleaned_text: String,
    /// Every label the classifier knows, in the classifier's order.
    pub scores: Vec<LabelScore>,
}

impl SentimentResult {
    /// Percentage of the winning label.
    pub fn confidence(&self) -> f64 {
        self.score(&self.label).unwrap_or(0.0)
    }

    pub fn score(&self, label: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.percent)
    }
}

/// A ready-to-use pipeline: normalizer, vectorizer and classifier.
///
/// Build one with [`SentimentAnalysisPipelineBuilder`](super::SentimentAnalysisPipelineBuilder)
/// or assemble it from already loaded artifacts with [`new`](Self::new).
/// The artifacts are shared read-only, so a pipeline can be cloned cheaply
/// for every session.
///
/// ```rust,no_run
/// use review_sentiment::pipelines::sentiment_analysis_pipeline::*;
///
/// # fn run() -> anyhow::Result<()> {
/// let pipeline =
///     SentimentAnalysisPipelineBuilder::local("artifacts/vectorizer.json", "artifacts/classifier.json")
///         .cpu()
///         .build()?;
///
/// let result = pipeline.predict("Arrived quickly and works great")?;
/// println!("{} ({:.2}%)", result.label, result.confidence());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SentimentAnalysisPipeline<E = TfidfVectorizer, C = LinearClassifier>
where
    E: FeatureEncoder,
    C: SentimentClassifier,
{
    pub(crate) normalizer: TextNormalizer,
    pub(crate) encoder: Arc<E>,
    pub(crate) classifier: Arc<C>,
    pub(crate) schema: TableSchema,
    pub(crate) batch_size: usize,
}

impl<E: FeatureEncoder, C: SentimentClassifier> Clone for SentimentAnalysisPipeline<E, C> {
    fn clone(&self) -> Self {
        Self {
            normalizer: self.normalizer.clone(),
            encoder: Arc::clone(&self.encoder),
            classifier: Arc::clone(&self.classifier),
            schema: self.schema,
            batch_size: self.batch_size,
        }
    }
}

impl<E: FeatureEncoder, C: SentimentClassifier> SentimentAnalysisPipeline<E, C> {
    pub const DEFAULT_BATCH_SIZE: usize = 256;

    /// Assemble a pipeline, checking that the encoder and classifier come
    /// from the same training run.
    pub fn new(normalizer: TextNormalizer, encoder: Arc<E>, classifier: Arc<C>) -> anyhow::Result<Self> {
        if encoder.dimension() != classifier.n_features() {
            anyhow::bail!(
                "vectorizer produces {} features but the classifier expects {}",
                encoder.dimension(),
                classifier.n_features()
            );
        }
        Ok(Self {
            normalizer,
            encoder,
            classifier,
            schema: TableSchema::default(),
            batch_size: Self::DEFAULT_BATCH_SIZE,
        })
    }

    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Rows scored per chunk in the batch path. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn schema(&self) -> TableSchema {
        self.schema
    }

    /// Labels reported by the classifier.
    pub fn labels(&self) -> &[String] {
        self.classifier.classes()
    }

    /// Score a single review.
    ///
    /// Empty or whitespace-only input is rejected with
    /// [`SentimentError::EmptyInput`] before anything is encoded.
    pub fn predict(&self, raw: &str) -> Result<SentimentResult> {
        if raw.trim().is_empty() {
            return Err(SentimentError::EmptyInput);
        }

        let cleaned_text = self.normalizer.normalize(raw);
        let features = self.encoder.encode(&cleaned_text);
        let probabilities = self
            .classifier
            .predict_proba(std::slice::from_ref(&features))?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("classifier returned no probabilities"))?;

        let winner = self.winning_class(&probabilities)?;
        let scores = self
            .classifier
            .classes()
            .iter()
            .zip(&probabilities)
            .map(|(label, &p)| LabelScore {
                label: label.clone(),
                percent: round2(p as f64 * 100.0),
            })
            .collect();

        Ok(SentimentResult {
            label: self.classifier.classes()[winner].clone(),
            cleaned_text,
            scores,
        })
    }

    /// Index of the most probable class; the first one wins ties.
    pub(crate) fn winning_class(&self, probabilities: &[f32]) -> Result<usize> {
        let classes = self.classifier.classes().len();
        if probabilities.len() != classes {
            return Err(anyhow::anyhow!(
                "classifier returned {} probabilities for {classes} classes",
                probabilities.len()
            )
            .into());
        }

        let mut best = 0;
        for (i, &p) in probabilities.iter().enumerate().skip(1) {
            if p > probabilities[best] {
                best = i;
            }
        }
        Ok(best)
    }
}
