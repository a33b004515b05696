//! TF-IDF / count vectorizer restored from a fitted vocabulary.
//!
//! The artifact is a JSON document holding the fitted vocabulary plus the
//! options the vectorizer was fit with:
//!
//! ```json
//! {
//!   "vocabulary": { "great": 0, "terrible": 1, "great product": 2 },
//!   "idf": [1.4, 1.9, 2.2],
//!   "ngram_range": [1, 2],
//!   "sublinear_tf": false,
//!   "norm": "l2"
//! }
//! ```
//!
//! Without `idf` the vectorizer produces (optionally normalized) raw counts.

use crate::pipelines::sentiment_analysis_pipeline::model::{FeatureEncoder, FeatureVector};
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    r"(?u)\b\w\w+\b".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk form of a fitted vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

impl VectorizerArtifact {
    /// A unigram TF-IDF artifact with default options.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Option<Vec<f64>>) -> Self {
        Self {
            vocabulary,
            idf,
            lowercase: true,
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            binary: false,
            sublinear_tf: false,
            norm: default_norm(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    artifact: VectorizerArtifact,
    token_regex: Regex,
}

impl TfidfVectorizer {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vectorizer artifact {path:?}"))?;
        let artifact: VectorizerArtifact = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse vectorizer artifact {path:?}"))?;
        let vectorizer = Self::from_artifact(artifact)?;
        tracing::info!(
            path = ?path,
            dimension = vectorizer.dimension(),
            tfidf = vectorizer.artifact.idf.is_some(),
            "loaded vectorizer"
        );
        Ok(vectorizer)
    }

    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self> {
        let dimension = artifact.vocabulary.len();
        if dimension == 0 {
            anyhow::bail!("vectorizer vocabulary is empty");
        }

        let mut seen = HashSet::with_capacity(dimension);
        for (term, &index) in &artifact.vocabulary {
            if index >= dimension {
                anyhow::bail!(
                    "vocabulary index {index} for term `{term}` is outside 0..{dimension}"
                );
            }
            if !seen.insert(index) {
                anyhow::bail!("vocabulary index {index} is assigned to more than one term");
            }
        }

        if let Some(idf) = &artifact.idf {
            if idf.len() != dimension {
                anyhow::bail!(
                    "idf has {} weights but the vocabulary has {dimension} terms",
                    idf.len()
                );
            }
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            anyhow::bail!("invalid ngram_range ({min_n}, {max_n})");
        }

        let token_regex = Regex::new(&artifact.token_pattern)
            .with_context(|| format!("invalid token_pattern `{}`", artifact.token_pattern))?;

        Ok(Self {
            artifact,
            token_regex,
        })
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        // A pattern with a capture group yields the group, as in the fitting tool.
        if self.token_regex.captures_len() > 1 {
            self.token_regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect()
        } else {
            self.token_regex
                .find_iter(text)
                .map(|m| m.as_str())
                .collect()
        }
    }

    fn term_counts(&self, text: &str) -> HashMap<usize, f64> {
        let lowered;
        let text = if self.artifact.lowercase {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };

        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.artifact.ngram_range;
        let mut counts = HashMap::new();

        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&index) = self.artifact.vocabulary.get(&term) {
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }
        counts
    }
}

impl FeatureEncoder for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.artifact.vocabulary.len()
    }

    fn encode(&self, text: &str) -> FeatureVector {
        let mut values = vec![0.0f64; self.dimension()];

        for (index, count) in self.term_counts(text) {
            let mut tf = if self.artifact.binary { 1.0 } else { count };
            if self.artifact.sublinear_tf {
                tf = 1.0 + tf.ln();
            }
            if let Some(idf) = &self.artifact.idf {
                tf *= idf[index];
            }
            values[index] = tf;
        }

        let norm = match self.artifact.norm {
            Some(Norm::L2) => values.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => values.iter().map(|v| v.abs()).sum::<f64>(),
            None => 0.0,
        };
        if norm > 0.0 {
            values.iter_mut().for_each(|v| *v /= norm);
        }

        FeatureVector::new(values.into_iter().map(|v| v as f32).collect())
    }
}
