//! Linear sentiment classifier restored from exported weights.
//!
//! Covers the usual exports of a logistic-regression or multinomial naive
//! Bayes model: one coefficient row per class (or a single row for a binary
//! model) plus an intercept. The JSON artifact looks like
//!
//! ```json
//! {
//!   "classes": ["negative", "neutral", "positive"],
//!   "coef": [[-1.2, 0.3], [0.1, 0.0], [1.4, -0.2]],
//!   "intercept": [0.0, -0.4, 0.1],
//!   "probability": "softmax"
//! }
//! ```

use crate::pipelines::sentiment_analysis_pipeline::model::{FeatureVector, SentimentClassifier};
use anyhow::{Context, Result};
use candle_core::{Device, Tensor, D};
use candle_nn::ops::{sigmoid, softmax};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// How class scores become probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityModel {
    /// Softmax over all class scores (multinomial models).
    #[default]
    Softmax,
    /// Independent sigmoid per class, rows renormalized to sum to one.
    OneVsRest,
}

/// On-disk form of a trained linear classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub classes: Vec<String>,
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
    #[serde(default)]
    pub probability: ProbabilityModel,
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<String>,
    /// Transposed coefficients, `[n_features, n_rows]`.
    coef_t: Tensor,
    intercept: Tensor,
    probability: ProbabilityModel,
    binary: bool,
    n_features: usize,
    device: Device,
    span: tracing::Span,
}

impl LinearClassifier {
    pub fn load(path: impl AsRef<Path>, device: Device) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read classifier artifact {path:?}"))?;
        let artifact: ClassifierArtifact = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse classifier artifact {path:?}"))?;
        let classifier = Self::from_artifact(artifact, device)?;
        tracing::info!(
            path = ?path,
            classes = ?classifier.classes,
            n_features = classifier.n_features,
            "loaded classifier"
        );
        Ok(classifier)
    }

    pub fn from_artifact(artifact: ClassifierArtifact, device: Device) -> Result<Self> {
        let ClassifierArtifact {
            classes,
            coef,
            intercept,
            probability,
        } = artifact;

        if classes.len() < 2 {
            anyhow::bail!("classifier needs at least two classes, got {}", classes.len());
        }
        let unique: HashSet<&String> = classes.iter().collect();
        if unique.len() != classes.len() {
            anyhow::bail!("classifier classes contain duplicates: {classes:?}");
        }

        let rows = coef.len();
        let binary = rows == 1 && classes.len() == 2;
        if !binary && rows != classes.len() {
            anyhow::bail!(
                "classifier has {rows} coefficient rows for {} classes",
                classes.len()
            );
        }
        if intercept.len() != rows {
            anyhow::bail!(
                "classifier has {} intercepts for {rows} coefficient rows",
                intercept.len()
            );
        }

        let n_features = coef[0].len();
        if n_features == 0 {
            anyhow::bail!("classifier coefficient rows are empty");
        }
        if let Some((i, row)) = coef.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            anyhow::bail!(
                "coefficient row {i} has {} weights, expected {n_features}",
                row.len()
            );
        }
        if coef.iter().flatten().chain(&intercept).any(|w| !w.is_finite()) {
            anyhow::bail!("classifier weights contain non-finite values");
        }

        let flat: Vec<f32> = coef.into_iter().flatten().collect();
        let coef_t = Tensor::from_vec(flat, (rows, n_features), &device)?
            .t()?
            .contiguous()?;
        let intercept = Tensor::from_vec(intercept, rows, &device)?;

        Ok(Self {
            classes,
            coef_t,
            intercept,
            probability,
            binary,
            n_features,
            device,
            span: tracing::span!(tracing::Level::TRACE, "linear-classifier"),
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn probability_model(&self) -> ProbabilityModel {
        self.probability
    }

    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let scores = xs.matmul(&self.coef_t)?.broadcast_add(&self.intercept)?;

        if self.binary {
            let positive = sigmoid(&scores)?;
            let negative = positive.affine(-1.0, 1.0)?;
            return Tensor::cat(&[&negative, &positive], 1);
        }

        match self.probability {
            ProbabilityModel::Softmax => softmax(&scores, D::Minus1),
            ProbabilityModel::OneVsRest => {
                let probs = sigmoid(&scores)?;
                let totals = probs.sum_keepdim(D::Minus1)?;
                probs.broadcast_div(&totals)
            }
        }
    }
}

impl SentimentClassifier for LinearClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[FeatureVector]) -> Result<Vec<Vec<f32>>> {
        let _enter = self.span.enter();
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let mut flat = Vec::with_capacity(features.len() * self.n_features);
        for (row, feature) in features.iter().enumerate() {
            if feature.len() != self.n_features {
                anyhow::bail!(
                    "feature vector {row} has dimension {}, classifier expects {}",
                    feature.len(),
                    self.n_features
                );
            }
            flat.extend_from_slice(feature.as_slice());
        }

        let xs = Tensor::from_vec(flat, (features.len(), self.n_features), &self.device)?;
        let probs = self.forward(&xs)?;
        Ok(probs.to_vec2::<f32>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(classes: &[&str], coef: Vec<Vec<f32>>, intercept: Vec<f32>) -> ClassifierArtifact {
        ClassifierArtifact {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            coef,
            intercept,
            probability: ProbabilityModel::Softmax,
        }
    }

    fn fv(values: &[f32]) -> FeatureVector {
        FeatureVector::new(values.to_vec())
    }

    #[test]
    fn softmax_rows_sum_to_one_and_follow_scores() -> Result<()> {
        let clf = LinearClassifier::from_artifact(
            artifact(
                &["negative", "neutral", "positive"],
                vec![vec![-2.0, 2.0], vec![0.0, 0.0], vec![2.0, -2.0]],
                vec![0.0, 0.0, 0.0],
            ),
            Device::Cpu,
        )?;

        let probs = clf.predict_proba(&[fv(&[1.0, 0.0]), fv(&[0.0, 1.0]), fv(&[0.0, 0.0])])?;
        assert_eq!(probs.len(), 3);
        for row in &probs {
            assert!((row.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
        assert!(probs[0][2] > probs[0][0]);
        assert!(probs[1][0] > probs[1][2]);
        // Zero features: uniform because intercepts are equal.
        assert!((probs[2][0] - 1.0 / 3.0).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn binary_model_expands_to_two_columns() -> Result<()> {
        let clf = LinearClassifier::from_artifact(
            artifact(&["negative", "positive"], vec![vec![3.0]], vec![0.0]),
            Device::Cpu,
        )?;

        let probs = clf.predict_proba(&[fv(&[0.0]), fv(&[1.0])])?;
        assert!((probs[0][0] - 0.5).abs() < 1e-6);
        assert!((probs[0][1] - 0.5).abs() < 1e-6);
        let expected = 1.0 / (1.0 + (-3.0f32).exp());
        assert!((probs[1][1] - expected).abs() < 1e-5);
        assert!((probs[1][0] + probs[1][1] - 1.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn one_vs_rest_rows_are_renormalized() -> Result<()> {
        let mut a = artifact(
            &["a", "b", "c"],
            vec![vec![1.0], vec![0.0], vec![-1.0]],
            vec![0.0, 0.0, 0.0],
        );
        a.probability = ProbabilityModel::OneVsRest;
        let clf = LinearClassifier::from_artifact(a, Device::Cpu)?;

        let probs = clf.predict_proba(&[fv(&[2.0])])?;
        let s = |x: f32| 1.0 / (1.0 + (-x).exp());
        let total = s(2.0) + s(0.0) + s(-2.0);
        assert!((probs[0][0] - s(2.0) / total).abs() < 1e-5);
        assert!((probs[0].iter().sum::<f32>() - 1.0).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn rejects_wrong_feature_dimension() -> Result<()> {
        let clf = LinearClassifier::from_artifact(
            artifact(&["neg", "pos"], vec![vec![1.0, 1.0]], vec![0.0]),
            Device::Cpu,
        )?;
        assert!(clf.predict_proba(&[fv(&[1.0])]).is_err());
        assert!(clf.predict_proba(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn rejects_inconsistent_artifacts() {
        let one_class = artifact(&["pos"], vec![vec![1.0]], vec![0.0]);
        assert!(LinearClassifier::from_artifact(one_class, Device::Cpu).is_err());

        let rows_mismatch = artifact(&["a", "b", "c"], vec![vec![1.0], vec![1.0]], vec![0.0, 0.0]);
        assert!(LinearClassifier::from_artifact(rows_mismatch, Device::Cpu).is_err());

        let ragged = artifact(&["a", "b"], vec![vec![1.0, 2.0], vec![1.0]], vec![0.0, 0.0]);
        assert!(LinearClassifier::from_artifact(ragged, Device::Cpu).is_err());

        let duplicate = artifact(&["a", "a"], vec![vec![1.0]], vec![0.0]);
        assert!(LinearClassifier::from_artifact(duplicate, Device::Cpu).is_err());

        let nan = artifact(&["a", "b"], vec![vec![f32::NAN]], vec![0.0]);
        assert!(LinearClassifier::from_artifact(nan, Device::Cpu).is_err());
    }

    #[test]
    fn probability_model_parses_from_json() {
        let json = r#"{ "classes": ["neg", "pos"], "coef": [[0.5]], "intercept": [0.1], "probability": "one_vs_rest" }"#;
        let a: ClassifierArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(a.probability, ProbabilityModel::OneVsRest);

        let json = r#"{ "classes": ["neg", "pos"], "coef": [[0.5]], "intercept": [0.1] }"#;
        let a: ClassifierArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(a.probability, ProbabilityModel::Softmax);
    }
}
