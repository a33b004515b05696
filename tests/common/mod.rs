// Shared fixtures: a tiny vectorizer/classifier pair written to a temp dir.
#![allow(dead_code)]

use review_sentiment::pipelines::sentiment_analysis_pipeline::*;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

pub const VOCABULARY: [&str; 8] = [
    "great", "love", "excellent", "terrible", "awful", "broke", "okay", "product",
];

pub struct Artifacts {
    pub dir: TempDir,
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
}

impl Artifacts {
    pub fn builder(&self) -> SentimentAnalysisPipelineBuilder {
        SentimentAnalysisPipelineBuilder::local(&self.vectorizer, &self.classifier).cpu()
    }

    pub fn pipeline(&self) -> SentimentAnalysisPipeline {
        self.builder().build().expect("fixture artifacts load")
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

/// Three-class model: praise words push towards "positive", complaint words
/// towards "negative", and an empty feature vector lands on "neutral".
pub fn artifacts() -> Artifacts {
    let dir = tempfile::tempdir().unwrap();

    let vocabulary: serde_json::Map<String, serde_json::Value> = VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, term)| (term.to_string(), json!(i)))
        .collect();
    let vectorizer = dir.path().join("vectorizer.json");
    std::fs::write(
        &vectorizer,
        json!({ "vocabulary": vocabulary, "norm": "l2" }).to_string(),
    )
    .unwrap();

    let classifier = dir.path().join("classifier.json");
    std::fs::write(
        &classifier,
        json!({
            "classes": ["negative", "neutral", "positive"],
            "coef": [
                [-2.0, -2.0, -2.0, 3.0, 3.0, 3.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0],
                [3.0, 3.0, 3.0, -2.0, -2.0, -2.0, 0.0, 0.0]
            ],
            "intercept": [0.0, 0.5, 0.0],
            "probability": "softmax"
        })
        .to_string(),
    )
    .unwrap();

    Artifacts {
        dir,
        vectorizer,
        classifier,
    }
}
