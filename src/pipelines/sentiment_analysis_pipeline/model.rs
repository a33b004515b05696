/// Fixed-length numeric representation of one cleaned text.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

/// Maps cleaned text to feature vectors of a fixed dimension.
pub trait FeatureEncoder {
    fn dimension(&self) -> usize;

    fn encode(&self, text: &str) -> FeatureVector;

    /// Encode several texts. Must equal calling [`encode`](Self::encode) on each.
    fn encode_batch(&self, texts: &[String]) -> Vec<FeatureVector> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

/// Maps feature vectors to a probability distribution over the classifier's labels.
pub trait SentimentClassifier {
    /// Labels in the order probabilities are reported.
    fn classes(&self) -> &[String];

    /// Dimension of the feature vectors this classifier accepts.
    fn n_features(&self) -> usize;

    /// One probability row per input, each aligned with [`classes`](Self::classes).
    fn predict_proba(&self, features: &[FeatureVector]) -> anyhow::Result<Vec<Vec<f32>>>;
}
