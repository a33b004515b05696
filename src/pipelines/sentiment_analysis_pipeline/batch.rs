use super::model::{FeatureEncoder, SentimentClassifier};
use super::pipeline::{round2, SentimentAnalysisPipeline};
use crate::core::{Result, SentimentError, PREDICTION_COLUMN};
use crate::table::{self, Table, TableFormat};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// One scored input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// The original cell text.
    pub text: String,
    pub label: String,
}

/// Scored rows, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    text_column: String,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// UTF-8 CSV with a header row: the text column's name, then
    /// `Predicted_Sentiment`.
    pub fn to_csv(&self) -> anyhow::Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([self.text_column.as_str(), PREDICTION_COLUMN])?;
        for row in &self.rows {
            writer.write_record([row.text.as_str(), row.label.as_str()])?;
        }
        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to finish results csv: {}", e.error()))
    }
}

/// Share of rows predicted with one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelShare {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

/// How predictions are spread across labels.
///
/// Ordered by descending share; labels with equal counts keep the order in
/// which they first appeared. Only labels that were actually predicted appear.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DistributionSummary {
    shares: Vec<LabelShare>,
}

impl DistributionSummary {
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut order: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for label in labels {
            let label = label.as_ref();
            match index.get(label) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(label, order.len());
                    order.push((label.to_string(), 1));
                }
            }
        }
        order.sort_by(|a, b| b.1.cmp(&a.1));

        let total = labels.len() as f64;
        let shares = order
            .into_iter()
            .map(|(label, count)| LabelShare {
                label,
                count,
                percent: round2(count as f64 / total * 100.0),
            })
            .collect();
        Self { shares }
    }

    pub fn shares(&self) -> &[LabelShare] {
        &self.shares
    }

    pub fn percent(&self, label: &str) -> Option<f64> {
        self.shares
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.percent)
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// Everything the batch path produces for one upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPrediction {
    pub results: ResultTable,
    pub distribution: DistributionSummary,
}

impl<E: FeatureEncoder, C: SentimentClassifier> SentimentAnalysisPipeline<E, C> {
    /// Score every row of `table`.
    ///
    /// The text comes from the schema's text column whatever its name; other
    /// columns are ignored. Rows are scored independently, so chunking and
    /// row order never change an individual prediction. Empty cells are
    /// scored as the text `nan` but written back out as empty fields.
    pub fn predict_batch(&self, table: &Table) -> Result<BatchPrediction> {
        let index = self.schema.text_column_index;
        let cells = table.column(index).ok_or(SentimentError::Schema {
            index,
            columns: table.n_columns(),
        })?;
        let text_column = table.columns()[index].clone();

        let cleaned: Vec<String> = cells
            .iter()
            .map(|cell| self.normalizer.normalize(&cell.as_text()))
            .collect();

        let mut labels = Vec::with_capacity(cleaned.len());
        for chunk in cleaned.chunks(self.batch_size) {
            let features = self.encoder.encode_batch(chunk);
            let probabilities = self.classifier.predict_proba(&features)?;
            if probabilities.len() != chunk.len() {
                return Err(anyhow::anyhow!(
                    "classifier returned {} rows for a chunk of {}",
                    probabilities.len(),
                    chunk.len()
                )
                .into());
            }
            for row in &probabilities {
                let winner = self.winning_class(row)?;
                labels.push(self.classifier.classes()[winner].clone());
            }
        }

        tracing::debug!(
            rows = labels.len(),
            column = %text_column,
            batch_size = self.batch_size,
            "scored table"
        );

        let distribution = DistributionSummary::from_labels(&labels);
        let rows = cells
            .into_iter()
            .zip(labels)
            .map(|(cell, label)| ResultRow {
                text: cell.to_string(),
                label,
            })
            .collect();

        Ok(BatchPrediction {
            results: ResultTable { text_column, rows },
            distribution,
        })
    }

    /// Read a CSV or spreadsheet from disk and score it.
    pub fn predict_file(&self, path: impl AsRef<Path>) -> Result<BatchPrediction> {
        let table = table::read_path(path)?;
        self.predict_batch(&table)
    }

    /// Score an uploaded file given its name (for the format) and contents.
    pub fn predict_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<BatchPrediction> {
        let format = TableFormat::from_name(file_name)?;
        let table = table::read_bytes(format, bytes)?;
        self.predict_batch(&table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_orders_by_share_then_first_seen() {
        let summary =
            DistributionSummary::from_labels(&["neutral", "positive", "negative", "positive", "negative", "positive"]);
        let labels: Vec<&str> = summary.shares().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["positive", "negative", "neutral"]);
        assert_eq!(summary.percent("positive"), Some(50.0));
        assert_eq!(summary.percent("neutral"), Some(16.67));
        assert_eq!(summary.shares()[1].count, 2);

        let total: f64 = summary.shares().iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() <= 0.1);
    }

    #[test]
    fn empty_labels_give_empty_summary() {
        let summary = DistributionSummary::from_labels::<&str>(&[]);
        assert!(summary.is_empty());
    }

    #[test]
    fn results_csv_has_header_and_quotes() {
        let table = ResultTable {
            text_column: "Review".into(),
            rows: vec![
                ResultRow {
                    text: "Nice, sturdy".into(),
                    label: "positive".into(),
                },
                ResultRow {
                    text: "".into(),
                    label: "neutral".into(),
                },
            ],
        };
        let csv = String::from_utf8(table.to_csv().unwrap()).unwrap();
        assert_eq!(
            csv,
            "Review,Predicted_Sentiment\n\"Nice, sturdy\",positive\n,neutral\n"
        );
    }
}
