//! Text reports for predictions, rendered with minijinja templates.
//!
//! Badges are presentation only: `positive` and `negative` get their own
//! badge, every other label the classifier reports is shown as neutral.

use crate::pipelines::sentiment_analysis_pipeline::{DistributionSummary, SentimentResult};
use minijinja::{context, Environment};
use serde::Serialize;
use std::fmt::Display;

const PREDICTION_TEMPLATE: &str = "\
{{ badge }} Sentiment: {{ label }} {{ emoji }}

Prediction Confidence (%):
{%- for score in scores %}
  {{ score.label }}: {{ score.percent }}
{%- endfor %}
";

const DISTRIBUTION_TEMPLATE: &str = "\
✅ Sentiment analysis complete ({{ rows }} rows).

Sentiment Distribution:
{%- for share in shares %}
  {{ share.label }}: {{ share.percent }}% ({{ share.count }})
{%- endfor %}
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn for_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" => Tone::Positive,
            "negative" => Tone::Negative,
            _ => Tone::Neutral,
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Tone::Positive => "✅",
            Tone::Negative => "❌",
            Tone::Neutral => "😐",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Tone::Positive => "😊",
            Tone::Negative => "😠",
            Tone::Neutral => "😐",
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Serialize)]
struct Row {
    label: String,
    percent: String,
    count: usize,
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> anyhow::Result<Self> {
        let mut env = Environment::new();
        env.add_template("prediction", PREDICTION_TEMPLATE)?;
        env.add_template("distribution", DISTRIBUTION_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn prediction(&self, result: &SentimentResult) -> anyhow::Result<String> {
        let tone = Tone::for_label(&result.label);
        let scores: Vec<Row> = result
            .scores
            .iter()
            .map(|s| Row {
                label: s.label.clone(),
                percent: format!("{:.2}", s.percent),
                count: 0,
            })
            .collect();

        let rendered = self.env.get_template("prediction")?.render(context! {
            badge => tone.badge(),
            emoji => tone.emoji(),
            label => capitalize(&result.label),
            scores => scores,
        })?;
        Ok(rendered)
    }

    pub fn distribution(&self, summary: &DistributionSummary, rows: usize) -> anyhow::Result<String> {
        let shares: Vec<Row> = summary
            .shares()
            .iter()
            .map(|s| Row {
                label: s.label.clone(),
                percent: format!("{:.2}", s.percent),
                count: s.count,
            })
            .collect();

        let rendered = self.env.get_template("distribution")?.render(context! {
            rows => rows,
            shares => shares,
        })?;
        Ok(rendered)
    }
}

pub fn warning(message: impl Display) -> String {
    format!("⚠️ {message}")
}

pub fn error(err: impl Display) -> String {
    format!("⚠️ Error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::sentiment_analysis_pipeline::LabelScore;

    fn result(label: &str) -> SentimentResult {
        SentimentResult {
            label: label.to_string(),
            cleaned_text: "works great".to_string(),
            scores: vec![
                LabelScore {
                    label: "negative".into(),
                    percent: 10.5,
                },
                LabelScore {
                    label: label.into(),
                    percent: 89.5,
                },
            ],
        }
    }

    #[test]
    fn prediction_report_lists_every_label() {
        let renderer = Renderer::new().unwrap();
        let out = renderer.prediction(&result("positive")).unwrap();

        assert!(out.starts_with("✅ Sentiment: Positive 😊"));
        assert!(out.contains("Prediction Confidence (%):"));
        assert!(out.contains("  negative: 10.50"));
        assert!(out.contains("  positive: 89.50"));
    }

    #[test]
    fn unknown_labels_use_the_neutral_badge() {
        let renderer = Renderer::new().unwrap();
        let out = renderer.prediction(&result("mixed")).unwrap();
        assert!(out.starts_with("😐 Sentiment: Mixed 😐"));
        assert_eq!(Tone::for_label("Negative"), Tone::Negative);
    }

    #[test]
    fn distribution_report_shows_percent_and_counts() {
        let renderer = Renderer::new().unwrap();
        let summary = DistributionSummary::from_labels(&["positive", "negative", "positive"]);
        let out = renderer.distribution(&summary, 3).unwrap();

        assert!(out.contains("(3 rows)"));
        assert!(out.contains("  positive: 66.67% (2)"));
        assert!(out.contains("  negative: 33.33% (1)"));
    }

    #[test]
    fn messages_are_prefixed() {
        assert_eq!(error("bad file"), "⚠️ Error: bad file");
        assert_eq!(
            warning("Please enter a review to analyze."),
            "⚠️ Please enter a review to analyze."
        );
    }
}
