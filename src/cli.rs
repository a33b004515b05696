use clap::{Parser, Subcommand};
use review_sentiment::{ArtifactSource, PipelineConfig};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long, env = "SENTIMENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Vectorizer artifact (local path or hf://owner/repo/file)
    #[arg(long, env = "SENTIMENT_VECTORIZER")]
    pub vectorizer: Option<ArtifactSource>,

    /// Classifier artifact (local path or hf://owner/repo/file)
    #[arg(long, env = "SENTIMENT_CLASSIFIER")]
    pub classifier: Option<ArtifactSource>,

    /// Stopword list, one token per line
    #[arg(long, env = "SENTIMENT_STOPWORDS")]
    pub stopwords: Option<PathBuf>,

    /// Index of the column holding review text in uploaded tables
    #[arg(long)]
    pub text_column: Option<usize>,

    /// Rows scored per chunk in batch mode
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: Option<u64>,

    /// Run the classifier on CPU even if CUDA is available
    #[arg(long)]
    pub cpu: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Score a single review (read from stdin when TEXT is omitted)
    Analyze { text: Option<String> },

    /// Score every row of a .csv or .xlsx file and write the results as CSV
    Batch {
        file: PathBuf,

        /// Where to write the results [default: sentiment_results.csv]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score reviews line by line; `:upload FILE` runs a batch, `:quit` exits
    Interactive,
}

impl Cli {
    /// Merge the config file (if any) with command-line overrides.
    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(vectorizer) = &self.vectorizer {
            config.vectorizer = Some(vectorizer.clone());
        }
        if let Some(classifier) = &self.classifier {
            config.classifier = Some(classifier.clone());
        }
        if let Some(stopwords) = &self.stopwords {
            config.stopwords = Some(stopwords.clone());
        }
        if let Some(index) = self.text_column {
            config.text_column_index = index;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = usize::try_from(batch_size)?;
        }
        if let Command::Batch {
            output: Some(output),
            ..
        } = &self.command
        {
            config.output_path = output.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "review-sentiment",
            "--vectorizer",
            "vec.json",
            "--classifier",
            "hf://acme/reviews/clf.json",
            "--text-column",
            "2",
            "batch",
            "reviews.csv",
            "--output",
            "out.csv",
        ])
        .unwrap();

        let config = cli.pipeline_config().unwrap();
        assert_eq!(
            config.vectorizer,
            Some(ArtifactSource::Local(PathBuf::from("vec.json")))
        );
        assert!(matches!(config.classifier, Some(ArtifactSource::Hub { .. })));
        assert_eq!(config.text_column_index, 2);
        assert_eq!(config.output_path, PathBuf::from("out.csv"));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let parsed = Cli::try_parse_from(["review-sentiment", "--batch-size", "0", "interactive"]);
        assert!(parsed.is_err());
    }
}
