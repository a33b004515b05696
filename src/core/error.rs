use thiserror::Error;

/// Errors surfaced to whoever is driving a pipeline.
///
/// Every variant is recoverable: the caller shows the message and waits for
/// the next input. Artifact loading failures are reported through
/// `anyhow::Error` from the builders instead, since they stop startup.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// The interactive input was empty or whitespace only.
    #[error("Please enter a review to analyze.")]
    EmptyInput,

    /// The table has no column at the configured text column index.
    #[error(
        "File must contain at least one column with text (text column {index} requested, table has {columns} column(s))."
    )]
    Schema { index: usize, columns: usize },

    /// The uploaded file could not be parsed as the expected tabular format.
    #[error("could not read {format} file: {reason}")]
    UnreadableFile { format: String, reason: String },

    /// Encoding or classification failed after the artifacts were loaded.
    #[error("inference failed: {0}")]
    Inference(#[from] anyhow::Error),
}

impl SentimentError {
    pub(crate) fn unreadable(format: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        SentimentError::UnreadableFile {
            format: format.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SentimentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_message_matches_prompt() {
        assert_eq!(
            SentimentError::EmptyInput.to_string(),
            "Please enter a review to analyze."
        );
    }

    #[test]
    fn unreadable_carries_underlying_cause() {
        let err = SentimentError::unreadable("csv", "found record with 3 fields");
        assert_eq!(
            err.to_string(),
            "could not read csv file: found record with 3 fields"
        );
    }
}
