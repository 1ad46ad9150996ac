//! Typed errors surfaced at the recommender boundary.

use thiserror::Error;

/// Errors returned by [`RecommenderBuilder::build`](crate::recommend::RecommenderBuilder::build)
/// and [`Recommender::recommend`](crate::recommend::Recommender::recommend).
///
/// All variants are recoverable: callers render them as user-facing
/// messages (CLI) or error bodies (HTTP).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    /// The query title has no case-insensitive match in the corpus.
    #[error("Sorry, the movie \"{query}\" was not found in the database.")]
    NotFound { query: String },

    /// `top_n` was zero.
    #[error("invalid top_n: must be a positive integer")]
    InvalidTopN,

    /// The corpus handed to the builder had no items.
    #[error("corpus is empty: nothing to recommend from")]
    EmptyCorpus,

    /// No term survived stop-word removal and the document-frequency cutoff.
    #[error("vocabulary is empty: no term appears in at least {min_df} descriptions")]
    EmptyVocabulary { min_df: usize },

    /// A build observer stopped the similarity computation.
    #[error("similarity build cancelled")]
    Cancelled,
}

impl RecommendError {
    /// Machine-readable code used in CLI JSON output and HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RecommendError::NotFound { .. } => "not_found",
            RecommendError::InvalidTopN => "bad_request",
            RecommendError::EmptyCorpus | RecommendError::EmptyVocabulary { .. } => "empty_corpus",
            RecommendError::Cancelled => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_carries_query() {
        let err = RecommendError::NotFound {
            query: "Nonexistent Title".to_string(),
        };
        assert!(err.to_string().contains("\"Nonexistent Title\""));
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn empty_kinds_share_code() {
        assert_eq!(RecommendError::EmptyCorpus.code(), "empty_corpus");
        assert_eq!(
            RecommendError::EmptyVocabulary { min_df: 3 }.code(),
            "empty_corpus"
        );
    }
}
