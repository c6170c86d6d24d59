use tracing::warn;

use crate::external::provider::Summarizer;
use crate::models::{Review, Sentiment};

// Length bounds handed to the summarization model, in its own units.
pub const SUMMARY_MIN_LENGTH: u32 = 30;
pub const SUMMARY_MAX_LENGTH: u32 = 130;

/// Which sentiment polarity a summary covers. Neutral reviews belong to
/// neither bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryCategory {
    Positive,
    Negative,
}

impl SummaryCategory {
    fn matches(self, sentiment: Sentiment) -> bool {
        match self {
            SummaryCategory::Positive => {
                matches!(sentiment, Sentiment::Positive | Sentiment::HighlyPositive)
            }
            SummaryCategory::Negative => {
                matches!(sentiment, Sentiment::Negative | Sentiment::HighlyNegative)
            }
        }
    }
}

impl std::fmt::Display for SummaryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryCategory::Positive => write!(f, "Positive"),
            SummaryCategory::Negative => write!(f, "Negative"),
        }
    }
}

/// Condenses the reviews matching `category` into one summary string.
///
/// Always returns displayable text: when there is nothing to summarize or
/// the summarizer fails, a fixed sentinel takes the summary's place. The
/// summary is supplementary content, so failures degrade instead of
/// propagating.
pub async fn summarize_by_category(
    reviews: &[Review],
    category: SummaryCategory,
    summarizer: &dyn Summarizer,
) -> String {
    if reviews.is_empty() {
        return "no reviews available to summarize.".to_string();
    }

    let relevant: Vec<&str> = reviews
        .iter()
        .filter(|review| review.sentiment.is_some_and(|s| category.matches(s)))
        .map(|review| review.text.as_str())
        .collect();

    if relevant.is_empty() {
        return format!("no {} reviews to summarize.", category);
    }

    let combined = relevant.join(" ");

    match summarizer
        .summarize(&combined, SUMMARY_MIN_LENGTH, SUMMARY_MAX_LENGTH)
        .await
    {
        Ok(summary) => summary,
        Err(e) => {
            warn!("summarization of {} reviews failed: {}", category, e);
            format!("error generating {} summary", category)
        }
    }
}
