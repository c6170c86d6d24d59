use serde::{Deserialize, Serialize};

/// Where a review was fetched from. Google reviews are the official block
/// and always come first in an aggregated list; Reddit and Yelp are
/// supplementary community sources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReviewSource {
    Google,
    Reddit,
    Yelp,
}

impl std::fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewSource::Google => write!(f, "Google"),
            ReviewSource::Reddit => write!(f, "Reddit"),
            ReviewSource::Yelp => write!(f, "Yelp"),
        }
    }
}

/// Sentiment classification for a single review text.
///
/// Wire names keep the space-separated form ("Highly Positive") that the
/// frontend consumes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sentiment {
    #[serde(rename = "Highly Positive")]
    HighlyPositive,
    Positive,
    Neutral,
    Negative,
    #[serde(rename = "Highly Negative")]
    HighlyNegative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::HighlyPositive => write!(f, "Highly Positive"),
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Negative => write!(f, "Negative"),
            Sentiment::HighlyNegative => write!(f, "Highly Negative"),
        }
    }
}

/// A single place review. Created by a source-specific provider with
/// `sentiment: None`; the aggregator attaches the classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub source: ReviewSource,
    pub text: String,
    pub rating: Option<f32>,
    pub date: String,
    pub user: Option<String>,
    pub sentiment: Option<Sentiment>,
}

/// Per-category tallies for one review source. Zero-initialized; each
/// classified review increments exactly one counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentimentCounts {
    #[serde(rename = "Highly Positive")]
    pub highly_positive: u32,
    #[serde(rename = "Positive")]
    pub positive: u32,
    #[serde(rename = "Neutral")]
    pub neutral: u32,
    #[serde(rename = "Negative")]
    pub negative: u32,
    #[serde(rename = "Highly Negative")]
    pub highly_negative: u32,
}

impl SentimentCounts {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::HighlyPositive => self.highly_positive += 1,
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::HighlyNegative => self.highly_negative += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.highly_positive + self.positive + self.neutral + self.negative + self.highly_negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_wire_names_keep_spaces() {
        let json = serde_json::to_string(&Sentiment::HighlyPositive).unwrap();
        assert_eq!(json, "\"Highly Positive\"");

        let parsed: Sentiment = serde_json::from_str("\"Highly Negative\"").unwrap();
        assert_eq!(parsed, Sentiment::HighlyNegative);
    }

    #[test]
    fn counts_record_and_total() {
        let mut counts = SentimentCounts::default();
        assert_eq!(counts.total(), 0);

        counts.record(Sentiment::Positive);
        counts.record(Sentiment::Positive);
        counts.record(Sentiment::HighlyNegative);

        assert_eq!(counts.positive, 2);
        assert_eq!(counts.highly_negative, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn counts_serialize_with_category_keys() {
        let mut counts = SentimentCounts::default();
        counts.record(Sentiment::Neutral);

        let value = serde_json::to_value(&counts).unwrap();
        assert_eq!(value["Neutral"], 1);
        assert_eq!(value["Highly Positive"], 0);
    }
}
