use std::collections::BTreeMap;

use tracing::warn;

use crate::external::provider::SentimentClassifier;
use crate::models::{Review, ReviewSource, SentimentCounts};

/// The merged review list plus per-source sentiment tallies for one place.
#[derive(Debug)]
pub struct AggregatedReviews {
    pub reviews: Vec<Review>,
    pub counts_by_source: BTreeMap<ReviewSource, SentimentCounts>,
}

/// Merges per-source review batches into one list and classifies each
/// review exactly once.
///
/// Batch order is meaningful: official reviews come first, community
/// sources after, and each batch keeps its provider's internal order. A
/// review whose classification fails stays in the output with
/// `sentiment: None` and is excluded from the tallies, so per-source
/// totals always equal the number of classified reviews from that source.
pub async fn aggregate_and_classify(
    batches: Vec<(ReviewSource, Vec<Review>)>,
    classifier: &dyn SentimentClassifier,
) -> AggregatedReviews {
    let mut reviews = Vec::new();
    let mut counts_by_source = BTreeMap::new();

    for (source, batch) in batches {
        let counts: &mut SentimentCounts = counts_by_source.entry(source).or_default();

        for mut review in batch {
            match classifier.classify(&review.text).await {
                Ok(sentiment) => {
                    review.sentiment = Some(sentiment);
                    counts.record(sentiment);
                }
                Err(e) => {
                    warn!("sentiment classification failed for a {} review: {}", source, e);
                }
            }
            reviews.push(review);
        }
    }

    AggregatedReviews {
        reviews,
        counts_by_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::external::provider::ProviderError;
    use crate::models::Sentiment;

    struct KeywordClassifier {
        calls: AtomicU32,
    }

    impl KeywordClassifier {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl SentimentClassifier for KeywordClassifier {
        async fn classify(&self, text: &str) -> Result<Sentiment, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let sentiment = if text.contains("amazing") {
                Sentiment::HighlyPositive
            } else if text.contains("nice") {
                Sentiment::Positive
            } else if text.contains("awful") {
                Sentiment::HighlyNegative
            } else if text.contains("slow") {
                Sentiment::Negative
            } else {
                Sentiment::Neutral
            };
            Ok(sentiment)
        }
    }

    struct BrokenClassifier;

    #[async_trait]
    impl SentimentClassifier for BrokenClassifier {
        async fn classify(&self, _text: &str) -> Result<Sentiment, ProviderError> {
            Err(ProviderError::Network("classifier down".into()))
        }
    }

    fn review(source: ReviewSource, text: &str) -> Review {
        Review {
            source,
            text: text.to_string(),
            rating: None,
            date: "2026-08-01".to_string(),
            user: None,
            sentiment: None,
        }
    }

    #[tokio::test]
    async fn merges_batches_in_source_order() {
        let classifier = KeywordClassifier::new();
        let batches = vec![
            (
                ReviewSource::Google,
                vec![
                    review(ReviewSource::Google, "amazing trail"),
                    review(ReviewSource::Google, "nice views"),
                ],
            ),
            (
                ReviewSource::Reddit,
                vec![review(ReviewSource::Reddit, "service was slow")],
            ),
        ];

        let aggregated = aggregate_and_classify(batches, &classifier).await;

        assert_eq!(aggregated.reviews.len(), 3);
        assert_eq!(aggregated.reviews[0].source, ReviewSource::Google);
        assert_eq!(aggregated.reviews[0].text, "amazing trail");
        assert_eq!(aggregated.reviews[1].text, "nice views");
        assert_eq!(aggregated.reviews[2].source, ReviewSource::Reddit);
    }

    #[tokio::test]
    async fn classifies_each_review_exactly_once() {
        let classifier = KeywordClassifier::new();
        let batches = vec![
            (
                ReviewSource::Google,
                vec![
                    review(ReviewSource::Google, "amazing"),
                    review(ReviewSource::Google, "whatever"),
                ],
            ),
            (
                ReviewSource::Reddit,
                vec![
                    review(ReviewSource::Reddit, "awful"),
                    review(ReviewSource::Reddit, "nice"),
                ],
            ),
        ];

        let aggregated = aggregate_and_classify(batches, &classifier).await;

        assert_eq!(classifier.calls.load(Ordering::SeqCst), 4);
        assert!(aggregated.reviews.iter().all(|r| r.sentiment.is_some()));
    }

    #[tokio::test]
    async fn per_source_counts_total_classified_reviews() {
        let classifier = KeywordClassifier::new();
        let batches = vec![
            (
                ReviewSource::Google,
                vec![
                    review(ReviewSource::Google, "amazing"),
                    review(ReviewSource::Google, "nice"),
                    review(ReviewSource::Google, "meh"),
                ],
            ),
            (
                ReviewSource::Reddit,
                vec![
                    review(ReviewSource::Reddit, "slow"),
                    review(ReviewSource::Reddit, "awful"),
                ],
            ),
        ];

        let aggregated = aggregate_and_classify(batches, &classifier).await;

        let google = &aggregated.counts_by_source[&ReviewSource::Google];
        assert_eq!(google.highly_positive, 1);
        assert_eq!(google.positive, 1);
        assert_eq!(google.neutral, 1);
        assert_eq!(google.total(), 3);

        let reddit = &aggregated.counts_by_source[&ReviewSource::Reddit];
        assert_eq!(reddit.negative, 1);
        assert_eq!(reddit.highly_negative, 1);
        assert_eq!(reddit.total(), 2);
    }

    #[tokio::test]
    async fn empty_batches_still_produce_zeroed_counts() {
        let classifier = KeywordClassifier::new();
        let batches = vec![
            (ReviewSource::Google, Vec::new()),
            (ReviewSource::Reddit, Vec::new()),
        ];

        let aggregated = aggregate_and_classify(batches, &classifier).await;

        assert!(aggregated.reviews.is_empty());
        assert_eq!(aggregated.counts_by_source[&ReviewSource::Google].total(), 0);
        assert_eq!(aggregated.counts_by_source[&ReviewSource::Reddit].total(), 0);
    }

    #[tokio::test]
    async fn classification_failure_keeps_review_but_skips_count() {
        let batches = vec![(
            ReviewSource::Google,
            vec![review(ReviewSource::Google, "anything")],
        )];

        let aggregated = aggregate_and_classify(batches, &BrokenClassifier).await;

        assert_eq!(aggregated.reviews.len(), 1);
        assert!(aggregated.reviews[0].sentiment.is_none());
        assert_eq!(aggregated.counts_by_source[&ReviewSource::Google].total(), 0);
    }
}
