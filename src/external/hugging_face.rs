use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::external::provider::{ProviderError, SentimentClassifier, Summarizer};
use crate::models::Sentiment;

const SENTIMENT_URL: &str =
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english";
const SUMMARY_URL: &str = "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

// Above this confidence a Positive/Negative label is promoted to its
// Highly variant.
const HIGH_CONFIDENCE: f64 = 0.9;

/// One client for both inference tasks: binary sentiment (mapped onto the
/// five-category scale) and abstractive summarization.
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    api_key: String,
}

impl HuggingFaceProvider {
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("HUGGINGFACE_API_KEY")
            .map_err(|_| ProviderError::BadResponse("HUGGINGFACE_API_KEY not set".into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }

    async fn post_inference<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::BadResponse(format!(
                "HTTP {}: {}",
                status, detail
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct SentimentRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    inputs: &'a str,
    parameters: SummaryParameters,
}

#[derive(Debug, Serialize)]
struct SummaryParameters {
    min_length: u32,
    max_length: u32,
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

fn map_sentiment(label: &str, score: f64) -> Sentiment {
    match label {
        "POSITIVE" => {
            if score > HIGH_CONFIDENCE {
                Sentiment::HighlyPositive
            } else {
                Sentiment::Positive
            }
        }
        "NEGATIVE" => {
            if score > HIGH_CONFIDENCE {
                Sentiment::HighlyNegative
            } else {
                Sentiment::Negative
            }
        }
        _ => Sentiment::Neutral,
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceProvider {
    async fn classify(&self, text: &str) -> Result<Sentiment, ProviderError> {
        // The model returns one list of label/score pairs per input.
        let scores: Vec<Vec<LabelScore>> = self
            .post_inference(SENTIMENT_URL, &SentimentRequest { inputs: text })
            .await?;

        let top = scores
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| ProviderError::BadResponse("no sentiment labels returned".into()))?;

        Ok(map_sentiment(&top.label, top.score))
    }
}

#[async_trait]
impl Summarizer for HuggingFaceProvider {
    async fn summarize(
        &self,
        text: &str,
        min_length: u32,
        max_length: u32,
    ) -> Result<String, ProviderError> {
        let request = SummaryRequest {
            inputs: text,
            parameters: SummaryParameters {
                min_length,
                max_length,
            },
        };

        let outputs: Vec<SummaryOutput> = self.post_inference(SUMMARY_URL, &request).await?;

        outputs
            .into_iter()
            .next()
            .map(|output| output.summary_text)
            .ok_or_else(|| ProviderError::BadResponse("empty summary response".into()))
    }
}
