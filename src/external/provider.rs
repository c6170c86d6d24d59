use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PlaceDetails, Review, ReviewSource, Sentiment, TravelInfo, WeekendWeather};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Resolves a free-text query to one place with details and up to five
/// official reviews. A query that matches nothing is `Ok(None)`, not an
/// error.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    async fn find_place(&self, query: &str) -> Result<Option<PlaceDetails>, ProviderError>;
}

/// Fetches supplementary community reviews for a resolved place.
#[async_trait]
pub trait SocialReviewProvider: Send + Sync {
    fn source(&self) -> ReviewSource;

    async fn fetch_reviews(&self, place: &PlaceDetails) -> Result<Vec<Review>, ProviderError>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Forecast for the upcoming Saturday and Sunday at the given
    /// coordinates. Days the upstream forecast does not cover are left
    /// absent.
    async fn weekend_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeekendWeather, ProviderError>;
}

#[async_trait]
pub trait TravelProvider: Send + Sync {
    /// Driving distance and duration between two (lat, lon) pairs.
    /// `Ok(None)` when the upstream cannot route the pair.
    async fn travel_info(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<Option<TravelInfo>, ProviderError>;
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment, ProviderError>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Condenses `text` into a summary bounded by `min_length` and
    /// `max_length` (units defined by the implementation, e.g. tokens).
    async fn summarize(
        &self,
        text: &str,
        min_length: u32,
        max_length: u32,
    ) -> Result<String, ProviderError>;
}

/// Freeform text generation. The only provider whose rate-limit signal
/// (`ProviderError::RateLimited`) is retried by callers.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
