use serde::{Deserialize, Serialize};

use crate::models::{Review, SentimentCounts, WeekendWeather};

/// Driving distance and duration between two locations, as the distance
/// provider formats them (e.g. "12.4 mi", "25 mins").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TravelInfo {
    pub distance: String,
    pub duration: String,
}

/// Everything gathered for one extracted place entity. Results keep the
/// order in which entities were extracted from the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityResult {
    pub name: String,
    pub reviews: Vec<Review>,
    pub google_sentiment: SentimentCounts,
    pub reddit_sentiment: SentimentCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yelp_sentiment: Option<SentimentCounts>,
    pub positive_summary: String,
    pub negative_summary: String,
    pub weather: Option<WeekendWeather>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub entities: Vec<EntityResult>,
    pub travel_info: Option<TravelInfo>,
    pub gemini_review: Option<String>,
}
