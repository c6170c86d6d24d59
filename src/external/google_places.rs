use async_trait::async_trait;
use serde::Deserialize;

use crate::external::provider::{PlaceProvider, ProviderError};
use crate::models::{PlaceDetails, Review, ReviewSource};

const FIND_PLACE_URL: &str = "https://maps.googleapis.com/maps/api/place/findplacefromtext/json";
const DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

// Official reviews are capped so one place cannot dominate the aggregate.
const MAX_REVIEWS: usize = 5;

pub struct GooglePlacesProvider {
    client: reqwest::Client,
    api_key: String,
}

impl GooglePlacesProvider {
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("GOOGLE_MAPS_API_KEY")
            .map_err(|_| ProviderError::BadResponse("GOOGLE_MAPS_API_KEY not set".into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    status: String,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    place_id: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    formatted_address: String,
    rating: Option<f32>,
    website: Option<String>,
    formatted_phone_number: Option<String>,
    #[serde(default)]
    reviews: Vec<GoogleReview>,
}

#[derive(Debug, Deserialize)]
struct GoogleReview {
    text: Option<String>,
    rating: Option<f32>,
    // e.g. "3 weeks ago"; kept verbatim as the review date
    relative_time_description: Option<String>,
    author_name: Option<String>,
}

#[async_trait]
impl PlaceProvider for GooglePlacesProvider {
    async fn find_place(&self, query: &str) -> Result<Option<PlaceDetails>, ProviderError> {
        let found = self
            .client
            .get(FIND_PLACE_URL)
            .query(&[
                ("input", query),
                ("inputtype", "textquery"),
                ("fields", "place_id,name,formatted_address,geometry"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?
            .json::<FindPlaceResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let candidate = match found.status.as_str() {
            "OK" => match found.candidates.into_iter().next() {
                Some(candidate) => candidate,
                None => return Ok(None),
            },
            "ZERO_RESULTS" => return Ok(None),
            other => {
                return Err(ProviderError::BadResponse(format!(
                    "find place status {}",
                    other
                )))
            }
        };

        let details = self
            .client
            .get(DETAILS_URL)
            .query(&[
                ("place_id", candidate.place_id.as_str()),
                (
                    "fields",
                    "name,formatted_address,rating,website,formatted_phone_number,reviews",
                ),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?
            .json::<DetailsResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if details.status != "OK" {
            return Err(ProviderError::BadResponse(format!(
                "place details status {}",
                details.status
            )));
        }

        let result = details
            .result
            .ok_or_else(|| ProviderError::BadResponse("missing place details result".into()))?;

        let reviews = result
            .reviews
            .into_iter()
            .take(MAX_REVIEWS)
            .map(|r| Review {
                source: ReviewSource::Google,
                text: r.text.unwrap_or_default(),
                rating: r.rating,
                date: r.relative_time_description.unwrap_or_default(),
                user: r.author_name,
                sentiment: None,
            })
            .collect();

        Ok(Some(PlaceDetails {
            place_id: candidate.place_id,
            name: result.name,
            formatted_address: result.formatted_address,
            rating: result.rating,
            website: result.website,
            phone: result.formatted_phone_number,
            reviews,
            latitude: candidate.geometry.location.lat,
            longitude: candidate.geometry.location.lng,
        }))
    }
}
