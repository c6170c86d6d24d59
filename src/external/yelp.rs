use async_trait::async_trait;
use serde::Deserialize;

use crate::external::provider::{ProviderError, SocialReviewProvider};
use crate::models::{PlaceDetails, Review, ReviewSource};

const BASE_URL: &str = "https://api.yelp.com/v3";

/// Optional review source; constructed only when `YELP_API_KEY` is set.
pub struct YelpProvider {
    client: reqwest::Client,
    api_key: String,
}

impl YelpProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(format!("{}{}", BASE_URL, path))
            .bearer_auth(&self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::BadResponse(format!(
                "{} returned HTTP {}",
                path,
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct MatchResponse {
    #[serde(default)]
    businesses: Vec<MatchedBusiness>,
}

#[derive(Debug, Deserialize)]
struct MatchedBusiness {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    #[serde(default)]
    reviews: Vec<YelpReview>,
}

#[derive(Debug, Deserialize)]
struct YelpReview {
    text: String,
    rating: Option<f32>,
    time_created: Option<String>,
    user: Option<YelpUser>,
}

#[derive(Debug, Deserialize)]
struct YelpUser {
    name: Option<String>,
}

/// Splits a formatted address into the (street, city, state) pieces the
/// business-match endpoint wants. Missing pieces stay empty.
fn split_address(formatted_address: &str) -> (String, String, String) {
    let parts: Vec<&str> = formatted_address.split(',').map(str::trim).collect();

    let (street, city, state_and_zip) = match parts.as_slice() {
        [street, city, state_and_zip, ..] => (*street, *city, *state_and_zip),
        [city, state_and_zip] => ("", *city, *state_and_zip),
        _ => ("", "", ""),
    };

    let state = state_and_zip
        .split_whitespace()
        .next()
        .unwrap_or_default();

    (street.to_string(), city.to_string(), state.to_string())
}

#[async_trait]
impl SocialReviewProvider for YelpProvider {
    fn source(&self) -> ReviewSource {
        ReviewSource::Yelp
    }

    async fn fetch_reviews(&self, place: &PlaceDetails) -> Result<Vec<Review>, ProviderError> {
        let (street, city, state) = split_address(&place.formatted_address);

        let mut params = vec![
            ("name", place.name.clone()),
            ("country", "US".to_string()),
            ("latitude", place.latitude.to_string()),
            ("longitude", place.longitude.to_string()),
            ("match_threshold", "default".to_string()),
        ];
        // empty parameters are rejected by the match endpoint
        if !street.is_empty() {
            params.push(("address1", street));
        }
        if !city.is_empty() {
            params.push(("city", city));
        }
        if !state.is_empty() {
            params.push(("state", state));
        }

        let matches: MatchResponse = self.get_json("/businesses/matches", &params).await?;

        let business_id = match matches.businesses.into_iter().next() {
            Some(business) => business.id,
            None => return Ok(Vec::new()),
        };

        let reviews: ReviewsResponse = self
            .get_json(&format!("/businesses/{}/reviews", business_id), &[])
            .await?;

        Ok(reviews
            .reviews
            .into_iter()
            .map(|r| Review {
                source: ReviewSource::Yelp,
                text: r.text,
                rating: r.rating,
                date: r.time_created.unwrap_or_default(),
                user: r.user.and_then(|u| u.name),
                sentiment: None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_address_splits_into_street_city_state() {
        let (street, city, state) = split_address("3101 24th St, San Francisco, CA 94110, USA");
        assert_eq!(street, "3101 24th St");
        assert_eq!(city, "San Francisco");
        assert_eq!(state, "CA");
    }

    #[test]
    fn two_part_address_has_no_street() {
        let (street, city, state) = split_address("Pacifica, CA 94044");
        assert_eq!(street, "");
        assert_eq!(city, "Pacifica");
        assert_eq!(state, "CA");
    }

    #[test]
    fn unsplittable_address_stays_empty() {
        let (street, city, state) = split_address("Nowhere");
        assert_eq!(street, "");
        assert_eq!(city, "");
        assert_eq!(state, "");
    }
}
