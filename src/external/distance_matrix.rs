use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::external::provider::{ProviderError, TravelProvider};
use crate::models::TravelInfo;

const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

pub struct DistanceMatrixProvider {
    client: reqwest::Client,
    api_key: String,
}

impl DistanceMatrixProvider {
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
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

#[async_trait]
impl TravelProvider for DistanceMatrixProvider {
    async fn travel_info(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<Option<TravelInfo>, ProviderError> {
        let origins = format!("{},{}", origin.0, origin.1);
        let destinations = format!("{},{}", destination.0, destination.1);

        let response = self
            .client
            .get(DISTANCE_MATRIX_URL)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("mode", "driving"),
                ("units", "imperial"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?
            .json::<MatrixResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if response.status != "OK" {
            warn!("distance matrix status {}", response.status);
            return Ok(None);
        }

        let element = response
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next());

        let element = match element {
            Some(element) if element.status == "OK" => element,
            Some(element) => {
                warn!("distance matrix element status {}", element.status);
                return Ok(None);
            }
            None => return Ok(None),
        };

        match (element.distance, element.duration) {
            (Some(distance), Some(duration)) => Ok(Some(TravelInfo {
                distance: distance.text,
                duration: duration.text,
            })),
            _ => Err(ProviderError::BadResponse(
                "element missing distance or duration".into(),
            )),
        }
    }
}
