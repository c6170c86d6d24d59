use serde::{Deserialize, Serialize};

use crate::models::Review;

/// Resolved place details from the place-lookup provider. Carries up to
/// five official reviews already tagged with their source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub formatted_address: String,
    pub rating: Option<f32>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub reviews: Vec<Review>,
    pub latitude: f64,
    pub longitude: f64,
}
