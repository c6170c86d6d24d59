use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::external::provider::{
    GenerativeProvider, PlaceProvider, SentimentClassifier, SocialReviewProvider, Summarizer,
    TravelProvider, WeatherProvider,
};
use crate::models::{EntityResult, ReviewSource, SearchResponse, TravelInfo};
use crate::services::entity_service::EntityExtractor;
use crate::services::retry::{call_with_retry, RetryPolicy};
use crate::services::review_service;
use crate::services::summary_service::{self, SummaryCategory};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("no places identified in the query")]
    NoEntitiesFound,
}

/// Sequences one trip-planning request: entity extraction, then per-entity
/// place/review/weather lookups, then travel info and the narrative.
///
/// Entities are independent units of work — a failed place lookup skips
/// that entity, and every other upstream failure degrades its own field
/// instead of aborting the request.
pub struct TripPlanner {
    places: Arc<dyn PlaceProvider>,
    reddit: Arc<dyn SocialReviewProvider>,
    yelp: Option<Arc<dyn SocialReviewProvider>>,
    weather: Arc<dyn WeatherProvider>,
    travel: Arc<dyn TravelProvider>,
    classifier: Arc<dyn SentimentClassifier>,
    summarizer: Arc<dyn Summarizer>,
    generative: Arc<dyn GenerativeProvider>,
    extractor: EntityExtractor,
    retry: RetryPolicy,
}

impl TripPlanner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        places: Arc<dyn PlaceProvider>,
        reddit: Arc<dyn SocialReviewProvider>,
        yelp: Option<Arc<dyn SocialReviewProvider>>,
        weather: Arc<dyn WeatherProvider>,
        travel: Arc<dyn TravelProvider>,
        classifier: Arc<dyn SentimentClassifier>,
        summarizer: Arc<dyn Summarizer>,
        generative: Arc<dyn GenerativeProvider>,
    ) -> Self {
        let extractor = EntityExtractor::new(generative.clone());

        Self {
            places,
            reddit,
            yelp,
            weather,
            travel,
            classifier,
            summarizer,
            generative,
            extractor,
            retry: RetryPolicy::default(),
        }
    }

    pub async fn plan(&self, query: &str) -> Result<SearchResponse, PlanError> {
        let entities = self.extractor.extract(query).await;
        info!("extracted {} place entities", entities.len());

        if entities.is_empty() {
            return Err(PlanError::NoEntitiesFound);
        }

        let mut results = Vec::new();
        for entity in &entities {
            match self.build_entity(entity).await {
                Some(result) => results.push(result),
                None => warn!("no place details for '{}', skipping", entity),
            }
        }

        // Travel info covers the first pair only, even when the query
        // yields three or more stops.
        let travel_info = if results.len() >= 2 {
            let origin = (results[0].latitude, results[0].longitude);
            let destination = (results[1].latitude, results[1].longitude);
            match self.travel.travel_info(origin, destination).await {
                Ok(info) => info,
                Err(e) => {
                    warn!("travel lookup failed: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let gemini_review = self.generate_narrative(&results, travel_info.as_ref()).await;

        Ok(SearchResponse {
            entities: results,
            travel_info,
            gemini_review,
        })
    }

    async fn build_entity(&self, entity: &str) -> Option<EntityResult> {
        let place = match self.places.find_place(entity).await {
            Ok(Some(place)) => place,
            Ok(None) => return None,
            Err(e) => {
                warn!("place lookup failed for '{}': {}", entity, e);
                return None;
            }
        };

        // official reviews first, community sources after
        let mut batches = vec![(ReviewSource::Google, place.reviews.clone())];

        let mut socials = vec![&self.reddit];
        if let Some(yelp) = &self.yelp {
            socials.push(yelp);
        }

        for social in socials {
            let source = social.source();
            match social.fetch_reviews(&place).await {
                Ok(reviews) => batches.push((source, reviews)),
                Err(e) => {
                    warn!("{} review fetch failed for '{}': {}", source, place.name, e);
                    batches.push((source, Vec::new()));
                }
            }
        }

        let aggregated =
            review_service::aggregate_and_classify(batches, self.classifier.as_ref()).await;

        let positive_summary = summary_service::summarize_by_category(
            &aggregated.reviews,
            SummaryCategory::Positive,
            self.summarizer.as_ref(),
        )
        .await;
        let negative_summary = summary_service::summarize_by_category(
            &aggregated.reviews,
            SummaryCategory::Negative,
            self.summarizer.as_ref(),
        )
        .await;

        let weather = match self
            .weather
            .weekend_forecast(place.latitude, place.longitude)
            .await
        {
            Ok(weather) => Some(weather),
            Err(e) => {
                warn!("weather lookup failed for '{}': {}", place.name, e);
                None
            }
        };

        let mut counts = aggregated.counts_by_source;
        Some(EntityResult {
            name: place.name,
            reviews: aggregated.reviews,
            google_sentiment: counts.remove(&ReviewSource::Google).unwrap_or_default(),
            reddit_sentiment: counts.remove(&ReviewSource::Reddit).unwrap_or_default(),
            yelp_sentiment: counts.remove(&ReviewSource::Yelp),
            positive_summary,
            negative_summary,
            weather,
            latitude: place.latitude,
            longitude: place.longitude,
        })
    }

    async fn generate_narrative(
        &self,
        entities: &[EntityResult],
        travel_info: Option<&TravelInfo>,
    ) -> Option<String> {
        let prompt = narrative_prompt(entities, travel_info);

        match call_with_retry(self.retry, || self.generative.generate(&prompt)).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("trip narrative generation failed: {}", e);
                None
            }
        }
    }
}

fn narrative_prompt(entities: &[EntityResult], travel_info: Option<&TravelInfo>) -> String {
    let mut prompt = String::from(
        "You are an expert travel planner who writes concise, informative \
weekend trip reviews.\n\
\n\
Analyze the information below and write a short, helpful review of the \
user's proposed weekend trip. Judge the feasibility and overall quality \
of the plan using the review summaries, the weather, and (when present) \
the travel time between stops.\n\
\n\
**Here is the information you MUST use:**\n",
    );

    for (index, entity) in entities.iter().enumerate() {
        prompt.push_str(&format!("\n**Destination {}: {}**\n", index + 1, entity.name));

        prompt.push_str("\n*Review summary (positive):*\n");
        prompt.push_str(&entity.positive_summary);
        prompt.push_str("\n\n*Review summary (negative):*\n");
        prompt.push_str(&entity.negative_summary);

        prompt.push_str("\n\n*Weekend weather forecast:*\n");
        match &entity.weather {
            Some(weather) if !weather.is_empty() => {
                for (day, forecast) in [
                    ("Saturday", weather.saturday.as_ref()),
                    ("Sunday", weather.sunday.as_ref()),
                ] {
                    if let Some(forecast) = forecast {
                        prompt.push_str(&format!(
                            "- {}: Date: {}, Temperature: {}°F, Description: {}\n",
                            day, forecast.date, forecast.temperature, forecast.description
                        ));
                    }
                }
            }
            _ => prompt.push_str("- No weather data available.\n"),
        }
    }

    if entities.len() > 1 {
        match travel_info {
            Some(info) => {
                prompt.push_str(&format!(
                    "\n**Travel information (between {} and {}):**\n- Distance: {}\n- Duration: {}\n",
                    entities[0].name, entities[1].name, info.distance, info.duration
                ));
            }
            None => {
                prompt.push_str(
                    "\n**Travel information:** not available for these destinations; \
please make sure they are close together.\n",
                );
            }
        }
    }

    prompt.push_str(
        "\n**Your task:**\n\
\n\
1. **Catchy one-liner:** first, a single short sentence capturing the \
overall rating of the weekend plan.\n\
2. **Overall assessment:** is the plan feasible, too rushed, or well \
balanced?\n\
3. **Pros and cons:** the most significant pros and cons, synthesized \
from the summaries and weather rather than repeated verbatim.\n\
4. **Recommendations (optional):** brief, specific improvements if any \
come to mind.\n\
5. **Travel practicality:** if travel information is present, comment on \
how practical the hop between stops is.\n\
6. **Rating:** an overall rating out of 5 stars, kept realistic.\n",
    );

    prompt
}
