use std::sync::Arc;

use tracing::{debug, warn};

use crate::external::provider::GenerativeProvider;
use crate::services::retry::{call_with_retry, RetryPolicy};

/// Extracts place names from a free-text query via the generative model.
pub struct EntityExtractor {
    generative: Arc<dyn GenerativeProvider>,
    retry: RetryPolicy,
}

impl EntityExtractor {
    pub fn new(generative: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            generative,
            retry: RetryPolicy::default(),
        }
    }

    /// Returns the extracted place names in query order. Anything that
    /// goes wrong — exhausted retries, a fatal provider error, or an
    /// unparseable model response — degrades to an empty list; the caller
    /// decides what an empty extraction means.
    pub async fn extract(&self, query: &str) -> Vec<String> {
        let prompt = extraction_prompt(query);

        let response = call_with_retry(self.retry, || self.generative.generate(&prompt)).await;

        match response {
            Ok(text) => {
                debug!("entity extraction raw response: {}", text);
                parse_entities(&text)
            }
            Err(e) => {
                warn!("entity extraction call failed: {}", e);
                Vec::new()
            }
        }
    }
}

fn extraction_prompt(query: &str) -> String {
    format!(
        "Extract every distinct named place or location from the user query \
below. The user is describing weekend plans.\n\
\n\
User query: '{}'\n\
\n\
Respond with a JSON array of strings, one entry per place name. Do not \
include activity words (like \"hike\", \"lunch\" or \"trip\"), introductory \
text, explanations, or anything outside the JSON array.\n\
\n\
Examples:\n\
\n\
User query: 'Eiffel Tower and Louvre Museum'\n\
[\"Eiffel Tower\", \"Louvre Museum\"]\n\
\n\
User query: 'restaurants in San Francisco'\n\
[\"San Francisco\"]\n\
\n\
User query: 'I want to go to Central Park'\n\
[\"Central Park\"]\n\
\n\
User query: 'I have no plans'\n\
[]\n\
\n\
User query: 'mori point hike and then cheesecake factory for lunch'\n\
[\"Mori Point\", \"Cheesecake Factory\"]\n\
\n\
Begin!",
        query
    )
}

/// Lenient parse of the model output: a JSON array of strings, possibly
/// wrapped in a markdown code fence. Everything else becomes an empty
/// list.
fn parse_entities(response: &str) -> Vec<String> {
    let cleaned = strip_code_fence(response);

    match serde_json::from_str::<serde_json::Value>(cleaned) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(name) => Some(name),
                _ => None,
            })
            .collect(),
        Ok(other) => {
            warn!("entity extraction returned a non-array: {}", other);
            Vec::new()
        }
        Err(e) => {
            warn!("could not parse entity extraction response: {}", e);
            Vec::new()
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}
