use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;

use crate::external::provider::{ProviderError, SocialReviewProvider};
use crate::models::{PlaceDetails, Review, ReviewSource};

const BASE_URL: &str = "https://www.reddit.com";
const DEFAULT_USER_AGENT: &str = "weekender-backend/0.1";

// A comment only counts as a review when it reads like one.
const REVIEW_KEYWORDS: &[&str] = &["visited", "recommend", "experience", "good", "bad", "review"];
const MIN_COMMENT_WORDS: usize = 6;

const MAX_REVIEWS: usize = 5;
const MAX_COMMENTS_PER_POST: usize = 5;
const MAX_POSTS_PER_SEARCH: u32 = 5;

pub struct RedditProvider {
    client: reqwest::Client,
    user_agent: String,
}

impl RedditProvider {
    pub fn from_env() -> Self {
        let user_agent =
            std::env::var("REDDIT_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        Self {
            client: reqwest::Client::new(),
            user_agent,
        }
    }

    async fn search_posts(
        &self,
        subreddit: &str,
        place_name: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/r/{}/search.json", BASE_URL, subreddit);
        let query = format!("\"{}\"", place_name);
        let limit = MAX_POSTS_PER_SEARCH.to_string();

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .query(&[
                ("q", query.as_str()),
                ("restrict_sr", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::BadResponse(format!(
                "subreddit search returned HTTP {}",
                response.status()
            )));
        }

        let listing = response
            .json::<Listing<SearchPost>>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.permalink)
            .collect())
    }

    async fn fetch_comments(&self, permalink: &str) -> Result<Vec<RedditComment>, ProviderError> {
        let url = format!("{}{}.json", BASE_URL, permalink.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::BadResponse(format!(
                "comment listing returned HTTP {}",
                response.status()
            )));
        }

        // A thread endpoint returns [post listing, comment listing].
        let listings = response
            .json::<Vec<Listing<CommentThing>>>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let comments = listings
            .into_iter()
            .nth(1)
            .map(|listing| listing.data.children)
            .unwrap_or_default()
            .into_iter()
            .filter(|thing| thing.kind == "t1")
            .map(|thing| thing.data)
            .collect();

        Ok(comments)
    }
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    #[serde(default = "Vec::new")]
    children: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchPost {
    data: SearchPostData,
}

#[derive(Debug, Deserialize)]
struct SearchPostData {
    permalink: String,
}

#[derive(Debug, Deserialize)]
struct CommentThing {
    #[serde(default)]
    kind: String,
    data: RedditComment,
}

#[derive(Debug, Deserialize)]
struct RedditComment {
    #[serde(default)]
    body: String,
    created_utc: Option<f64>,
    author: Option<String>,
}

fn looks_like_review(body: &str) -> bool {
    let lower = body.to_lowercase();
    REVIEW_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
        && body.split_whitespace().count() >= MIN_COMMENT_WORDS
}

fn format_timestamp(created_utc: Option<f64>) -> String {
    created_utc
        .and_then(|ts| DateTime::from_timestamp(ts as i64, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Subreddits worth searching for a given place: the travel subreddit, the
/// place's city, the place itself, and category subreddits inferred from
/// the place name. Sorted and deduplicated for a stable search order.
fn candidate_subreddits(place_name: &str, place_address: &str) -> Vec<String> {
    let mut subreddits = vec!["travel".to_string()];

    let parts: Vec<&str> = place_address.split(',').collect();
    if parts.len() > 1 {
        let city = parts[parts.len() - 2].trim();
        if !city.is_empty() {
            subreddits.push(city.replace(' ', "").to_lowercase());
        }
    }

    if !place_name.is_empty() {
        subreddits.push(place_name.replace(' ', "").to_lowercase());
    }

    let lower_name = place_name.to_lowercase();
    if ["restaurant", "food", "cafe"]
        .iter()
        .any(|k| lower_name.contains(k))
    {
        subreddits.extend(["food", "restaurants", "eats"].map(String::from));
    }
    if lower_name.contains("museum") {
        subreddits.extend(["museums", "art", "history"].map(String::from));
    }
    if lower_name.contains("park") {
        subreddits.extend(["parks", "outdoors"].map(String::from));
    }

    subreddits.sort();
    subreddits.dedup();
    subreddits
}

#[async_trait]
impl SocialReviewProvider for RedditProvider {
    fn source(&self) -> ReviewSource {
        ReviewSource::Reddit
    }

    async fn fetch_reviews(&self, place: &PlaceDetails) -> Result<Vec<Review>, ProviderError> {
        let mut reviews: Vec<Review> = Vec::new();

        'subreddits: for subreddit in candidate_subreddits(&place.name, &place.formatted_address) {
            let permalinks = match self.search_posts(&subreddit, &place.name).await {
                Ok(permalinks) => permalinks,
                Err(e) => {
                    // A single missing or private subreddit should not
                    // sink the whole fetch.
                    warn!("search in r/{} failed: {}", subreddit, e);
                    continue;
                }
            };

            for permalink in permalinks {
                let comments = match self.fetch_comments(&permalink).await {
                    Ok(comments) => comments,
                    Err(e) => {
                        warn!("comment fetch for {} failed: {}", permalink, e);
                        continue;
                    }
                };

                let mut taken_from_post = 0;
                for comment in comments {
                    if !looks_like_review(&comment.body) {
                        continue;
                    }

                    reviews.push(Review {
                        source: ReviewSource::Reddit,
                        text: comment.body,
                        rating: None,
                        date: format_timestamp(comment.created_utc),
                        user: Some(comment.author.unwrap_or_else(|| "[deleted]".to_string())),
                        sentiment: None,
                    });

                    taken_from_post += 1;
                    if taken_from_post >= MAX_COMMENTS_PER_POST || reviews.len() >= MAX_REVIEWS {
                        break;
                    }
                }

                if reviews.len() >= MAX_REVIEWS {
                    break 'subreddits;
                }
            }
        }

        Ok(reviews)
    }
}
