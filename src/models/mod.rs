mod place;
mod review;
mod trip;
mod weather;

pub use place::PlaceDetails;
pub use review::{Review, ReviewSource, Sentiment, SentimentCounts};
pub use trip::{EntityResult, SearchRequest, SearchResponse, TravelInfo};
pub use weather::{DayForecast, WeekendWeather};
