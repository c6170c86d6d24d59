mod app;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::external::distance_matrix::DistanceMatrixProvider;
use crate::external::gemini::GeminiProvider;
use crate::external::google_places::GooglePlacesProvider;
use crate::external::hugging_face::HuggingFaceProvider;
use crate::external::open_weather::OpenWeatherProvider;
use crate::external::provider::SocialReviewProvider;
use crate::external::reddit::RedditProvider;
use crate::external::yelp::YelpProvider;
use crate::services::trip_service::TripPlanner;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let places = Arc::new(GooglePlacesProvider::from_env()?);
    let travel = Arc::new(DistanceMatrixProvider::from_env()?);
    let weather = Arc::new(OpenWeatherProvider::from_env()?);
    let generative = Arc::new(GeminiProvider::from_env()?);
    let reddit = Arc::new(RedditProvider::from_env());

    // one inference client backs both NLP seams
    let nlp = Arc::new(HuggingFaceProvider::from_env()?);

    let yelp: Option<Arc<dyn SocialReviewProvider>> = match std::env::var("YELP_API_KEY") {
        Ok(key) if !key.is_empty() => {
            tracing::info!("📊 Yelp review source enabled");
            Some(Arc::new(YelpProvider::new(key)))
        }
        _ => {
            tracing::info!("Yelp review source disabled (YELP_API_KEY not set)");
            None
        }
    };

    let planner = TripPlanner::new(
        places,
        reddit,
        yelp,
        weather,
        travel,
        nlp.clone(),
        nlp,
        generative,
    );

    let state = AppState {
        planner: Arc::new(planner),
    };
    let app = app::create_app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Weekender backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
