use std::any::Any;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::errors::AppError;
use crate::routes::{health, pages, search};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(pages::landing))
        .nest("/health", health::router())
        .merge(search::router())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

// A panic anywhere in the pipeline becomes the generic 500 body instead of
// a dropped connection.
fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    AppError::Internal("panic while handling request".to_string()).into_response()
}
