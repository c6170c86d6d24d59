use std::sync::Arc;

use crate::services::trip_service::TripPlanner;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
}
