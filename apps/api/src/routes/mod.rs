pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::llm_client::RELAY_PATH;
use crate::relay::handle_relay;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Same-origin relay to the chat-completion endpoint (dev only)
        .route(RELAY_PATH, post(handle_relay))
        .with_state(state)
}
