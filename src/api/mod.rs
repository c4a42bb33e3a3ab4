pub mod auth;
pub mod tasks;

use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::db::UserStore;

/// Shared handler state: the store client and the bot token used for login checks.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub bot_token: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, bot_token: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            bot_token: bot_token.into(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(auth::routes())
        .merge(tasks::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
