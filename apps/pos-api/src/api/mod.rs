//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Create all API routes nested under `/api` by the server setup
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/products", products::router(state))
}
