//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::require_auth};

pub mod health;
pub mod movements;
pub mod reports;

/// Assembles the API router: a public health check plus the ledger and
/// report routes behind bearer auth.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(movements::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().merge(health::routes()).merge(protected)
}
