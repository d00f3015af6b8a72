//! Route modules.

pub mod health;
pub mod session;
pub mod transport;

use axum::Router;

use crate::state::AppState;

/// The full route tree, shared by the binary and the integration tests.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/session", session::router())
        .nest("/api/v1/transport", transport::router())
}
