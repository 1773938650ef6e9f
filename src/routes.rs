use axum::{http::header, Router};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router.
///
/// Every method and path goes through the one resolver handler; the `Server`
/// header is stamped on every response, errors included.
pub fn router(state: AppState) -> Router {
    let server = state.server_header.clone();

    Router::new()
        .fallback(handlers::handle_file)
        .layer(SetResponseHeaderLayer::overriding(header::SERVER, server))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
