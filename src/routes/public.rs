use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Probe Router
///
/// Monitoring endpoints. Merged outside the gateway layer, so they answer
/// regardless of session state.
pub fn probe_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(handlers::health))
}

/// Public Router Module
///
/// Pages any visitor may open. The sign-in pages live here too: the gateway lets
/// anonymous visitors in and sends signed-in users to the landing page.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| handlers::page("Home")))
        .route("/about", get(|| handlers::page("About")))
        // Auth-only pages.
        .route("/login", get(|| handlers::page("Log in")))
        .route("/sign-up", get(|| handlers::page("Sign up")))
        .route("/reset-password", get(|| handlers::page("Reset password")))
}
