use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Practice pages for any signed-in user: dashboard, live session, calendar,
/// clients, notes and intake forms. The gateway redirects visitors without a
/// session token to the login page before these handlers run, and prefix
/// matching covers every sub-path.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(|| handlers::page("Dashboard")))
        .route("/dashboard/{*rest}", get(|| handlers::page("Dashboard")))
        // The session currently in progress with a client.
        .route("/current-session", get(|| handlers::page("Current session")))
        .route("/calendar", get(|| handlers::page("Calendar")))
        .route("/clients", get(|| handlers::page("Clients")))
        .route("/clients/{*rest}", get(|| handlers::page("Client")))
        .route("/session-notes", get(|| handlers::page("Session notes")))
        .route("/intake-forms", get(|| handlers::page("Intake forms")))
        .route("/profile", get(|| handlers::page("Profile")))
}
