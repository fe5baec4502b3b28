use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Practice administration: the service catalogue and invoicing. The gateway only
/// lets a request through when the profile cookie carries the admin role id;
/// anyone else, including users whose cookie cannot be read, lands on the dashboard.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(|| handlers::page("Services")))
        .route("/invoice", get(|| handlers::page("Invoice")))
}
