use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};

// --- Handlers ---

// The real pages are rendered by the frontend. These stand-ins only confirm that
// a request made it past the gateway.

/// health
///
/// Liveness probe for load balancers. Mounted outside the gateway.
pub async fn health() -> &'static str {
    "ok"
}

/// page
///
/// Placeholder body for a page the gateway let through.
pub async fn page(title: &'static str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><title>{title}</title></head><body><h1>{title}</h1></body></html>"
    ))
}

/// not_found
///
/// Fallback for paths with no page. Only reached once the gateway has allowed the request.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html("<h1>Not Found</h1>"))
}
