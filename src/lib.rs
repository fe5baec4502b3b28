use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};

use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod config;
pub mod gateway;
pub mod handlers;
pub mod session;

// Page routers, split by the access tier the gateway enforces on them.
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::{AppConfig, ConfigError};
pub use gateway::{Decision, Gateway, RouteClass, RouteRules};
pub use session::{RequestDescriptor, RoleClaim, SessionClaim, SessionCookies};

/// GatewayState
///
/// The gateway shared by every request. It is immutable, so an `Arc` is enough.
pub type GatewayState = Arc<Gateway>;

/// AppState
///
/// The single, immutable container shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Access gateway built from the loaded configuration at startup.
    pub gateway: GatewayState,
}

impl AppState {
    /// Builds the gateway from the configuration's route tables and cookie names.
    pub fn new(config: AppConfig) -> Self {
        let gateway = Gateway::new(config.rules, config.cookies);
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for GatewayState {
    fn from_ref(app_state: &AppState) -> GatewayState {
        app_state.gateway.clone()
    }
}

/// create_router
///
/// Assembles the page routers behind the access gateway, then wraps everything in
/// the request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // Every page goes through the gateway. Unknown paths hit the fallback after
    // being allowed, so they still get a decision first.
    let pages = Router::new()
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .merge(admin::admin_routes())
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gateway::middleware::enforce_access,
        ));

    let base_router = Router::new()
        // Probes stay outside the gateway so they are never redirected.
        .merge(public::probe_routes())
        .merge(pages)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span, tagged with the `x-request-id` set above so every
/// gateway decision log line can be correlated with its request.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
