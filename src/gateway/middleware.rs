use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::Decision;
use crate::{GatewayState, session::RequestDescriptor};

/// enforce_access
///
/// Runs the gateway in front of the page routes. Allowed requests continue to the
/// handler; everything else receives a `307 Temporary Redirect` to the decided
/// path. Cookie values never reach the logs.
pub async fn enforce_access(
    State(gateway): State<GatewayState>,
    request: Request,
    next: Next,
) -> Response {
    let descriptor = RequestDescriptor::from_parts(request.uri().path(), request.headers());
    let class = gateway.rules().classify(&descriptor.path);

    match gateway.evaluate(&descriptor) {
        Decision::Allow => {
            tracing::debug!(path = %descriptor.path, class = class.as_str(), "access allowed");
            next.run(request).await
        }
        Decision::RedirectTo(target) => {
            tracing::info!(
                path = %descriptor.path,
                class = class.as_str(),
                target = %target,
                "access redirected"
            );
            Redirect::temporary(&target).into_response()
        }
    }
}
