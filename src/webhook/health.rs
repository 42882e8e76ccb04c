use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

pub const HEALTH_PATH: &str = "/health";

/// Answer liveness probes before any routing or header validation happens. Every other request
/// is passed through untouched.
pub async fn health<B>(request: Request<B>, next: Next<B>) -> Response {
    if request.uri().path() == HEALTH_PATH {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}
