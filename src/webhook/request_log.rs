use crate::webhook::webhook_error::WebhookError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Method;
use std::convert::Infallible;
use std::fmt::Display;

/// Per-request logging context. Every event logged through it carries the request method and
/// path as structured fields.
#[derive(Debug, Clone)]
pub struct RequestLog {
    method: Method,
    path: String,
}

impl RequestLog {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        RequestLog {
            method,
            path: path.into(),
        }
    }

    pub fn debug(&self, message: impl Display) {
        tracing::debug!(
            request_method = %self.method,
            request_path = %self.path,
            "{message}"
        );
    }

    pub fn error(&self, error: &dyn Display, message: impl Display) {
        tracing::error!(
            request_method = %self.method,
            request_path = %self.path,
            error = %error,
            "{message}"
        );
    }

    /// Log a rejected request and hand the error back for the response. Client errors are
    /// logged at `warn`, server errors at `error`.
    pub fn reject(&self, err: WebhookError, message: &str) -> WebhookError {
        if err.status().is_server_error() {
            self.error(&err, message);
        } else {
            tracing::warn!(
                request_method = %self.method,
                request_path = %self.path,
                error = %err,
                "{message}"
            );
        }
        err
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for RequestLog
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestLog::new(parts.method.clone(), parts.uri.path()))
    }
}
