use crate::webhook::headers::HeaderKind;
use crate::webhook::media_type::UnsupportedMediaType;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub(crate) const TEXT_PLAIN: &str = "text/plain";

/// WebhookError enumerates the ways a webhook request can fail. Each variant maps to exactly one
/// response; client errors carry their message as a plaintext body, server errors carry none.
#[derive(thiserror::Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum WebhookError {
    /// The request lacks a required `Content-Type` or `Accept` header.
    #[error("client must provide {}", .0.with_article())]
    MissingHeader(HeaderKind),

    /// The `Content-Type` or `Accept` header names no supported protocol version.
    #[error("client must provide a valid versioned media type in the {0}: {1}")]
    UnsupportedMediaType(HeaderKind, #[source] UnsupportedMediaType),

    /// The request body isn't the expected JSON document.
    #[error("{context}: {source}")]
    Decode {
        context: &'static str,
        source: serde_json::Error,
    },

    /// The request body couldn't be received.
    #[error("failed to read request body: {0}")]
    ReadBody(#[source] hyper::Error),

    /// The provider call failed or didn't finish in time.
    #[error("provider failure: {0}")]
    Provider(anyhow::Error),

    /// A provider result couldn't be serialized.
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MissingHeader(_) => StatusCode::NOT_ACCEPTABLE,
            WebhookError::UnsupportedMediaType(..) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            WebhookError::Decode { .. } | WebhookError::ReadBody(_) => StatusCode::BAD_REQUEST,
            WebhookError::Provider(_) | WebhookError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            WebhookError::Provider(_) => (status, [(CONTENT_TYPE, TEXT_PLAIN)]).into_response(),
            WebhookError::Encode(_) => status.into_response(),
            _ => (status, [(CONTENT_TYPE, TEXT_PLAIN)], self.to_string()).into_response(),
        }
    }
}
