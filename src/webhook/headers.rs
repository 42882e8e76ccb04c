use crate::webhook::media_type::{MediaType, MediaTypes};
use crate::webhook::webhook_error::WebhookError;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName};
use std::fmt;

/// The request headers that carry a versioned media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Required on requests with a body.
    ContentType,
    /// Required on requests expecting a body.
    Accept,
}

impl HeaderKind {
    /// The HTTP header carrying this kind of media type.
    pub fn header_name(self) -> HeaderName {
        match self {
            HeaderKind::ContentType => CONTENT_TYPE,
            HeaderKind::Accept => ACCEPT,
        }
    }

    pub(crate) fn with_article(self) -> &'static str {
        match self {
            HeaderKind::ContentType => "a content type",
            HeaderKind::Accept => "an accept header",
        }
    }
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeaderKind::ContentType => "content type",
            HeaderKind::Accept => "accept header",
        })
    }
}

/// Require `kind` to name a supported versioned media type and return it.
///
/// # Errors
///
/// Returns [`WebhookError::MissingHeader`] when the header is absent or empty, and
/// [`WebhookError::UnsupportedMediaType`] when its value doesn't negotiate.
pub fn check_header(
    kind: HeaderKind,
    headers: &HeaderMap,
    media_types: &MediaTypes,
) -> Result<MediaType, WebhookError> {
    let value = headers
        .get(kind.header_name())
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .unwrap_or_default();
    if value.is_empty() {
        return Err(WebhookError::MissingHeader(kind));
    }
    media_types
        .negotiate(&value)
        .map(MediaType::versioned)
        .map_err(|err| WebhookError::UnsupportedMediaType(kind, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const V1: &str = "application/external.dns.webhook+json;version=1";

    fn headers(name: HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn accepts_supported_media_type() {
        let media_type = check_header(
            HeaderKind::Accept,
            &headers(ACCEPT, V1),
            &MediaTypes::default(),
        )
        .unwrap();
        assert_eq!(media_type.as_str(), V1);
    }

    #[test]
    fn missing_and_empty_headers_are_missing() {
        for headers in [HeaderMap::new(), headers(CONTENT_TYPE, "")] {
            let err = check_header(HeaderKind::ContentType, &headers, &MediaTypes::default())
                .unwrap_err();
            assert!(matches!(
                err,
                WebhookError::MissingHeader(HeaderKind::ContentType)
            ));
            assert_eq!(err.to_string(), "client must provide a content type");
        }
    }

    #[test]
    fn only_inspects_the_requested_header() {
        let err = check_header(
            HeaderKind::Accept,
            &headers(CONTENT_TYPE, V1),
            &MediaTypes::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "client must provide an accept header");
    }

    #[test]
    fn unsupported_version_is_reported() {
        let err = check_header(
            HeaderKind::Accept,
            &headers(ACCEPT, "application/external.dns.webhook+json;version=0"),
            &MediaTypes::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WebhookError::UnsupportedMediaType(HeaderKind::Accept, _)
        ));
        assert!(err.to_string().starts_with(
            "client must provide a valid versioned media type in the accept header: \
             unsupported media type version: "
        ));
    }
}
