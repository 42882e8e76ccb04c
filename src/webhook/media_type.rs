//! Versioned media types of the webhook protocol.

use std::fmt;

const MEDIA_TYPE_FORMAT: &str = "application/external.dns.webhook+json;";

/// Comma-separated protocol versions this webhook speaks, in order of preference.
pub const SUPPORTED_MEDIA_VERSIONS: &str = "1";

/// A versioned webhook media type, e.g. `application/external.dns.webhook+json;version=1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType(String);

impl MediaType {
    /// The media type for protocol `version`.
    pub fn versioned(version: &str) -> Self {
        MediaType(format!("{MEDIA_TYPE_FORMAT}version={version}"))
    }

    /// Exact comparison against a header value; no wildcards or parameters reordering.
    pub fn is(&self, header_value: &str) -> bool {
        self.0 == header_value
    }

    /// The header value form of this media type.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returned when a header value doesn't name any supported [`MediaType`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "unsupported media type version: '{value}'. Supported media types are: '{}'",
    .supported.join(", ")
)]
pub struct UnsupportedMediaType {
    pub value: String,
    pub supported: Vec<String>,
}

/// The ordered list of protocol versions accepted during negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypes {
    versions: Vec<String>,
}

impl Default for MediaTypes {
    fn default() -> Self {
        MediaTypes::parse(SUPPORTED_MEDIA_VERSIONS)
    }
}

impl MediaTypes {
    /// Parse a comma-separated list of version identifiers, keeping their order.
    pub fn parse(versions: &str) -> Self {
        MediaTypes {
            versions: versions
                .split(',')
                .map(str::trim)
                .filter(|version| !version.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Supported version identifiers in negotiation order.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(String::as_str)
    }

    /// Return the first supported version whose media type equals `header_value`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedMediaType`] listing every supported media type when none match.
    pub fn negotiate(&self, header_value: &str) -> Result<&str, UnsupportedMediaType> {
        self.versions()
            .find(|version| MediaType::versioned(version).is(header_value))
            .ok_or_else(|| UnsupportedMediaType {
                value: header_value.to_string(),
                supported: self
                    .versions()
                    .map(|version| MediaType::versioned(version).to_string())
                    .collect(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_versioned_media_type() {
        assert_eq!(
            MediaType::versioned("1").as_str(),
            "application/external.dns.webhook+json;version=1"
        );
    }

    #[test]
    fn negotiates_every_supported_version() {
        let media_types = MediaTypes::parse("1, 2,3");
        for version in ["1", "2", "3"] {
            let header = MediaType::versioned(version).to_string();
            assert_eq!(media_types.negotiate(&header), Ok(version));
        }
    }

    #[test]
    fn first_configured_match_wins() {
        let media_types = MediaTypes::parse("2,2");
        assert_eq!(
            media_types.negotiate("application/external.dns.webhook+json;version=2"),
            Ok("2")
        );
    }

    #[test]
    fn rejects_near_misses() {
        let media_types = MediaTypes::default();
        for header in [
            "application/json",
            "application/external.dns.webhook+json",
            "application/external.dns.webhook+json;version=2",
            "application/external.dns.webhook+json; version=1",
            "*/*",
        ] {
            assert!(media_types.negotiate(header).is_err(), "{header}");
        }
    }

    #[test]
    fn error_lists_supported_media_types() {
        let err = MediaTypes::default().negotiate("text/html").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported media type version: 'text/html'. Supported media types are: \
             'application/external.dns.webhook+json;version=1'"
        );

        let err = MediaTypes::parse("1,2").negotiate("text/html").unwrap_err();
        assert!(err.to_string().ends_with(
            "'application/external.dns.webhook+json;version=1, \
             application/external.dns.webhook+json;version=2'"
        ));
    }
}
