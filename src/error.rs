//! Error types.

/// Error enumerates the possible process-level error states.
///
/// Protocol failures that end up as HTTP responses are described separately by
/// [`WebhookError`][crate::webhook::WebhookError].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when an environment variable used by
    /// [`Config::from_env`][crate::config::Config::from_env] holds a value that can't be parsed.
    #[error("invalid value for {name}: \"{value}\"")]
    InvalidConfig { name: &'static str, value: String },

    /// Returned when a [`DomainFilter`][crate::domain_filter::DomainFilter] carries an include or
    /// exclude regular expression that doesn't compile.
    #[error("invalid domain filter regex")]
    InvalidRegex(#[from] regex::Error),

    /// Returned when a provider is asked to manage a record outside of its domain filter.
    #[error("\"{0}\" is outside of the managed domains")]
    UnmanagedDomain(String),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when processing JSON from disk (e.g. when
    /// [loading a `Config`][crate::config::Config::try_from_file], or
    /// [loading a `FileProvider`][crate::provider::file::FileProvider::try_from_file]) fails
    /// due to invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),

    /// Returned when the HTTP server fails to bind or serve.
    #[error("HTTP server error")]
    Server(#[from] hyper::Error),
}
