//! HTTP webhook speaking the external-dns provider protocol.
//!
//! Every exchange is versioned through the media type
//! `application/external.dns.webhook+json;version=1`. Requests with a body must send it as
//! `Content-Type`; requests expecting a body must send it as `Accept`. A missing header is
//! answered with HTTP 406 (Not Acceptable), an unsupported one with HTTP 415 (Unsupported Media
//! Type), both with a `text/plain` explanation.
//!
//! # API Endpoints
//!
//! ## `/` (GET)
//!
//!   Requires `Accept`. Returns HTTP 200 (OK) and the provider's
//!   [`DomainFilter`][crate::domain_filter::DomainFilter], e.g.
//!
//!   ```json
//!   {"include":["example.com"]}
//!   ```
//!
//! ## `/records` (GET)
//!
//!   Requires `Accept`. Returns HTTP 200 (OK) and a JSON array of every
//!   [`Endpoint`][crate::endpoint::Endpoint] the provider manages, `[]` when there are none.
//!   Returns HTTP 500 (Internal Server Error) with an empty body when the provider fails.
//!
//! ## `/records` (POST)
//!
//!   Requires `Content-Type`. Expects a [`Changes`][crate::endpoint::Changes] body:
//!
//!   ```json
//!   {
//!     "Create": [{"dnsName": "www.example.com", "recordType": "A", "targets": ["192.0.2.1"]}],
//!     "UpdateOld": [],
//!     "UpdateNew": [],
//!     "Delete": []
//!   }
//!   ```
//!
//!   Returns HTTP 204 (No Content) once applied, HTTP 400 (Bad Request) for an undecodable body
//!   and HTTP 500 (Internal Server Error) when the provider fails.
//!
//! ## `/adjustendpoints` (POST)
//!
//!   Requires `Content-Type` and `Accept`. Expects a JSON array of endpoints and returns HTTP 200
//!   (OK) with the provider's adjusted array. When the provider reports an error the endpoints
//!   it still returned are sent with HTTP 500 (Internal Server Error).
//!
//! ## `/health` (any method)
//!
//!   Returns HTTP 200 (OK) with an empty body. Skips all header checks.
//!
//! Successful responses to `/records` and `/adjustendpoints` carry `Vary: Content-Type`.

mod headers;
mod health;
mod media_type;
mod request_log;
mod routes;
mod server;
mod webhook_error;

pub use headers::{check_header, HeaderKind};
pub use health::HEALTH_PATH;
pub use media_type::{MediaType, MediaTypes, UnsupportedMediaType, SUPPORTED_MEDIA_VERSIONS};
pub use request_log::RequestLog;
pub use routes::{ADJUST_ENDPOINTS_PATH, NEGOTIATE_PATH, RECORDS_PATH};
pub use server::{router, serve};
pub use webhook_error::WebhookError;
