//! External DNS Webhook
//!
//! An [external-dns] webhook provider: a small HTTP service implementing the controller's
//! versioned webhook protocol and delegating record inventory and change application to a
//! pluggable [`Provider`][provider::Provider].
//!
//! The [webhook][webhook] module holds the protocol itself: media type negotiation, header
//! validation and the four exchanges (negotiate, list records, apply changes, adjust
//! endpoints), plus a health bypass. [Providers][provider] implement the record backend.
//!
//! [external-dns]: https://github.com/kubernetes-sigs/external-dns
//!
#![warn(clippy::pedantic)]

#[doc(hidden)]
pub mod banner;
pub mod config;
pub mod domain_filter;
pub mod endpoint;
pub mod error;
pub mod provider;
pub mod webhook;

pub use config::Config;
pub use domain_filter::DomainFilter;
pub use endpoint::{Changes, Endpoint};
pub use provider::{DynProvider, FileProvider, InMemoryProvider, Provider};
pub use webhook::{router, serve};
