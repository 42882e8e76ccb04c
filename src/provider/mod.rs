//! DNS providers the webhook delegates to.
//!
//! The [webhook][crate::webhook] only speaks the controller protocol; everything that touches
//! the actual record inventory happens behind the [`Provider`] trait.
//!
//! Two implementations are provided, [`memory::InMemoryProvider`] and [`file::FileProvider`].
//! The former is not durable across restarts. The latter will write its inventory to disk after
//! each applied change set and load it again on startup.

use crate::domain_filter::DomainFilter;
use crate::endpoint::{Changes, Endpoint};
use std::sync::Arc;

pub mod file;
pub mod memory;

#[allow(clippy::module_name_repetitions)]
pub use file::FileProvider;
#[allow(clippy::module_name_repetitions)]
pub use memory::InMemoryProvider;

/// `DynProvider` is a type alias for a [`Provider`] shared by every in-flight request.
/// Implementations must do their own synchronization.
#[allow(clippy::module_name_repetitions)]
pub type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Returned by [`Provider::adjust_endpoints`] when some endpoints could not be adjusted.
///
/// Carries whatever endpoints the provider still produced; the webhook serializes them into the
/// error response.
#[derive(thiserror::Error, Debug)]
#[error("failed to adjust endpoints: {error}")]
pub struct AdjustError {
    pub endpoints: Vec<Endpoint>,
    pub error: anyhow::Error,
}

/// An async trait describing a DNS hosting backend driven by the external-dns controller.
///
/// Dropping any returned future cancels the call.
#[async_trait::async_trait]
pub trait Provider {
    /// List every record the provider currently manages.
    async fn records(&self) -> anyhow::Result<Vec<Endpoint>>;

    /// Apply a change set.
    async fn apply_changes(&self, changes: Changes) -> anyhow::Result<()>;

    /// Give the provider a chance to normalize or default desired endpoints before the
    /// controller plans changes. The result may differ in length and content from the input.
    async fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>, AdjustError>;

    /// The domains this provider is responsible for.
    fn domain_filter(&self) -> DomainFilter;
}
