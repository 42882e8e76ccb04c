use crate::domain_filter::{normalize, DomainFilter, DomainMatcher};
use crate::endpoint::{Changes, Endpoint};
use crate::error::Error;
use crate::provider::{AdjustError, Provider};
use anyhow::anyhow;
use std::future::Future;
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct InMemoryProvider {
    records: RwLock<Vec<Endpoint>>,
    filter: DomainFilter,
    matcher: DomainMatcher,
}

impl InMemoryProvider {
    /// Create an empty provider managing the domains of `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegex`] if the filter's regular expressions don't compile.
    pub fn new(filter: DomainFilter) -> Result<Self, Error> {
        Self::with_records(filter, Vec::new())
    }

    /// Create a provider seeded with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegex`] if the filter's regular expressions don't compile.
    pub fn with_records(filter: DomainFilter, records: Vec<Endpoint>) -> Result<Self, Error> {
        let matcher = filter.matcher()?;
        Ok(Self {
            records: RwLock::new(records),
            filter,
            matcher,
        })
    }

    pub(crate) async fn snapshot(&self) -> Vec<Endpoint> {
        self.records.read().await.clone()
    }

    /// Apply `changes` atomically. The next inventory is handed to `persist` while the write
    /// lock is held and only replaces the current one once `persist` succeeds.
    pub(crate) async fn commit<F, Fut>(&self, changes: &Changes, persist: F) -> anyhow::Result<()>
    where
        F: FnOnce(Vec<Endpoint>) -> Fut + Send,
        Fut: Future<Output = anyhow::Result<Vec<Endpoint>>> + Send,
    {
        self.check_managed(changes)?;
        let mut records = self.records.write().await;
        let next = plan(&records, changes)?;
        *records = persist(next).await?;
        tracing::debug!("inventory now holds {} records", records.len());
        Ok(())
    }

    fn check_managed(&self, changes: &Changes) -> Result<(), Error> {
        match changes
            .all()
            .find(|endpoint| !self.matcher.matches(&endpoint.dns_name))
        {
            Some(endpoint) => Err(Error::UnmanagedDomain(endpoint.dns_name.clone())),
            None => Ok(()),
        }
    }
}

/// Compute the inventory that results from applying `changes` to `current`, or fail without
/// side effects.
fn plan(current: &[Endpoint], changes: &Changes) -> anyhow::Result<Vec<Endpoint>> {
    let mut next: Vec<Endpoint> = current.to_vec();
    for removed in changes.delete.iter().chain(&changes.update_old) {
        let before = next.len();
        next.retain(|endpoint| !endpoint.same_record_set(removed));
        if next.len() == before {
            return Err(anyhow!(
                "no {} record for \"{}\" to remove",
                removed.record_type,
                removed.dns_name
            ));
        }
    }
    for added in changes.create.iter().chain(&changes.update_new) {
        if next.iter().any(|endpoint| endpoint.same_record_set(added)) {
            return Err(anyhow!(
                "{} record for \"{}\" already exists",
                added.record_type,
                added.dns_name
            ));
        }
        next.push(added.clone());
    }
    Ok(next)
}

#[async_trait::async_trait]
impl Provider for InMemoryProvider {
    async fn records(&self) -> anyhow::Result<Vec<Endpoint>> {
        Ok(self.snapshot().await)
    }

    async fn apply_changes(&self, changes: Changes) -> anyhow::Result<()> {
        self.commit(&changes, |next| async move { Ok::<_, anyhow::Error>(next) }).await
    }

    async fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>, AdjustError> {
        let requested = endpoints.len();
        let adjusted: Vec<Endpoint> = endpoints
            .into_iter()
            .map(|mut endpoint| {
                endpoint.dns_name = normalize(&endpoint.dns_name);
                endpoint
            })
            .filter(|endpoint| self.matcher.matches(&endpoint.dns_name))
            .collect();

        if adjusted.len() < requested {
            let dropped = requested - adjusted.len();
            return Err(AdjustError {
                endpoints: adjusted,
                error: anyhow!("dropped {dropped} endpoints outside of the managed domains"),
            });
        }
        Ok(adjusted)
    }

    fn domain_filter(&self) -> DomainFilter {
        self.filter.clone()
    }
}
