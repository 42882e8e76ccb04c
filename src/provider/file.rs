//! A JSON file-backed implementation of the [`Provider`][super::Provider] trait.
//!
//! Wraps a [`InMemoryProvider`][super::memory::InMemoryProvider] instance. Every change set is
//! written to disk before it becomes visible in memory, so a failed write leaves both the file
//! and the served inventory at the previous state.
use crate::domain_filter::DomainFilter;
use crate::endpoint::{Changes, Endpoint};
use crate::error::Error;
use crate::provider::memory::InMemoryProvider;
use crate::provider::{AdjustError, Provider};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A record inventory persisted as a JSON array of endpoints.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FileProvider {
    provider: InMemoryProvider,
    path: PathBuf,
}

impl FileProvider {
    /// Open the inventory at `path`, starting (and writing) an empty one if the file doesn't
    /// exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the file can't be read or created, [`Error::InvalidJSON`] if it
    /// isn't a JSON array of endpoints, and [`Error::InvalidRegex`] if the filter's regular
    /// expressions don't compile.
    pub async fn try_from_file(path: impl AsRef<Path>, filter: DomainFilter) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let records: Vec<Endpoint> = match fs::read(&path).await {
            Ok(contents) => serde_json::from_slice(&contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!("starting empty inventory at {}", path.display());
                write_inventory(&path, &[]).await?;
                Vec::new()
            }
            Err(err) => return Err(Error::IO(err)),
        };
        tracing::debug!("loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            provider: InMemoryProvider::with_records(filter, records)?,
            path,
        })
    }
}

/// Replace the inventory file. The JSON goes to a sibling temporary file first and is renamed
/// into place, so readers never see a partial write.
async fn write_inventory(path: &Path, records: &[Endpoint]) -> Result<(), Error> {
    let data = serde_json::to_vec_pretty(records)?;
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    fs::write(&staging, data).await?;
    fs::rename(&staging, path).await?;
    Ok(())
}

#[async_trait::async_trait]
impl Provider for FileProvider {
    async fn records(&self) -> anyhow::Result<Vec<Endpoint>> {
        self.provider.records().await
    }

    async fn apply_changes(&self, changes: Changes) -> anyhow::Result<()> {
        self.provider
            .commit(&changes, |next| async move {
                write_inventory(&self.path, &next).await?;
                Ok::<_, anyhow::Error>(next)
            })
            .await
    }

    async fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>, AdjustError> {
        self.provider.adjust_endpoints(endpoints).await
    }

    fn domain_filter(&self) -> DomainFilter {
        self.provider.domain_filter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cname() -> Endpoint {
        Endpoint::new("www.example.com", "CNAME", &["example.com"])
    }

    fn create(endpoint: Endpoint) -> Changes {
        Changes {
            create: vec![endpoint],
            ..Changes::default()
        }
    }

    #[tokio::test]
    async fn creates_missing_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let provider = FileProvider::try_from_file(&path, DomainFilter::default())
            .await
            .unwrap();
        assert!(provider.records().await.unwrap().is_empty());
        let on_disk: Vec<Endpoint> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(on_disk.is_empty());
    }

    #[tokio::test]
    async fn persists_applied_changes_across_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let provider = FileProvider::try_from_file(&path, DomainFilter::default())
            .await
            .unwrap();
        provider.apply_changes(create(cname())).await.unwrap();

        let reloaded = FileProvider::try_from_file(&path, DomainFilter::default())
            .await
            .unwrap();
        assert_eq!(reloaded.records().await.unwrap(), vec![cname()]);
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let provider = FileProvider::try_from_file(&path, DomainFilter::default())
            .await
            .unwrap();
        dir.close().unwrap();

        assert!(provider.apply_changes(create(cname())).await.is_err());
        assert!(provider.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_corrupt_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = FileProvider::try_from_file(&path, DomainFilter::default()).await;
        assert!(matches!(result, Err(Error::InvalidJSON(_))));
    }
}
