use crate::domain_filter::DomainFilter;
use crate::error::Error;
use crate::provider::{DynProvider, FileProvider, InMemoryProvider};
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_SERVER_HOST: &str = "localhost";
const DEFAULT_SERVER_PORT: u16 = 8888;

#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    /// Upper bound for receiving a request's headers.
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(default)]
    pub server_read_timeout: Option<Duration>,
    /// Upper bound for a single provider call; expiry answers HTTP 500.
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(default)]
    pub server_write_timeout: Option<Duration>,
    pub records_state_path: Option<String>,
    #[serde(default)]
    pub domain_filter: DomainFilter,
}

fn default_server_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: default_server_host(),
            server_port: default_server_port(),
            server_read_timeout: None,
            server_write_timeout: None,
            records_state_path: None,
            domain_filter: DomainFilter::default(),
        }
    }
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        conf.domain_filter.matcher()?;
        Ok(conf)
    }

    /// Build a config from the process environment. See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from `lookup`, which maps a variable name to its value. Unset and blank
    /// variables keep their defaults.
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `SERVER_HOST` | listen host, default `localhost` |
    /// | `SERVER_PORT` | listen port, default `8888` |
    /// | `SERVER_READ_TIMEOUT` | seconds |
    /// | `SERVER_WRITE_TIMEOUT` | seconds |
    /// | `RECORDS_STATE_PATH` | JSON inventory file; in-memory inventory when unset |
    /// | `DOMAIN_FILTER` | comma-separated included domains |
    /// | `EXCLUDE_DOMAINS` | comma-separated excluded domains |
    /// | `REGEX_DOMAIN_FILTER` | include regex, overrides the lists |
    /// | `REGEX_DOMAIN_EXCLUSION` | exclude regex, used with `REGEX_DOMAIN_FILTER` |
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for unparsable numbers and [`Error::InvalidRegex`] for
    /// invalid domain filter regular expressions.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();

        let mut domain_filter = DomainFilter::new(
            split_list(var("DOMAIN_FILTER")),
            split_list(var("EXCLUDE_DOMAINS")),
        );
        domain_filter.regex_include = var("REGEX_DOMAIN_FILTER");
        domain_filter.regex_exclude = var("REGEX_DOMAIN_EXCLUSION");
        domain_filter.matcher()?;

        Ok(Config {
            server_host: var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", var("SERVER_PORT"))?
                .unwrap_or(defaults.server_port),
            server_read_timeout: parse_var("SERVER_READ_TIMEOUT", var("SERVER_READ_TIMEOUT"))?
                .map(Duration::from_secs),
            server_write_timeout: parse_var("SERVER_WRITE_TIMEOUT", var("SERVER_WRITE_TIMEOUT"))?
                .map(Duration::from_secs),
            records_state_path: var("RECORDS_STATE_PATH"),
            domain_filter,
        })
    }

    /// Build the provider selected by this config: file-backed when `records_state_path` is
    /// set, in-memory otherwise.
    pub async fn provider(&self) -> Result<DynProvider, Error> {
        let provider: DynProvider = match &self.records_state_path {
            Some(path) => {
                tracing::info!("using record inventory file {path}");
                Arc::new(FileProvider::try_from_file(path, self.domain_filter.clone()).await?)
            }
            None => {
                tracing::warn!("no records state path configured, records will not persist");
                Arc::new(InMemoryProvider::new(self.domain_filter.clone())?)
            }
        };
        Ok(provider)
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: Option<String>) -> Result<Option<T>, Error> {
    value
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfig { name, value })
        })
        .transpose()
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|value| value.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}
