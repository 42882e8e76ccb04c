//! Domain filters advertised to the controller during negotiation.

use crate::error::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The set of domains a provider manages, in the controller's JSON encoding.
///
/// When `regex_include` is set the regular expressions take precedence over the `include` and
/// `exclude` lists. Otherwise a name matches when it equals, or is a subdomain of, an `include`
/// entry (an empty `include` list matches every name) and no `exclude` entry. Entries starting
/// with `.` only match strict subdomains.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_include: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_exclude: Option<String>,
}

impl DomainFilter {
    /// Build a list based filter, normalizing and dropping blank entries.
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        DomainFilter {
            include: normalize_all(include),
            exclude: normalize_all(exclude),
            ..DomainFilter::default()
        }
    }

    /// Compile the filter into a [`DomainMatcher`], or return an Error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegex`] if either regular expression fails to compile.
    pub fn matcher(&self) -> Result<DomainMatcher, Error> {
        let regex_include = self.regex_include.as_deref().map(Regex::new).transpose()?;
        let regex_exclude = self.regex_exclude.as_deref().map(Regex::new).transpose()?;
        Ok(DomainMatcher {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            regex_include,
            regex_exclude,
        })
    }
}

/// A compiled [`DomainFilter`].
#[derive(Debug, Clone)]
pub struct DomainMatcher {
    include: Vec<String>,
    exclude: Vec<String>,
    regex_include: Option<Regex>,
    regex_exclude: Option<Regex>,
}

impl DomainMatcher {
    pub fn matches(&self, name: &str) -> bool {
        let name = normalize(name);
        if let Some(regex_include) = &self.regex_include {
            let excluded = self
                .regex_exclude
                .as_ref()
                .is_some_and(|regex_exclude| regex_exclude.is_match(&name));
            return regex_include.is_match(&name) && !excluded;
        }

        let included = self.include.is_empty()
            || self.include.iter().any(|domain| in_domain(&name, domain));
        included && !self.exclude.iter().any(|domain| in_domain(&name, domain))
    }
}

fn in_domain(name: &str, domain: &str) -> bool {
    if let Some(suffix) = domain.strip_prefix('.') {
        return name.len() > suffix.len() && name.ends_with(domain);
    }
    name == domain
        || name
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Lowercase a DNS name and strip surrounding whitespace and the trailing root label.
pub fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_lowercase()
}

fn normalize_all<I>(domains: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    domains
        .into_iter()
        .map(|domain| normalize(domain.as_ref()))
        .filter(|domain| !domain.is_empty())
        .collect()
}
