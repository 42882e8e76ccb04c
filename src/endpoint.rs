//! Wire model for DNS records exchanged with the external-dns controller.
//!
//! Field names follow the controller's JSON encoding. Empty optional fields are omitted when
//! serializing and `null` collections decode as empty.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use std::collections::BTreeMap;

/// A single DNS resource record set as described by the controller.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns_name: String,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub record_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,

    #[serde(rename = "recordTTL", default, skip_serializing_if = "is_unset_ttl")]
    pub record_ttl: i64,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

/// A provider specific `name`/`value` pair attached to an [`Endpoint`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSpecificProperty {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_unset_ttl(ttl: &i64) -> bool {
    *ttl == 0
}

impl Endpoint {
    pub fn new(dns_name: &str, record_type: &str, targets: &[&str]) -> Self {
        Endpoint {
            dns_name: dns_name.to_string(),
            record_type: record_type.to_string(),
            targets: targets.iter().map(ToString::to_string).collect(),
            ..Endpoint::default()
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.record_ttl = ttl;
        self
    }

    /// Returns whether `other` describes the same record set, i.e. shares the DNS name, record
    /// type and set identifier. Targets, TTL and labels are not compared.
    pub fn same_record_set(&self, other: &Endpoint) -> bool {
        self.dns_name == other.dns_name
            && self.record_type == other.record_type
            && self.set_identifier == other.set_identifier
    }
}

/// A batch of record changes to apply. Each sequence is handed to the provider as a whole;
/// no ordering between the four sequences is implied.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "Create", default)]
    pub create: Vec<Endpoint>,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "UpdateOld", default)]
    pub update_old: Vec<Endpoint>,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "UpdateNew", default)]
    pub update_new: Vec<Endpoint>,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "Delete", default)]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }

    /// Every endpoint referenced by the change set, in `Create`, `UpdateOld`, `UpdateNew`,
    /// `Delete` order.
    pub fn all(&self) -> impl Iterator<Item = &Endpoint> {
        self.create
            .iter()
            .chain(&self.update_old)
            .chain(&self.update_new)
            .chain(&self.delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_uses_controller_field_names() {
        let endpoint = Endpoint::new("www.example.com", "A", &["192.0.2.1"]).with_ttl(300);
        let encoded = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(
            encoded,
            json!({
                "dnsName": "www.example.com",
                "targets": ["192.0.2.1"],
                "recordType": "A",
                "recordTTL": 300,
            })
        );
    }

    #[test]
    fn endpoint_accepts_null_collections() {
        let endpoint: Endpoint = serde_json::from_value(json!({
            "dnsName": "txt.example.com",
            "targets": null,
            "recordType": "TXT",
            "labels": null,
            "providerSpecific": [{"name": "alias", "value": "false"}],
        }))
        .unwrap();
        assert!(endpoint.targets.is_empty());
        assert!(endpoint.labels.is_empty());
        assert_eq!(endpoint.provider_specific[0].name, "alias");
    }

    #[test]
    fn changes_decode_with_missing_and_null_sequences() {
        let changes: Changes = serde_json::from_value(json!({
            "Create": [{"dnsName": "a.example.com", "recordType": "A", "targets": ["192.0.2.1"]}],
            "UpdateOld": null,
        }))
        .unwrap();
        assert_eq!(changes.create.len(), 1);
        assert!(changes.update_old.is_empty());
        assert!(changes.update_new.is_empty());
        assert!(changes.delete.is_empty());
        assert!(!changes.is_empty());
    }

    #[test]
    fn same_record_set_ignores_targets() {
        let old = Endpoint::new("a.example.com", "A", &["192.0.2.1"]);
        let new = Endpoint::new("a.example.com", "A", &["192.0.2.2"]).with_ttl(60);
        let other = Endpoint::new("a.example.com", "AAAA", &["2001:db8::1"]);
        assert!(old.same_record_set(&new));
        assert!(!old.same_record_set(&other));
    }
}
