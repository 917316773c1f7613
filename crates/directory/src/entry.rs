//! Directory records and request/response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One person in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: u64,
    /// Full name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nom: String,
    /// Workstation IP address.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ip: String,
    /// Position.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub poste: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub departement: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// Phone number.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tel: String,
}

impl DirectoryEntry {
    /// Lower-cased text searched by natural-language queries.
    pub fn searchable_text(&self) -> String {
        [
            &self.nom,
            &self.poste,
            &self.departement,
            &self.email,
            &self.tel,
            &self.ip,
        ]
        .map(|s| s.to_lowercase())
        .join(" ")
    }

    /// Whether any contact field is missing.
    pub fn is_incomplete(&self) -> bool {
        self.ip.is_empty() || self.email.is_empty() || self.tel.is_empty() || self.poste.is_empty()
    }
}

/// The service stores unset text fields as `null`.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload for creating an entry; the service assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub nom: String,
    #[serde(default)]
    pub ip: String,
    pub poste: String,
    pub departement: String,
    pub email: String,
    pub tel: String,
}

/// Partial update; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poste: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
}

/// Server-side search filters, passed through as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Free-text term, sent as `query`.
    pub search: Option<String>,
    pub departement: Option<String>,
    pub poste: Option<String>,
}

impl SearchFilters {
    /// Query pairs for the non-empty filters, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("query", &self.search),
            ("departement", &self.departement),
            ("poste", &self.poste),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_owned()))
        })
        .collect()
    }
}

/// Counts over the whole directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_entries: usize,
    pub by_department: BTreeMap<String, usize>,
    pub by_poste: BTreeMap<String, usize>,
    pub last_updated: DateTime<Utc>,
}

/// Kind of change reported by [`Change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Created,
    Updated,
    Deleted,
}

/// A change-log item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub entry: DirectoryEntry,
    pub change_type: ChangeType,
    pub timestamp: DateTime<Utc>,
}

/// Acknowledgement returned by a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: String,
}

/// Outcome of [`DirectoryClient::test_connection`](crate::DirectoryClient::test_connection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// `success` or `error`.
    pub status: String,
    pub message: String,
}
