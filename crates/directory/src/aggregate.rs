//! Client-side reductions over a full directory fetch.

use crate::entry::{Change, ChangeType, DirectoryEntry, Statistics};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Distinct non-blank departments in first-seen order.
pub fn departments(entries: &[DirectoryEntry]) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for entry in entries {
        let dept = &entry.departement;
        if !dept.trim().is_empty() && !seen.contains(dept) {
            seen.push(dept.clone());
        }
    }
    seen
}

/// Entries whose department matches exactly.
pub fn by_department(entries: Vec<DirectoryEntry>, departement: &str) -> Vec<DirectoryEntry> {
    entries
        .into_iter()
        .filter(|e| e.departement == departement)
        .collect()
}

/// First entry with the given IP address.
pub fn by_ip(entries: Vec<DirectoryEntry>, ip: &str) -> Option<DirectoryEntry> {
    entries.into_iter().find(|e| e.ip == ip)
}

/// Totals per department and per position.
pub fn statistics(entries: &[DirectoryEntry], now: DateTime<Utc>) -> Statistics {
    let mut by_department = BTreeMap::new();
    let mut by_poste = BTreeMap::new();
    for entry in entries {
        *by_department.entry(entry.departement.clone()).or_insert(0) += 1;
        *by_poste.entry(entry.poste.clone()).or_insert(0) += 1;
    }

    Statistics {
        total_entries: entries.len(),
        by_department,
        by_poste,
        last_updated: now,
    }
}

/// Entries missing an IP, email, phone, or position.
pub fn incomplete(entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
    entries.into_iter().filter(DirectoryEntry::is_incomplete).collect()
}

/// The first `limit` entries reported as updated at `now`.
///
/// The service keeps no change log, so this is a stand-in view.
pub fn recent_changes(entries: Vec<DirectoryEntry>, limit: usize, now: DateTime<Utc>) -> Vec<Change> {
    entries
        .into_iter()
        .take(limit)
        .map(|entry| Change {
            entry,
            change_type: ChangeType::Updated,
            timestamp: now,
        })
        .collect()
}

/// Entries whose searchable text contains any whitespace-separated term
/// of `query`, case-insensitively. An empty query matches everything.
pub fn natural_language(entries: Vec<DirectoryEntry>, query: &str) -> Vec<DirectoryEntry> {
    let query = query.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return entries;
    }

    entries
        .into_iter()
        .filter(|entry| {
            let text = entry.searchable_text();
            terms.iter().any(|term| text.contains(term))
        })
        .collect()
}
