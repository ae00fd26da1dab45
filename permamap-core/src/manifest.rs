//! Manifest document model
//!
//! The versioned output document mapping archive identifiers to their
//! winning storage transaction and derived access URLs. Rebuilt fresh
//! on every run; two runs over the same inputs differ only in
//! `generatedAt`.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::record::ValidRecord;

/// Manifest format revision.
pub const MANIFEST_VERSION: &str = "1.0.0";

/// External catalog base for source URLs.
pub const CATALOG_BASE: &str = "https://archive.org/details";

/// Descriptive metadata carried by a manifest entry.
///
/// Holds only the fields that were non-empty on the winning record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Metadata {
    fn is_empty(&self) -> bool {
        self.date.is_none() && self.venue.is_none() && self.artist.is_none() && self.source.is_none()
    }
}

/// Resolved, output-facing representation of one archived item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub archive_id: String,
    pub storage_tx_id: String,
    pub storage_url: String,
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ManifestEntry {
    /// Build an entry from a winning record.
    ///
    /// Both URLs are derived from the gateway and catalog bases. The
    /// metadata object is included only when at least one descriptive
    /// field is non-empty, and never carries empty placeholders.
    pub fn from_record(record: ValidRecord, gateway: &str) -> Self {
        let storage_url = format!("{}/{}", gateway, record.storage_tx_id);
        let source_url = format!("{}/{}", CATALOG_BASE, record.archive_id);

        let metadata = Metadata {
            date: non_empty(record.date),
            venue: non_empty(record.venue),
            artist: non_empty(record.artist),
            source: non_empty(record.source),
        };

        Self {
            archive_id: record.archive_id,
            storage_tx_id: record.storage_tx_id,
            storage_url,
            source_url,
            metadata: (!metadata.is_empty()).then_some(metadata),
        }
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// The persisted manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub generated_at: String,
    pub total_items: usize,
    pub entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Assemble a manifest from resolved winners.
    pub fn build(winners: BTreeMap<String, ValidRecord>, gateway: &str) -> Self {
        let entries: BTreeMap<String, ManifestEntry> = winners
            .into_iter()
            .map(|(archive_id, record)| (archive_id, ManifestEntry::from_record(record, gateway)))
            .collect();

        Self {
            version: MANIFEST_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            total_items: entries.len(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UploadRecord;

    const GATEWAY: &str = "https://arweave.net";

    fn winning_record(archive_id: &str, tx_id: &str) -> ValidRecord {
        UploadRecord {
            archive_id: Some(archive_id.to_string()),
            storage_tx_id: Some(tx_id.to_string()),
            ..Default::default()
        }
        .validate()
        .expect("test record should validate")
    }

    #[test]
    fn test_entry_derives_urls() {
        let entry = ManifestEntry::from_record(winning_record("gd1977-05-08", "tx111"), GATEWAY);

        assert_eq!(entry.storage_url, "https://arweave.net/tx111");
        assert_eq!(entry.source_url, "https://archive.org/details/gd1977-05-08");
    }

    #[test]
    fn test_entry_without_descriptive_fields_omits_metadata() {
        let entry = ManifestEntry::from_record(winning_record("show1", "tx1"), GATEWAY);
        assert_eq!(entry.metadata, None);

        let json = serde_json::to_string(&entry).expect("entry serializes");
        assert!(!json.contains("metadata"));
    }

    #[test]
    fn test_entry_metadata_holds_only_present_fields() {
        let mut record = winning_record("show1", "tx1");
        record.venue = Some("Barton Hall".to_string());
        record.artist = Some("".to_string());

        let entry = ManifestEntry::from_record(record, GATEWAY);
        let metadata = entry.metadata.expect("venue should produce metadata");

        assert_eq!(metadata.venue.as_deref(), Some("Barton Hall"));
        assert_eq!(metadata.artist, None);
        assert_eq!(metadata.date, None);

        let json = serde_json::to_string(&metadata).expect("metadata serializes");
        assert_eq!(json, r#"{"venue":"Barton Hall"}"#);
    }

    #[test]
    fn test_bundle_id_is_not_part_of_the_entry() {
        let mut record = winning_record("show1", "tx1");
        record.bundle_id = Some("bundle-7".to_string());

        let entry = ManifestEntry::from_record(record, GATEWAY);
        let json = serde_json::to_string(&entry).expect("entry serializes");
        assert!(!json.contains("bundle"));
    }

    #[test]
    fn test_build_counts_match_entries() {
        let mut winners = BTreeMap::new();
        winners.insert("show1".to_string(), winning_record("show1", "tx1"));
        winners.insert("show2".to_string(), winning_record("show2", "tx2"));

        let manifest = Manifest::build(winners, GATEWAY);

        assert_eq!(manifest.version, MANIFEST_VERSION);
        assert_eq!(manifest.total_items, 2);
        assert_eq!(manifest.entries.len(), manifest.total_items);
        for (key, entry) in &manifest.entries {
            assert_eq!(key, &entry.archive_id);
        }
    }

    #[test]
    fn test_build_empty_set_is_a_valid_document() {
        let manifest = Manifest::build(BTreeMap::new(), GATEWAY);

        assert_eq!(manifest.total_items, 0);
        assert!(manifest.entries.is_empty());

        let json = serde_json::to_string_pretty(&manifest).expect("empty manifest serializes");
        let parsed: Manifest = serde_json::from_str(&json).expect("round-trips");
        assert_eq!(parsed.total_items, 0);
    }

    #[test]
    fn test_generated_at_is_iso8601_utc() {
        let manifest = Manifest::build(BTreeMap::new(), GATEWAY);

        let parsed = chrono::DateTime::parse_from_rfc3339(&manifest.generated_at)
            .expect("generatedAt should be RFC 3339");
        assert_eq!(parsed.offset().local_minus_utc(), 0);
        assert!(manifest.generated_at.ends_with('Z'));
    }

    #[test]
    fn test_manifest_serializes_with_camel_case_keys() {
        let mut winners = BTreeMap::new();
        winners.insert("show1".to_string(), winning_record("show1", "tx1"));

        let manifest = Manifest::build(winners, GATEWAY);
        let json = serde_json::to_string_pretty(&manifest).expect("manifest serializes");

        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"totalItems\""));
        assert!(json.contains("\"archiveId\""));
        assert!(json.contains("\"storageTxId\""));
        assert!(json.contains("\"storageUrl\""));
        assert!(json.contains("\"sourceUrl\""));
    }
}
