//! Upload transaction records
//!
//! The raw record shape found in upload log files, and the validated
//! form the resolver and manifest builder operate on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing archiveId")]
    MissingArchiveId,

    #[error("missing storageTxId")]
    MissingStorageTxId,
}

/// One claim, straight from a log file, that an item was archived to the
/// permanent-storage network.
///
/// Every field is optional at this stage: log files may contain records
/// missing required keys, and those must survive collection so the
/// resolver can skip them with a diagnostic instead of the whole file
/// failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_tx_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

impl UploadRecord {
    /// Check required keys and produce the validated form.
    ///
    /// Empty strings count as missing, matching the upload scripts that
    /// produce these logs.
    pub fn validate(self) -> Result<ValidRecord, RecordError> {
        let archive_id = match self.archive_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(RecordError::MissingArchiveId),
        };
        let storage_tx_id = match self.storage_tx_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(RecordError::MissingStorageTxId),
        };

        Ok(ValidRecord {
            archive_id,
            storage_tx_id,
            date: self.date,
            venue: self.venue,
            artist: self.artist,
            source: self.source,
            bundle_id: self.bundle_id,
            uploaded_at: self.uploaded_at,
        })
    }
}

/// A record that passed required-key validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecord {
    pub archive_id: String,
    pub storage_tx_id: String,
    pub date: Option<String>,
    pub venue: Option<String>,
    pub artist: Option<String>,
    pub source: Option<String>,
    pub bundle_id: Option<String>,
    pub uploaded_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(archive_id: Option<&str>, storage_tx_id: Option<&str>) -> UploadRecord {
        UploadRecord {
            archive_id: archive_id.map(String::from),
            storage_tx_id: storage_tx_id.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_complete_record() {
        let valid = record(Some("gd1977-05-08"), Some("tx111"))
            .validate()
            .expect("record with both keys should validate");

        assert_eq!(valid.archive_id, "gd1977-05-08");
        assert_eq!(valid.storage_tx_id, "tx111");
    }

    #[test]
    fn test_validate_missing_archive_id() {
        let result = record(None, Some("tx111")).validate();
        assert_eq!(result, Err(RecordError::MissingArchiveId));
    }

    #[test]
    fn test_validate_missing_storage_tx_id() {
        let result = record(Some("gd1977-05-08"), None).validate();
        assert_eq!(result, Err(RecordError::MissingStorageTxId));
    }

    #[test]
    fn test_validate_empty_strings_count_as_missing() {
        assert_eq!(
            record(Some(""), Some("tx111")).validate(),
            Err(RecordError::MissingArchiveId)
        );
        assert_eq!(
            record(Some("gd1977-05-08"), Some("")).validate(),
            Err(RecordError::MissingStorageTxId)
        );
    }

    #[test]
    fn test_deserialize_camel_case_fields() {
        let json = r#"{
            "archiveId": "gd1977-05-08",
            "storageTxId": "tx111",
            "uploadedAt": "2024-01-01T00:00:00Z",
            "bundleId": "bundle-7"
        }"#;

        let record: UploadRecord = serde_json::from_str(json).expect("valid record JSON");
        assert_eq!(record.archive_id.as_deref(), Some("gd1977-05-08"));
        assert_eq!(record.storage_tx_id.as_deref(), Some("tx111"));
        assert_eq!(record.uploaded_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(record.bundle_id.as_deref(), Some("bundle-7"));
    }

    #[test]
    fn test_deserialize_tolerates_missing_keys() {
        let record: UploadRecord =
            serde_json::from_str(r#"{"venue": "Barton Hall"}"#).expect("partial record JSON");
        assert_eq!(record.venue.as_deref(), Some("Barton Hall"));
        assert_eq!(record.archive_id, None);
        assert!(record.validate().is_err());
    }
}
