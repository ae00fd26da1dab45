//! Duplicate resolution
//!
//! Folds the collected record sequence into one winning record per
//! archive identifier.

use std::collections::BTreeMap;

use tracing::warn;

use crate::record::{UploadRecord, ValidRecord};

/// Decide between the current winner and a challenger claiming the same
/// archive identifier.
///
/// The challenger replaces the winner only when both sides carry an
/// `uploadedAt` timestamp and the challenger's is strictly later.
/// ISO-8601 timestamps order correctly as plain strings, so the
/// comparison is lexical. When either side lacks a timestamp the
/// current winner is kept: first-seen wins when provenance is missing.
pub fn pick_winner(current: ValidRecord, challenger: ValidRecord) -> ValidRecord {
    match (&current.uploaded_at, &challenger.uploaded_at) {
        (Some(current_at), Some(challenger_at)) if challenger_at > current_at => challenger,
        _ => current,
    }
}

/// Fold records into the map of winning records, keyed by archive id.
///
/// Records missing a required key are skipped with a diagnostic and do
/// not participate. For a fixed input order the result is always
/// identical.
pub fn resolve(records: Vec<UploadRecord>) -> BTreeMap<String, ValidRecord> {
    let mut winners: BTreeMap<String, ValidRecord> = BTreeMap::new();

    for record in records {
        let challenger = match record.validate() {
            Ok(valid) => valid,
            Err(reason) => {
                warn!("skipping invalid transaction: {}", reason);
                continue;
            }
        };

        match winners.remove(&challenger.archive_id) {
            Some(current) => {
                let winner = pick_winner(current, challenger);
                winners.insert(winner.archive_id.clone(), winner);
            }
            None => {
                winners.insert(challenger.archive_id.clone(), challenger);
            }
        }
    }

    winners
}
