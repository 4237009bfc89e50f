//! # Append-Only Audit Log
//!
//! One insert-only sequence of transition records per asset. Records are
//! never modified, reordered, or removed, and querying never mutates
//! state — `history()` replays exactly the walk the asset took.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use custody_core::{AssetId, Role, Timestamp};

/// Immutable record of a single committed custody transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Stage before the transition.
    pub from_role: Role,
    /// Stage after the transition.
    pub to_role: Role,
    /// When the transition was committed (UTC).
    pub timestamp: Timestamp,
    /// Mandatory human-readable justification.
    pub note: String,
}

/// Per-asset append-only transition log.
///
/// The map values are private — callers read through [`AuditLog::history`],
/// which exposes an ordered slice, never mutable indexing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLog {
    entries: HashMap<AssetId, Vec<TransitionRecord>>,
}

impl AuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the asset's sequence. Pure append — no
    /// deduplication, no reordering.
    pub fn append(&mut self, asset_id: AssetId, record: TransitionRecord) {
        self.entries.entry(asset_id).or_default().push(record);
    }

    /// The asset's transition records in insertion order.
    ///
    /// An asset with no committed transitions has an empty history.
    pub fn history(&self, asset_id: AssetId) -> &[TransitionRecord] {
        self.entries
            .get(&asset_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of transitions recorded for the asset.
    pub fn len(&self, asset_id: AssetId) -> usize {
        self.history(asset_id).len()
    }

    /// Whether the asset has any recorded transitions.
    pub fn is_empty(&self, asset_id: AssetId) -> bool {
        self.history(asset_id).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: Role, to: Role, note: &str) -> TransitionRecord {
        TransitionRecord {
            from_role: from,
            to_role: to,
            timestamp: Timestamp::parse("2026-03-01T08:00:00Z").unwrap(),
            note: note.to_string(),
        }
    }

    #[test]
    fn test_history_empty_for_unknown_asset() {
        let log = AuditLog::new();
        assert!(log.history(AssetId(1)).is_empty());
        assert_eq!(log.len(AssetId(1)), 0);
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut log = AuditLog::new();
        let id = AssetId(1);
        log.append(id, record(Role::Originator, Role::Custodian, "picked up"));
        log.append(id, record(Role::Custodian, Role::Carrier, "dispatched"));

        let history = log.history(id);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].to_role, Role::Custodian);
        assert_eq!(history[1].to_role, Role::Carrier);
    }

    #[test]
    fn test_assets_have_independent_sequences() {
        let mut log = AuditLog::new();
        log.append(AssetId(1), record(Role::Originator, Role::Custodian, "a"));
        log.append(AssetId(2), record(Role::Originator, Role::Custodian, "b"));
        assert_eq!(log.len(AssetId(1)), 1);
        assert_eq!(log.len(AssetId(2)), 1);
        assert_eq!(log.history(AssetId(1))[0].note, "a");
    }

    #[test]
    fn test_identical_records_are_both_kept() {
        let mut log = AuditLog::new();
        let id = AssetId(1);
        log.append(id, record(Role::Originator, Role::Custodian, "same"));
        log.append(id, record(Role::Originator, Role::Custodian, "same"));
        assert_eq!(log.len(id), 2);
    }

    #[test]
    fn test_query_does_not_mutate() {
        let mut log = AuditLog::new();
        let id = AssetId(1);
        log.append(id, record(Role::Originator, Role::Custodian, "x"));
        let before = log.history(id).to_vec();
        let _ = log.history(id);
        let _ = log.len(id);
        assert_eq!(log.history(id), before.as_slice());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut log = AuditLog::new();
        log.append(AssetId(1), record(Role::Originator, Role::Custodian, "x"));
        let json = serde_json::to_string(&log).unwrap();
        let parsed: AuditLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.history(AssetId(1)), log.history(AssetId(1)));
    }
}
