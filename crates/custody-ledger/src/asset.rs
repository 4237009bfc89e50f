//! # Asset Record
//!
//! The central entity of the custody ledger. An asset carries an immutable
//! identity and deadline attributes, and a small amount of mutable custody
//! state — the current stage, the cold-chain flag, and the terminal marker.
//!
//! All custody fields are private. Reads go through accessors; mutation is
//! `pub(crate)`, reachable only from the ledger's single commit point, so
//! no external caller can move an asset between stages without passing the
//! full guard chain.

use serde::{Deserialize, Serialize};

use custody_core::{AssetId, Role, StateError, Timestamp};

/// Creation-time attributes for a new asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssetAttrs {
    /// Absolute deadline after which no further transition may succeed.
    pub expiry_at: Timestamp,
    /// Target deadline used only to classify the final delivery as
    /// on-time or late. Never gates a transition.
    pub deliver_by_at: Timestamp,
    /// Whether the asset requires cold-chain confirmation before leaving
    /// the Custodian stage. Fixed at creation.
    pub temperature_sensitive: bool,
}

/// A uniquely identified asset moving through the custody stages.
///
/// Created at `Originator`, advanced exclusively by the custody ledger,
/// and permanently read-only once it reaches `Recipient`. No deletion
/// operation exists — historical assets persist indefinitely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    id: AssetId,
    current_role: Role,
    created_at: Timestamp,
    expiry_at: Timestamp,
    deliver_by_at: Timestamp,
    temperature_sensitive: bool,
    cold_confirmed: bool,
    terminal: bool,
}

impl Asset {
    /// Create a new asset at the `Originator` stage.
    pub(crate) fn new(id: AssetId, attrs: AssetAttrs, created_at: Timestamp) -> Self {
        Self {
            id,
            current_role: Role::Originator,
            created_at,
            expiry_at: attrs.expiry_at,
            deliver_by_at: attrs.deliver_by_at,
            temperature_sensitive: attrs.temperature_sensitive,
            cold_confirmed: false,
            terminal: false,
        }
    }

    /// Advance the asset to the next custody stage.
    ///
    /// Validates the edge against the transition table even though the
    /// ledger computes `to` from the same table — a second table cannot
    /// drift from the first because there is only one. Entering
    /// `Recipient` marks the asset terminal.
    pub(crate) fn advance(&mut self, to: Role) -> Result<(), StateError> {
        if self.terminal {
            return Err(StateError::AlreadyTerminal { asset_id: self.id });
        }
        self.current_role.advance_to(to)?;
        self.current_role = to;
        if to.is_final() {
            self.terminal = true;
        }
        // The cold flag is scoped to the Custodian stage. The sequence is
        // linear so re-entry cannot occur, but the scope rule is kept
        // explicit here rather than assumed.
        if to != Role::Custodian {
            self.cold_confirmed = false;
        }
        Ok(())
    }

    /// Set the cold-chain confirmation flag.
    ///
    /// Idempotent: returns `true` only when the flag was newly set.
    pub(crate) fn confirm_cold(&mut self) -> bool {
        let newly = !self.cold_confirmed;
        self.cold_confirmed = true;
        newly
    }

    /// Unique, immutable asset identifier.
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// The stage currently holding the asset.
    pub fn current_role(&self) -> Role {
        self.current_role
    }

    /// When the asset was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Absolute expiry deadline.
    pub fn expiry_at(&self) -> Timestamp {
        self.expiry_at
    }

    /// Delivery classification deadline.
    pub fn deliver_by_at(&self) -> Timestamp {
        self.deliver_by_at
    }

    /// Whether the asset requires cold-chain handling.
    pub fn is_temperature_sensitive(&self) -> bool {
        self.temperature_sensitive
    }

    /// Whether cold storage has been confirmed at the current stage.
    pub fn is_cold_confirmed(&self) -> bool {
        self.cold_confirmed
    }

    /// Whether the asset has reached the terminal stage.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> AssetAttrs {
        AssetAttrs {
            expiry_at: Timestamp::parse("2026-12-31T00:00:00Z").unwrap(),
            deliver_by_at: Timestamp::parse("2026-06-30T00:00:00Z").unwrap(),
            temperature_sensitive: true,
        }
    }

    fn make_asset() -> Asset {
        Asset::new(AssetId(1), attrs(), Timestamp::parse("2026-01-01T00:00:00Z").unwrap())
    }

    #[test]
    fn test_new_asset_starts_at_originator() {
        let a = make_asset();
        assert_eq!(a.current_role(), Role::Originator);
        assert!(!a.is_terminal());
        assert!(!a.is_cold_confirmed());
    }

    #[test]
    fn test_advance_walks_the_sequence() {
        let mut a = make_asset();
        a.advance(Role::Custodian).unwrap();
        assert_eq!(a.current_role(), Role::Custodian);
        a.advance(Role::Carrier).unwrap();
        a.advance(Role::Recipient).unwrap();
        assert!(a.is_terminal());
    }

    #[test]
    fn test_advance_rejects_skip() {
        let mut a = make_asset();
        let err = a.advance(Role::Carrier).unwrap_err();
        assert!(matches!(err, StateError::InvalidTransition { .. }));
        assert_eq!(a.current_role(), Role::Originator);
    }

    #[test]
    fn test_advance_rejects_regression() {
        let mut a = make_asset();
        a.advance(Role::Custodian).unwrap();
        assert!(a.advance(Role::Custodian).is_err());
        assert_eq!(a.current_role(), Role::Custodian);
    }

    #[test]
    fn test_terminal_asset_rejects_advance() {
        let mut a = make_asset();
        a.advance(Role::Custodian).unwrap();
        a.advance(Role::Carrier).unwrap();
        a.advance(Role::Recipient).unwrap();
        let err = a.advance(Role::Recipient).unwrap_err();
        assert!(matches!(err, StateError::AlreadyTerminal { .. }));
    }

    #[test]
    fn test_cold_flag_is_stage_local() {
        let mut a = make_asset();
        a.advance(Role::Custodian).unwrap();
        assert!(a.confirm_cold());
        assert!(a.is_cold_confirmed());
        // Leaving Custodian clears the flag.
        a.advance(Role::Carrier).unwrap();
        assert!(!a.is_cold_confirmed());
    }

    #[test]
    fn test_confirm_cold_idempotent() {
        let mut a = make_asset();
        a.advance(Role::Custodian).unwrap();
        assert!(a.confirm_cold());
        assert!(!a.confirm_cold());
        assert!(a.is_cold_confirmed());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let a = make_asset();
        let json = serde_json::to_string(&a).unwrap();
        let parsed: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id(), a.id());
        assert_eq!(parsed.current_role(), a.current_role());
    }
}
