//! # Event Side Channel
//!
//! Notifications emitted on each committed state change, for external
//! subscribers. Events are observations — the ledger's guarantees never
//! depend on a subscriber consuming them.
//!
//! Rejected operations are not logged to the audit trail; the one
//! diagnostic exception is [`LedgerEvent::AssetExpiredAttempt`], emitted
//! when a transition is refused because the asset's expiry has passed.

use serde::{Deserialize, Serialize};

use custody_core::{AssetId, Principal, Role, Timestamp};

use crate::deadline::DeliveryOutcome;

/// A state-change notification from the custody ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A principal was granted a role (bootstrap included).
    RoleAssigned {
        /// The principal receiving the role.
        principal: Principal,
        /// The granted role.
        role: Role,
    },
    /// A custody transition committed.
    TransitionRecorded {
        /// The asset that advanced.
        asset_id: AssetId,
        /// Stage before the transition.
        from_role: Role,
        /// Stage after the transition.
        to_role: Role,
        /// Commit time.
        timestamp: Timestamp,
    },
    /// Cold storage was confirmed for a temperature-sensitive asset.
    ColdStorageConfirmed {
        /// The confirmed asset.
        asset_id: AssetId,
        /// The confirming custodian.
        principal: Principal,
    },
    /// The final delivery was classified against its deadline.
    DeliveryOutcome {
        /// The delivered asset.
        asset_id: AssetId,
        /// On-time or late.
        outcome: DeliveryOutcome,
    },
    /// A transition was attempted on an expired asset (diagnostic).
    AssetExpiredAttempt {
        /// The expired asset.
        asset_id: AssetId,
        /// When the attempt was made.
        attempted_at: Timestamp,
    },
}

/// Subscriber seam for ledger events.
///
/// Implementations must not fail — event delivery is fire-and-forget from
/// the ledger's point of view.
pub trait EventSink {
    /// Receive one event, in commit order.
    fn emit(&mut self, event: LedgerEvent);
}

/// Default sink recording events in memory, in emission order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventSink {
    events: Vec<LedgerEvent>,
}

impl InMemoryEventSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Drain the recorded events, leaving the sink empty.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}
