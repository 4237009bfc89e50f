//! # Custody Ledger — the Transition Orchestrator
//!
//! The top-level component. Every transition request enters here; the
//! ledger authorizes the caller against the identity registry, evaluates
//! the deadline and quota guards, and either commits one atomic state
//! change — asset stage, quota counter, audit entry — or rejects the
//! request with no observable mutation.
//!
//! ## Guard order for `request_transition`
//!
//! ```text
//! lookup ──▶ terminal? ──▶ authorized? ──▶ note non-empty? ──▶ expired?
//!        ──▶ cold chain confirmed? ──▶ quota slot? ──▶ COMMIT
//! ```
//!
//! Everything before the commit is a pure check. The quota consume is the
//! last fallible guard, so a consumed slot always corresponds to a
//! committed transition.
//!
//! ## Concurrency model
//!
//! The ledger is a serialized, single-writer structure: all mutating
//! operations take `&mut self` and run to completion as an indivisible
//! unit. Rust's borrow rules make a torn read unrepresentable in safe
//! code. An embedding that needs cross-thread access wraps the ledger in
//! its own lock; reads then observe either the state before a transition
//! or the state after it, never an in-flight one.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use custody_core::{
    AssetId, AuthorizationError, CustodyError, Principal, Role, StateError, Timestamp,
    ValidationError,
};

use crate::asset::{Asset, AssetAttrs};
use crate::audit::{AuditLog, TransitionRecord};
use crate::deadline::{self, DeliveryOutcome};
use crate::event::{EventSink, InMemoryEventSink, LedgerEvent};
use crate::quota::{QuotaConfig, QuotaLimiter};
use crate::registry::AssetRegistry;
use crate::roles::IdentityRegistry;

/// Read-only snapshot of an asset's custody state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetStatus {
    /// The stage currently holding the asset.
    pub current_role: Role,
    /// Whether the asset has reached the terminal stage.
    pub terminal: bool,
    /// Whether the expiry deadline had passed at the time of the query.
    pub expired: bool,
    /// Whether cold storage is confirmed at the current stage.
    pub cold_confirmed: bool,
}

/// The custody ledger: asset table, role assignments, quota counters, and
/// audit log behind a single serialized mutation interface.
///
/// Generic over the event sink so hosts can plug their own subscriber;
/// the default records events in memory.
#[derive(Debug)]
pub struct CustodyLedger<S: EventSink = InMemoryEventSink> {
    assets: AssetRegistry,
    identities: IdentityRegistry,
    quotas: QuotaLimiter,
    audit: AuditLog,
    sink: S,
}

impl CustodyLedger {
    /// Create a ledger with the in-memory event sink.
    pub fn new(config: QuotaConfig) -> Self {
        Self::with_sink(config, InMemoryEventSink::new())
    }
}

impl Default for CustodyLedger {
    fn default() -> Self {
        Self::new(QuotaConfig::default())
    }
}

impl<S: EventSink> CustodyLedger<S> {
    /// Create a ledger delivering events to `sink`.
    pub fn with_sink(config: QuotaConfig, sink: S) -> Self {
        Self {
            assets: AssetRegistry::new(),
            identities: IdentityRegistry::new(),
            quotas: QuotaLimiter::new(config),
            audit: AuditLog::new(),
            sink,
        }
    }

    // ─── Role administration ─────────────────────────────────────────

    /// Seed the identity registry with its first `Originator`.
    pub fn bootstrap_originator(&mut self, principal: Principal) -> Result<(), CustodyError> {
        self.identities.bootstrap(principal.clone())?;
        info!(%principal, role = %Role::Originator, "identity registry bootstrapped");
        self.sink.emit(LedgerEvent::RoleAssigned {
            principal,
            role: Role::Originator,
        });
        Ok(())
    }

    /// Assign `role` to `target`. `admin` must hold `Originator`.
    pub fn assign_role(
        &mut self,
        admin: &Principal,
        target: Principal,
        role: Role,
    ) -> Result<(), CustodyError> {
        self.identities.assign(admin, target.clone(), role)?;
        info!(%admin, principal = %target, %role, "role assigned");
        self.sink.emit(LedgerEvent::RoleAssigned {
            principal: target,
            role,
        });
        Ok(())
    }

    /// The role currently held by `principal`, if any.
    pub fn role_of(&self, principal: &Principal) -> Option<Role> {
        self.identities.role_of(principal)
    }

    // ─── Asset creation ──────────────────────────────────────────────

    /// Create an asset with the wall clock as `now`.
    pub fn create_asset(&mut self, attrs: AssetAttrs) -> Result<AssetId, CustodyError> {
        self.create_asset_at(attrs, Timestamp::now())
    }

    /// Create an asset, validating deadlines against an explicit clock.
    ///
    /// Ownership-token minting is the external asset registry's concern;
    /// this ledger only records custody state.
    pub fn create_asset_at(
        &mut self,
        attrs: AssetAttrs,
        now: Timestamp,
    ) -> Result<AssetId, CustodyError> {
        let id = self.assets.create_at(attrs, now)?;
        info!(asset = %id, expiry = %attrs.expiry_at, deliver_by = %attrs.deliver_by_at,
            temperature_sensitive = attrs.temperature_sensitive, "asset created");
        Ok(id)
    }

    // ─── Custody transitions ─────────────────────────────────────────

    /// Advance the asset one stage, with the wall clock as `now`.
    pub fn request_transition(
        &mut self,
        asset_id: AssetId,
        principal: &Principal,
        note: &str,
    ) -> Result<TransitionRecord, CustodyError> {
        self.request_transition_at(asset_id, principal, note, Timestamp::now())
    }

    /// Advance the asset one stage, evaluating guards at an explicit clock.
    ///
    /// The sole mutator of custody state. Either commits the stage
    /// advance, the quota increment, and the audit entry together, or
    /// rejects with nothing mutated.
    pub fn request_transition_at(
        &mut self,
        asset_id: AssetId,
        principal: &Principal,
        note: &str,
        now: Timestamp,
    ) -> Result<TransitionRecord, CustodyError> {
        let result = self.transition_inner(asset_id, principal, note, now);
        if let Err(err) = &result {
            debug!(asset = %asset_id, %principal, error = %err, "custody transition rejected");
        }
        result
    }

    /// Advance the asset along an explicitly named edge.
    ///
    /// Fails `StateError::InvalidTransition` when `to` is not the table
    /// successor of the asset's current stage; otherwise behaves exactly
    /// like [`CustodyLedger::request_transition`].
    pub fn request_transition_to(
        &mut self,
        asset_id: AssetId,
        principal: &Principal,
        to: Role,
        note: &str,
    ) -> Result<TransitionRecord, CustodyError> {
        self.request_transition_to_at(asset_id, principal, to, note, Timestamp::now())
    }

    /// Explicit-edge variant of [`CustodyLedger::request_transition_at`].
    pub fn request_transition_to_at(
        &mut self,
        asset_id: AssetId,
        principal: &Principal,
        to: Role,
        note: &str,
        now: Timestamp,
    ) -> Result<TransitionRecord, CustodyError> {
        let asset = self
            .assets
            .get(asset_id)
            .ok_or(CustodyError::NotFound(asset_id))?;
        if asset.is_terminal() {
            return Err(StateError::AlreadyTerminal { asset_id }.into());
        }
        asset.current_role().advance_to(to)?;
        self.request_transition_at(asset_id, principal, note, now)
    }

    fn transition_inner(
        &mut self,
        asset_id: AssetId,
        principal: &Principal,
        note: &str,
        now: Timestamp,
    ) -> Result<TransitionRecord, CustodyError> {
        // Steps 1-2: the asset must exist and still be in motion.
        let asset = self
            .assets
            .get(asset_id)
            .ok_or(CustodyError::NotFound(asset_id))?;
        if asset.is_terminal() {
            return Err(StateError::AlreadyTerminal { asset_id }.into());
        }
        let current = asset.current_role();
        let expiry_at = asset.expiry_at();
        let expired = deadline::is_expired(asset, now);
        let cold_gated = current == Role::Custodian
            && asset.is_temperature_sensitive()
            && !asset.is_cold_confirmed();
        let outcome = deadline::delivery_outcome(asset, now);

        // Step 3: only the current custodian may advance the asset.
        let held = self
            .identities
            .role_of(principal)
            .ok_or_else(|| AuthorizationError::NoRole {
                principal: principal.clone(),
            })?;
        if held != current {
            return Err(AuthorizationError::RoleMismatch {
                principal: principal.clone(),
                held,
                required: current,
            }
            .into());
        }

        // Step 4: the audit note is mandatory.
        if note.trim().is_empty() {
            return Err(ValidationError::EmptyNote.into());
        }

        // Step 5: an expired asset cannot be advanced even by an
        // otherwise-authorized actor. Surfaced as a diagnostic event but
        // never written to the audit log.
        if expired {
            warn!(asset = %asset_id, expiry = %expiry_at, attempted_at = %now,
                "transition attempted on expired asset");
            self.sink.emit(LedgerEvent::AssetExpiredAttempt {
                asset_id,
                attempted_at: now,
            });
            return Err(CustodyError::Expired { asset_id, expiry_at });
        }

        // Step 6: the cold-chain gate out of Custodian.
        if cold_gated {
            return Err(StateError::ColdStorageNotConfirmed { asset_id }.into());
        }

        // Step 7: next stage from the transition table. A non-terminal
        // stage always has a successor in the linear sequence.
        let next = current
            .next()
            .ok_or(StateError::AlreadyTerminal { asset_id })?;

        // Step 8: the quota slot. Last fallible guard — everything after
        // this line commits.
        self.quotas.try_consume(current, asset_id)?;

        // Steps 9-10: single commit point.
        let record = TransitionRecord {
            from_role: current,
            to_role: next,
            timestamp: now,
            note: note.trim().to_string(),
        };
        if let Some(asset) = self.assets.get_mut(asset_id) {
            asset.advance(next)?;
        }
        self.audit.append(asset_id, record.clone());
        info!(asset = %asset_id, from = %current, to = %next, %principal,
            "custody transition committed");
        self.sink.emit(LedgerEvent::TransitionRecorded {
            asset_id,
            from_role: current,
            to_role: next,
            timestamp: now,
        });
        if next.is_final() {
            info!(asset = %asset_id, outcome = %outcome, "delivery completed");
            self.sink.emit(LedgerEvent::DeliveryOutcome { asset_id, outcome });
        }
        Ok(record)
    }

    // ─── Cold-chain confirmation ─────────────────────────────────────

    /// Confirm cold storage for a temperature-sensitive asset.
    ///
    /// Only a `Custodian` may confirm, and only while the asset sits at
    /// the `Custodian` stage. Idempotent: a repeat confirmation succeeds
    /// with no further effect and no duplicate event.
    pub fn confirm_cold_storage(
        &mut self,
        asset_id: AssetId,
        principal: &Principal,
    ) -> Result<(), CustodyError> {
        let asset = self
            .assets
            .get(asset_id)
            .ok_or(CustodyError::NotFound(asset_id))?;
        let current = asset.current_role();
        let temperature_sensitive = asset.is_temperature_sensitive();

        let held = self
            .identities
            .role_of(principal)
            .ok_or_else(|| AuthorizationError::NoRole {
                principal: principal.clone(),
            })?;
        if held != Role::Custodian || current != Role::Custodian {
            return Err(AuthorizationError::RoleMismatch {
                principal: principal.clone(),
                held,
                required: Role::Custodian,
            }
            .into());
        }
        if !temperature_sensitive {
            return Err(ValidationError::NotTemperatureSensitive { asset_id }.into());
        }

        let newly_confirmed = self
            .assets
            .get_mut(asset_id)
            .map(Asset::confirm_cold)
            .unwrap_or(false);
        if newly_confirmed {
            info!(asset = %asset_id, %principal, "cold storage confirmed");
            self.sink.emit(LedgerEvent::ColdStorageConfirmed {
                asset_id,
                principal: principal.clone(),
            });
        }
        Ok(())
    }

    // ─── Read-only queries ───────────────────────────────────────────

    /// The asset's committed transitions in order.
    pub fn history(&self, asset_id: AssetId) -> Result<&[TransitionRecord], CustodyError> {
        self.assets
            .get(asset_id)
            .ok_or(CustodyError::NotFound(asset_id))?;
        Ok(self.audit.history(asset_id))
    }

    /// Current custody status with the wall clock as `now`.
    pub fn status(&self, asset_id: AssetId) -> Result<AssetStatus, CustodyError> {
        self.status_at(asset_id, Timestamp::now())
    }

    /// Current custody status, evaluating expiry at an explicit clock.
    pub fn status_at(
        &self,
        asset_id: AssetId,
        now: Timestamp,
    ) -> Result<AssetStatus, CustodyError> {
        let asset = self
            .assets
            .get(asset_id)
            .ok_or(CustodyError::NotFound(asset_id))?;
        Ok(AssetStatus {
            current_role: asset.current_role(),
            terminal: asset.is_terminal(),
            expired: deadline::is_expired(asset, now),
            cold_confirmed: asset.is_cold_confirmed(),
        })
    }

    /// Direct read access to an asset record.
    pub fn asset(&self, asset_id: AssetId) -> Option<&Asset> {
        self.assets.get(asset_id)
    }

    /// Read access to the quota counters.
    pub fn quotas(&self) -> &QuotaLimiter {
        &self.quotas
    }

    /// Read access to the event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the event sink (e.g., to drain recorded events).
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn attrs(temperature_sensitive: bool) -> AssetAttrs {
        AssetAttrs {
            expiry_at: ts("2026-12-31T00:00:00Z"),
            deliver_by_at: ts("2026-06-30T00:00:00Z"),
            temperature_sensitive,
        }
    }

    struct Fixture {
        ledger: CustodyLedger,
        originator: Principal,
        custodian: Principal,
        carrier: Principal,
    }

    fn fixture() -> Fixture {
        let mut ledger = CustodyLedger::default();
        let originator = Principal::new();
        let custodian = Principal::new();
        let carrier = Principal::new();
        ledger.bootstrap_originator(originator.clone()).unwrap();
        ledger
            .assign_role(&originator, custodian.clone(), Role::Custodian)
            .unwrap();
        ledger
            .assign_role(&originator, carrier.clone(), Role::Carrier)
            .unwrap();
        Fixture { ledger, originator, custodian, carrier }
    }

    fn now() -> Timestamp {
        ts("2026-02-01T00:00:00Z")
    }

    #[test]
    fn test_transition_requires_current_custodian() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(false), now()).unwrap();

        // The carrier is registered but does not hold the asset's stage.
        let err = fx
            .ledger
            .request_transition_at(id, &fx.carrier, "grab", now())
            .unwrap_err();
        assert!(matches!(
            err,
            CustodyError::Authorization(AuthorizationError::RoleMismatch { .. })
        ));
        assert!(fx.ledger.history(id).unwrap().is_empty());
    }

    #[test]
    fn test_unregistered_principal_rejected() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(false), now()).unwrap();
        let err = fx
            .ledger
            .request_transition_at(id, &Principal::new(), "grab", now())
            .unwrap_err();
        assert!(matches!(
            err,
            CustodyError::Authorization(AuthorizationError::NoRole { .. })
        ));
    }

    #[test]
    fn test_empty_note_rejected_before_mutation() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(false), now()).unwrap();
        let err = fx
            .ledger
            .request_transition_at(id, &fx.originator, "   ", now())
            .unwrap_err();
        assert!(matches!(
            err,
            CustodyError::Validation(ValidationError::EmptyNote)
        ));
        assert_eq!(fx.ledger.quotas().consumed(Role::Originator, id), 0);
    }

    #[test]
    fn test_note_is_trimmed_in_record() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(false), now()).unwrap();
        let record = fx
            .ledger
            .request_transition_at(id, &fx.originator, "  handed over  ", now())
            .unwrap();
        assert_eq!(record.note, "handed over");
    }

    #[test]
    fn test_unknown_asset_not_found() {
        let mut fx = fixture();
        let err = fx
            .ledger
            .request_transition_at(AssetId(77), &fx.originator, "x", now())
            .unwrap_err();
        assert!(matches!(err, CustodyError::NotFound(_)));
        assert!(fx.ledger.history(AssetId(77)).is_err());
    }

    #[test]
    fn test_explicit_edge_must_match_table() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(false), now()).unwrap();
        let err = fx
            .ledger
            .request_transition_to_at(id, &fx.originator, Role::Carrier, "skip", now())
            .unwrap_err();
        assert!(matches!(
            err,
            CustodyError::State(StateError::InvalidTransition { .. })
        ));

        fx.ledger
            .request_transition_to_at(id, &fx.originator, Role::Custodian, "ok", now())
            .unwrap();
        assert_eq!(fx.ledger.status_at(id, now()).unwrap().current_role, Role::Custodian);
    }

    #[test]
    fn test_quota_is_not_consumed_by_rejections() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(true), now()).unwrap();
        fx.ledger
            .request_transition_at(id, &fx.originator, "to custodian", now())
            .unwrap();

        // Cold gate rejection must leave the Custodian quota untouched.
        let err = fx
            .ledger
            .request_transition_at(id, &fx.custodian, "dispatch", now())
            .unwrap_err();
        assert!(matches!(
            err,
            CustodyError::State(StateError::ColdStorageNotConfirmed { .. })
        ));
        assert_eq!(fx.ledger.quotas().consumed(Role::Custodian, id), 0);
    }

    #[test]
    fn test_confirm_cold_storage_wrong_stage() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(true), now()).unwrap();
        // Asset is still at Originator.
        let err = fx.ledger.confirm_cold_storage(id, &fx.custodian).unwrap_err();
        assert!(matches!(err, CustodyError::Authorization(_)));
    }

    #[test]
    fn test_confirm_cold_storage_not_sensitive() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(false), now()).unwrap();
        fx.ledger
            .request_transition_at(id, &fx.originator, "to custodian", now())
            .unwrap();
        let err = fx.ledger.confirm_cold_storage(id, &fx.custodian).unwrap_err();
        assert!(matches!(
            err,
            CustodyError::Validation(ValidationError::NotTemperatureSensitive { .. })
        ));
    }

    #[test]
    fn test_confirm_cold_storage_idempotent_single_event() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(true), now()).unwrap();
        fx.ledger
            .request_transition_at(id, &fx.originator, "to custodian", now())
            .unwrap();
        fx.ledger.confirm_cold_storage(id, &fx.custodian).unwrap();
        fx.ledger.confirm_cold_storage(id, &fx.custodian).unwrap();

        let confirmations = fx
            .ledger
            .sink()
            .events()
            .iter()
            .filter(|e| matches!(e, LedgerEvent::ColdStorageConfirmed { .. }))
            .count();
        assert_eq!(confirmations, 1);
    }

    #[test]
    fn test_status_reflects_expiry() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(false), now()).unwrap();
        let status = fx.ledger.status_at(id, now()).unwrap();
        assert!(!status.expired);
        let status = fx.ledger.status_at(id, ts("2027-01-01T00:00:00Z")).unwrap();
        assert!(status.expired);
    }

    #[test]
    fn test_expired_attempt_emits_diagnostic_event() {
        let mut fx = fixture();
        let id = fx.ledger.create_asset_at(attrs(false), now()).unwrap();
        let late = ts("2027-01-01T00:00:00Z");
        let err = fx
            .ledger
            .request_transition_at(id, &fx.originator, "too late", late)
            .unwrap_err();
        assert!(matches!(err, CustodyError::Expired { .. }));
        assert!(fx.ledger.history(id).unwrap().is_empty());
        assert!(fx
            .ledger
            .sink()
            .events()
            .iter()
            .any(|e| matches!(e, LedgerEvent::AssetExpiredAttempt { .. })));
    }
}
