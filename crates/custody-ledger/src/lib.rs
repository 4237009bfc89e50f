//! # custody-ledger — Custody State Machine and Supporting Ledger
//!
//! Moves uniquely identified assets through a fixed sequence of custodial
//! stages (`Originator → Custodian → Carrier → Recipient`) while
//! enforcing deadlines, the cold-chain gate, per-stage transition quotas,
//! and an immutable audit trail.
//!
//! ## Components
//!
//! - **`registry`** — asset creation with monotonic ids and deadline
//!   validation.
//! - **`roles`** — principal-to-role bindings with Originator-gated
//!   assignment.
//! - **`quota`** — atomic check-and-increment counters capping outbound
//!   transitions per stage; scoping (global vs. per-asset) is
//!   configuration.
//! - **`deadline`** — pure expiry and delivery-outcome evaluation.
//! - **`audit`** — append-only per-asset transition log.
//! - **`event`** — the subscriber side channel for committed changes.
//! - **`ledger`** — [`CustodyLedger`], the orchestrator: the only entry
//!   point for transitions, and the single commit point for all three
//!   pieces of shared state (asset stage, quota counter, audit entry).
//!
//! ## Design
//!
//! Guard checks are pure and run in a fixed order; the commit is a single
//! mutation point. A rejected request leaves no observable trace beyond
//! an optional diagnostic event — rejection and "no side effect occurred"
//! are the same guarantee. All mutating operations take `&mut self`,
//! which makes the serialized single-writer execution model a property of
//! the API rather than a convention.

pub mod asset;
pub mod audit;
pub mod deadline;
pub mod event;
pub mod ledger;
pub mod quota;
pub mod registry;
pub mod roles;

// ─── Asset re-exports ───────────────────────────────────────────────

pub use asset::{Asset, AssetAttrs};
pub use registry::AssetRegistry;

// ─── Component re-exports ───────────────────────────────────────────

pub use audit::{AuditLog, TransitionRecord};
pub use deadline::{delivery_outcome, is_expired, DeliveryOutcome};
pub use quota::{QuotaConfig, QuotaLimiter, QuotaScope};
pub use roles::IdentityRegistry;

// ─── Ledger re-exports ──────────────────────────────────────────────

pub use event::{EventSink, InMemoryEventSink, LedgerEvent};
pub use ledger::{AssetStatus, CustodyLedger};
