//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error taxonomy of the Custody Stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - One enum per guard family (authorization, state, quota, validation),
//!   summed into [`CustodyError`] with `#[from]` conversions.
//! - Errors carry the identifiers and stage values needed to act on them —
//!   a caller receiving `RoleMismatch` knows which role it holds and which
//!   the asset requires.
//! - A rejected operation never mutates state. Rejection and "no side
//!   effect occurred" are the same guarantee.

use thiserror::Error;

use crate::identity::{AssetId, Principal};
use crate::role::Role;
use crate::temporal::Timestamp;

/// Top-level error type for custody ledger operations.
#[derive(Error, Debug)]
pub enum CustodyError {
    /// No asset exists under the given identifier.
    #[error("{0} not found")]
    NotFound(AssetId),

    /// The caller is not entitled to perform the operation.
    #[error("authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    /// The asset's current state forbids the operation.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// The asset's expiry deadline has passed; no further transitions.
    #[error("{asset_id} expired at {expiry_at}; no further transitions accepted")]
    Expired {
        /// The asset whose expiry has passed.
        asset_id: AssetId,
        /// The absolute expiry deadline.
        expiry_at: Timestamp,
    },

    /// A per-stage transition quota was exhausted.
    #[error("quota error: {0}")]
    Quota(#[from] QuotaError),

    /// The request itself was malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Authorization failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The principal has no registered role.
    #[error("{principal} holds no role")]
    NoRole {
        /// The unregistered principal.
        principal: Principal,
    },

    /// The principal's role does not match the asset's current stage.
    #[error("{principal} holds {held}, but the operation requires {required}")]
    RoleMismatch {
        /// The calling principal.
        principal: Principal,
        /// The role the principal currently holds.
        held: Role,
        /// The role the operation requires.
        required: Role,
    },

    /// Role assignment attempted by a principal that is not the Originator.
    #[error("{principal} is not an Originator and cannot assign roles")]
    NotOriginator {
        /// The principal that attempted the assignment.
        principal: Principal,
    },

    /// Bootstrap attempted on a registry that already has assignments.
    #[error("identity registry is already bootstrapped")]
    AlreadyBootstrapped,
}

/// State machine transition failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StateError {
    /// The requested edge is not in the transition table.
    #[error("invalid custody transition: {from} -> {to}")]
    InvalidTransition {
        /// Current stage.
        from: Role,
        /// Requested target stage.
        to: Role,
    },

    /// The asset has reached the terminal stage and is read-only.
    #[error("{asset_id} is terminal; custody state is read-only")]
    AlreadyTerminal {
        /// The terminal asset.
        asset_id: AssetId,
    },

    /// A temperature-sensitive asset cannot leave the Custodian stage
    /// until cold storage is confirmed.
    #[error("{asset_id} requires cold storage confirmation before leaving CUSTODIAN")]
    ColdStorageNotConfirmed {
        /// The unconfirmed asset.
        asset_id: AssetId,
    },
}

/// Per-stage quota failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuotaError {
    /// The outbound transition quota for a stage is exhausted.
    #[error("quota exceeded: {role} already performed {cap} outbound transitions")]
    Exceeded {
        /// The stage whose quota is exhausted.
        role: Role,
        /// The configured cap.
        cap: u32,
    },
}

/// Request validation failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Transition notes are mandatory, non-empty audit justifications.
    #[error("transition note must not be empty")]
    EmptyNote,

    /// Asset creation requires an expiry strictly in the future.
    #[error("expiry {expiry_at} is not after {now}")]
    ExpiryNotInFuture {
        /// The requested expiry deadline.
        expiry_at: Timestamp,
        /// The clock reading at creation.
        now: Timestamp,
    },

    /// Asset creation requires a delivery deadline strictly in the future.
    #[error("delivery deadline {deliver_by_at} is not after {now}")]
    DeliverByNotInFuture {
        /// The requested delivery deadline.
        deliver_by_at: Timestamp,
        /// The clock reading at creation.
        now: Timestamp,
    },

    /// Cold storage confirmation only applies to temperature-sensitive assets.
    #[error("{asset_id} is not temperature-sensitive")]
    NotTemperatureSensitive {
        /// The asset the confirmation was attempted on.
        asset_id: AssetId,
    },

    /// A Unix timestamp outside the representable range.
    #[error("unix timestamp out of range: {secs}")]
    TimestampOutOfRange {
        /// The rejected epoch value.
        secs: i64,
    },

    /// A timestamp string without the mandatory Z suffix.
    #[error("timestamp must use Z suffix (UTC only), got: {input:?}")]
    NonUtcTimestamp {
        /// The rejected input.
        input: String,
    },

    /// A timestamp string that is not valid RFC 3339.
    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    MalformedTimestamp {
        /// The rejected input.
        input: String,
        /// The parser's diagnostic.
        reason: String,
    },
}
