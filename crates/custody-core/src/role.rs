//! # Custody Stage Taxonomy
//!
//! The fixed, totally ordered sequence of custodial roles an asset moves
//! through:
//!
//! ```text
//! Originator ──▶ Custodian ──▶ Carrier ──▶ Recipient (terminal)
//! ```
//!
//! `Role::next()` is the transition table. The three edges it encodes are
//! the only legal custody transitions in the system — authorization checks
//! are a single equality comparison against a caller's registered role,
//! never a string comparison.

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// The four custodial stages, in their fixed total order.
///
/// The order is fixed at design time; there is no dynamic insertion of
/// stages. `Recipient` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Role {
    /// Stage 1: the party that originates the asset.
    Originator = 1,
    /// Stage 2: intermediate custody; cold-chain confirmation happens here.
    Custodian = 2,
    /// Stage 3: in transit to the recipient.
    Carrier = 3,
    /// Stage 4: final custody (terminal).
    Recipient = 4,
}

impl Role {
    /// Total number of custody stages.
    pub const STAGE_COUNT: u8 = 4;

    /// The numeric stage number (1-4).
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// The next stage in the custody sequence, if any.
    ///
    /// This is the transition table: the three `Some` edges are the only
    /// legal custody transitions.
    pub fn next(&self) -> Option<Role> {
        match self {
            Self::Originator => Some(Self::Custodian),
            Self::Custodian => Some(Self::Carrier),
            Self::Carrier => Some(Self::Recipient),
            Self::Recipient => None,
        }
    }

    /// Validate an explicitly named edge against the transition table.
    ///
    /// Returns the target stage when `self -> to` is a legal edge, and
    /// [`StateError::InvalidTransition`] for every other pair — skips,
    /// regressions, and self-loops included.
    pub fn advance_to(&self, to: Role) -> Result<Role, StateError> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(StateError::InvalidTransition { from: *self, to })
        }
    }

    /// Whether this is the final custody stage.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Recipient)
    }

    /// The full stage sequence in order.
    pub fn sequence() -> [Role; 4] {
        [Self::Originator, Self::Custodian, Self::Carrier, Self::Recipient]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Originator => "ORIGINATOR",
            Self::Custodian => "CUSTODIAN",
            Self::Carrier => "CARRIER",
            Self::Recipient => "RECIPIENT",
        };
        f.write_str(s)
    }
}
