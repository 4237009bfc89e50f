//! # Deadline Evaluation
//!
//! Pure, side-effect-free deadline arithmetic over asset attributes.
//! The two deadlines play different parts: `expiry_at` gates every
//! transition, while `deliver_by_at` only classifies the final delivery.

use serde::{Deserialize, Serialize};

use custody_core::Timestamp;

use crate::asset::Asset;

/// Classification of the final transition into `Recipient`.
///
/// A late delivery still completes — the outcome is an observation, not
/// a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryOutcome {
    /// The final transition happened at or before `deliver_by_at`.
    OnTime,
    /// The final transition happened after `deliver_by_at`.
    Late,
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OnTime => "ON_TIME",
            Self::Late => "LATE",
        };
        f.write_str(s)
    }
}

/// Whether the asset's expiry deadline has passed at `now`.
///
/// Expiry is strict: a transition at exactly `expiry_at` is still valid.
pub fn is_expired(asset: &Asset, now: Timestamp) -> bool {
    now > asset.expiry_at()
}

/// Classify a delivery completed at `at` against the asset's deadline.
///
/// Computed only for the transition into `Recipient`.
pub fn delivery_outcome(asset: &Asset, at: Timestamp) -> DeliveryOutcome {
    if at <= asset.deliver_by_at() {
        DeliveryOutcome::OnTime
    } else {
        DeliveryOutcome::Late
    }
}
