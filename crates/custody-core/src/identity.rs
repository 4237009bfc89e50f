//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the two identifier namespaces of the Custody
//! Stack. You cannot pass a `Principal` where an `AssetId` is expected —
//! the type system keeps the namespaces apart.
//!
//! `Principal` is opaque: the stack consumes an already-authenticated
//! actor identifier and never looks inside it. How that identity was
//! proven is an external collaborator's concern.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated actor identifier (address-equivalent).
///
/// Supports equality and hashing only — there is no internal structure
/// the stack may rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(pub Uuid);

impl Principal {
    /// Generate a fresh principal identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}

/// Unique identifier for a tracked asset.
///
/// Allocated as a strictly increasing counter by the asset registry —
/// ids are never reused, and a later asset always has a larger id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AssetId(pub u64);

impl AssetId {
    /// Access the inner counter value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "asset:{}", self.0)
    }
}
