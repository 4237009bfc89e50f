//! # Asset Registry
//!
//! Creates asset records with immutable identity and initial attributes.
//! Identifiers are a strictly increasing counter — never reused, never
//! reordered — so a later asset always has a larger id.

use std::collections::HashMap;

use custody_core::{AssetId, Timestamp, ValidationError};

use crate::asset::{Asset, AssetAttrs};

/// The asset table plus its monotonic id allocator.
///
/// No deletion operation exists; historical assets persist indefinitely.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: HashMap<AssetId, Asset>,
    next_id: u64,
}

impl AssetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new asset at the `Originator` stage.
    ///
    /// Both deadlines must be strictly in the future at `now`; otherwise
    /// the asset is not inserted and no id is consumed.
    pub fn create_at(
        &mut self,
        attrs: AssetAttrs,
        now: Timestamp,
    ) -> Result<AssetId, ValidationError> {
        if attrs.expiry_at <= now {
            return Err(ValidationError::ExpiryNotInFuture {
                expiry_at: attrs.expiry_at,
                now,
            });
        }
        if attrs.deliver_by_at <= now {
            return Err(ValidationError::DeliverByNotInFuture {
                deliver_by_at: attrs.deliver_by_at,
                now,
            });
        }
        self.next_id += 1;
        let id = AssetId(self.next_id);
        self.assets.insert(id, Asset::new(id, attrs, now));
        Ok(id)
    }

    /// Look up an asset by id.
    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    /// Mutable lookup — restricted to the ledger's commit path.
    pub(crate) fn get_mut(&mut self, id: AssetId) -> Option<&mut Asset> {
        self.assets.get_mut(&id)
    }

    /// Number of assets ever created.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the registry holds no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
