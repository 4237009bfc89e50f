//! # Per-Stage Transition Quotas
//!
//! Tracks and caps the number of transitions performed *out of* each
//! custody stage. The limiter exposes exactly one mutating operation —
//! an atomic check-and-increment — so counters cannot be bumped from
//! multiple code paths.
//!
//! ## Scoping
//!
//! Source systems disagree on whether the quota is shared across all
//! assets of a stage or counted per asset. [`QuotaScope`] makes the
//! policy configuration rather than assumption; the shared global counter
//! is the default.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use custody_core::{AssetId, QuotaError, Role};

/// How quota counters are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuotaScope {
    /// One shared counter per stage, across all assets.
    Global,
    /// An independent counter per (asset, stage) pair.
    PerAsset,
}

/// Configuration for the quota limiter.
///
/// Each stage is capped at `default_cap` unless `per_role` names an
/// override for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Cap applied to stages without an explicit override.
    pub default_cap: u32,
    /// Per-stage cap overrides.
    pub per_role: HashMap<Role, u32>,
    /// Counter scoping policy.
    pub scope: QuotaScope,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            // Cap observed across the source custody trackers.
            default_cap: 5,
            per_role: HashMap::new(),
            scope: QuotaScope::Global,
        }
    }
}

impl QuotaConfig {
    /// A configuration with the given uniform cap and default scope.
    pub fn with_cap(cap: u32) -> Self {
        Self {
            default_cap: cap,
            ..Self::default()
        }
    }

    /// Override the cap for one stage.
    pub fn role_cap(mut self, role: Role, cap: u32) -> Self {
        self.per_role.insert(role, cap);
        self
    }

    /// The effective cap for `role`.
    pub fn cap_for(&self, role: Role) -> u32 {
        self.per_role.get(&role).copied().unwrap_or(self.default_cap)
    }
}

/// Counter key: the asset component is used only under `PerAsset` scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum QuotaKey {
    Global(Role),
    PerAsset(AssetId, Role),
}

/// Check-and-increment quota limiter.
#[derive(Debug, Clone)]
pub struct QuotaLimiter {
    config: QuotaConfig,
    counters: HashMap<QuotaKey, u32>,
}

impl QuotaLimiter {
    /// Create a limiter with the given configuration.
    pub fn new(config: QuotaConfig) -> Self {
        Self {
            config,
            counters: HashMap::new(),
        }
    }

    /// Atomically consume one outbound-transition slot for `role`.
    ///
    /// Increments and succeeds while the counter is below the stage's
    /// cap; otherwise fails `QuotaError::Exceeded` with no mutation.
    pub fn try_consume(&mut self, role: Role, asset_id: AssetId) -> Result<(), QuotaError> {
        let cap = self.config.cap_for(role);
        let key = self.key(role, asset_id);
        let counter = self.counters.entry(key).or_insert(0);
        if *counter >= cap {
            return Err(QuotaError::Exceeded { role, cap });
        }
        *counter += 1;
        Ok(())
    }

    /// Slots already consumed for `role` under the configured scope.
    pub fn consumed(&self, role: Role, asset_id: AssetId) -> u32 {
        self.counters
            .get(&self.key(role, asset_id))
            .copied()
            .unwrap_or(0)
    }

    /// The effective cap for `role`.
    pub fn cap_for(&self, role: Role) -> u32 {
        self.config.cap_for(role)
    }

    /// The configured scoping policy.
    pub fn scope(&self) -> QuotaScope {
        self.config.scope
    }

    fn key(&self, role: Role, asset_id: AssetId) -> QuotaKey {
        match self.config.scope {
            QuotaScope::Global => QuotaKey::Global(role),
            QuotaScope::PerAsset => QuotaKey::PerAsset(asset_id, role),
        }
    }
}

impl Default for QuotaLimiter {
    fn default() -> Self {
        Self::new(QuotaConfig::default())
    }
}
