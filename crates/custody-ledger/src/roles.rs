//! # Identity Registry
//!
//! Binds each authenticated principal to exactly one custody role.
//! Authorization checks elsewhere in the ledger only ever need the
//! *current* role, so reassignment overwrites and no assignment history
//! is kept.
//!
//! The registry replaces the implicit contract-owner singleton: the
//! administrator is whichever principals currently hold `Originator`,
//! seeded once via [`IdentityRegistry::bootstrap`].

use std::collections::HashMap;

use custody_core::{AuthorizationError, Principal, Role};

/// Principal-to-role map with Originator-gated assignment.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    assignments: HashMap<Principal, Role>,
}

impl IdentityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the registry with its first `Originator`.
    ///
    /// Only valid while the registry is empty — every later grant must go
    /// through [`IdentityRegistry::assign`] under an existing Originator.
    pub fn bootstrap(&mut self, principal: Principal) -> Result<(), AuthorizationError> {
        if !self.assignments.is_empty() {
            return Err(AuthorizationError::AlreadyBootstrapped);
        }
        self.assignments.insert(principal, Role::Originator);
        Ok(())
    }

    /// Assign `role` to `target`, overwriting any prior assignment.
    ///
    /// Fails unless `admin` currently holds `Originator`.
    pub fn assign(
        &mut self,
        admin: &Principal,
        target: Principal,
        role: Role,
    ) -> Result<(), AuthorizationError> {
        if self.assignments.get(admin) != Some(&Role::Originator) {
            return Err(AuthorizationError::NotOriginator {
                principal: admin.clone(),
            });
        }
        self.assignments.insert(target, role);
        Ok(())
    }

    /// The role currently held by `principal`, if any.
    pub fn role_of(&self, principal: &Principal) -> Option<Role> {
        self.assignments.get(principal).copied()
    }

    /// Number of active role assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the registry holds no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
