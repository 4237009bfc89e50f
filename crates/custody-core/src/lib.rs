//! # custody-core — Foundational Types for the Custody Stack
//!
//! This crate is the bedrock of the Custody Stack. It defines the
//! type-system primitives shared by every other crate in the workspace;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Principal` and `AssetId`
//!    are distinct types with namespaced `Display` output. No bare strings
//!    or integers for identifiers.
//!
//! 2. **Closed stage taxonomy.** The custody `Role` enum is the single
//!    definition of the stage sequence. The transition table is
//!    `Role::next()` — there is no string-keyed stage name anywhere in the
//!    system, so a misspelled stage cannot exist.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and whole-second precision, so two records of the same instant
//!    always compare and serialize identically.
//!
//! 4. **Structured errors.** One `thiserror` enum per guard family, summed
//!    into `CustodyError`. A rejected operation and "no side effect
//!    occurred" are the same guarantee.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `custody-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement `Serialize`/`Deserialize`.

pub mod error;
pub mod identity;
pub mod role;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::{
    AuthorizationError, CustodyError, QuotaError, StateError, ValidationError,
};
pub use identity::{AssetId, Principal};
pub use role::Role;
pub use temporal::Timestamp;
