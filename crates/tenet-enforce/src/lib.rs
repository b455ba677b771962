//! Conformance engines for tenet.
//!
//! Each check produces violations that locate the offending declaration:
//! - D001: hand-written instance method on a model, not in the allow-list
//! - A001: relationship is missing its foreign-key column
//! - A002: polymorphic relationship is missing its type column
//! - A003: relationship has no resolvable inverse
//! - A004: declared inverse is inconsistent with the relationship
//! - A005: association accessor fails on an empty instance
//! - A006: through-relationship refers to a missing association
//! - C001: controller exposes a non-standard action
//! - U001: pinned behavior needs review after a framework upgrade
//!
//! Invocation tracking lives in [`intercept`]: a decorator over the model
//! layer's declaration surface that counts calls to generated scopes and
//! delegations.

pub mod actions;
pub mod defs;
pub mod engine;
pub mod intercept;
pub mod relationships;
pub mod tracking;
pub mod types;
pub mod upgrade;
