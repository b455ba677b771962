//! Core types, tracking registry, and model layer for tenet.
//!
//! This crate provides the foundational pieces shared by all tenet crates:
//! - [`types`]: Tracking keys, method definitions, and error types
//! - [`registry`]: The process-wide invocation [`Registry`](registry::Registry)
//! - [`allowlist`]: The frozen allow-list of legacy hand-written methods
//! - [`config`]: Configuration loading from `.tenet/tenet.json`
//! - [`model`]: The declarative model layer the conformance engines observe
//! - [`inflect`]: Naming inflections used to infer columns and target types

pub mod allowlist;
pub mod config;
pub mod inflect;
pub mod model;
pub mod registry;
pub mod types;
