//! Shared domain types for Catchpost.
//!
//! This crate contains the types used across the catch-report pipeline:
//! identities, the Draft answer set, wizard steps, option catalogs,
//! inbound/outbound event shapes, keyboards, configuration, and errors.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod catalog;
pub mod config;
pub mod draft;
pub mod error;
pub mod event;
pub mod ids;
pub mod keyboard;
pub mod step;
