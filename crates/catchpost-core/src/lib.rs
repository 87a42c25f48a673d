//! Business logic and port (trait) definitions for Catchpost.
//!
//! This crate defines the ports the infrastructure layer implements
//! (`DraftStore`, `Messenger`), the pure post renderer, the wizard state
//! machine with its step catalog, and the moderation coordinator. It
//! depends only on `catchpost-types` -- never on `catchpost-infra` or any
//! database/IO crate.

pub mod moderation;
pub mod render;
pub mod storage;
pub mod sync;
pub mod transport;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;
