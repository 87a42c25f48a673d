//! Moderation handoff.
//!
//! - `tickets` -- in-memory map from user to the moderator control message
//! - `coordinator` -- forward for review, approve/publish, reject

pub mod coordinator;
pub mod tickets;

pub use coordinator::{ModerationCoordinator, ModerationSettings, Resolution};
pub use tickets::ModerationTickets;
