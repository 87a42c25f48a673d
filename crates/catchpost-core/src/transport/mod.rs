//! Messaging platform port and outbound delivery.
//!
//! - `messenger` -- the `Messenger` trait the platform client implements
//! - `delivery` -- turns wizard `Action`s into messenger calls

pub mod delivery;
pub mod messenger;

pub use messenger::Messenger;
