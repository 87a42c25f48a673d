//! Infrastructure layer for Catchpost.
//!
//! Contains implementations of the port traits defined in `catchpost-core`:
//! SQLite draft storage, the Telegram Bot API messenger with update
//! decoding, and the configuration loader.

pub mod config;
pub mod sqlite;
pub mod telegram;
