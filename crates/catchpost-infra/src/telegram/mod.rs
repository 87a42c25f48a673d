//! Telegram Bot API adapter.
//!
//! - [`types`]: wire structures for inbound updates and outbound calls.
//! - [`client`]: [`TelegramMessenger`](client::TelegramMessenger), the
//!   `Messenger` implementation.
//! - [`update`]: decoding of updates into transport-agnostic events.

pub mod client;
pub mod types;
pub mod update;
