//! HTTP layer for Catchpost: the Telegram webhook and a liveness probe.

pub mod error;
pub mod handlers;
pub mod router;
