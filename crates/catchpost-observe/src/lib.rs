//! Observability setup for Catchpost: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
