//! Storage port definitions.

pub mod draft_store;
