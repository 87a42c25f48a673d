//! SQLite storage.

pub mod draft;
pub mod pool;
