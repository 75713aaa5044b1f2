//! Local persistence layer.
//!
//! A JSON key/value file store and the settings accessors built on it. Writes
//! go to disk immediately.

pub mod settings;
pub mod store;
