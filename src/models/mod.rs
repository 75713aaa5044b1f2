//! Data models for the DropVault upload queue.
//!
//! Shared data structure definitions used across the crate: raw file handles
//! coming out of intake, tracked queue entries, and configuration types.

pub mod entry;
pub mod file;
pub mod settings;
pub mod upload;
