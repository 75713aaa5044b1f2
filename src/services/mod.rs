//! Business logic layer.
//!
//! File intake, entry construction, the queue store, the progress simulator
//! and the queue manager that wires them together, plus preferences and the
//! storage usage summary. Called by the `commands` layer; delegates
//! persistence to the `storage` layer.

pub mod factory;
pub mod intake;
pub mod notify;
pub mod preferences;
pub mod preview;
pub mod simulator;
pub mod store;
pub mod upload_queue;
pub mod usage;
