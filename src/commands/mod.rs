//! Command handlers consumed by the presentation layer.
//!
//! Handlers perform parameter handling and forward to the `services` layer;
//! they hold no business logic. Errors cross this boundary as strings.

pub mod settings;
pub mod upload;
