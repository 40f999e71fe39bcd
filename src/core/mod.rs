//! Shared ambient pieces: configuration and the crate error type.
//!
//! Platform-agnostic: nothing here depends on a UI shell.

pub mod config;
pub mod errors;

pub use config::{BrushDefaults, CanvasConfig, InteractionConfig, WhiteBalanceConfig};
pub use errors::CanvasError;
