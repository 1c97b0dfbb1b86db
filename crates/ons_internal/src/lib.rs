//! This module is separated into its own crate to enable simple dynamic linking for `ons-rs`, and should not be used directly.

mod config;

/// `use ons_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use ons_fx;
pub use ons_types;
pub use ons_vfs;

pub use config::{Config, ConfigError, ENV_PREFIX, EffectConfig, ReaderConfig, ScreenConfig};
