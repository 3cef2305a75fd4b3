//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`limits`]: Queue and line length limits (LimitsConfig)
//! - [`validation`]: Startup validation

mod limits;
mod listen;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use types::Config;
pub use validation::validate;
