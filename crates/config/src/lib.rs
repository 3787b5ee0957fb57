//! Configuration management for hooky
//!
//! This crate handles:
//! - Configuration loading from `.hooky.toml` and the user config file
//! - XDG directory management
//! - Logging initialization

pub mod config;
pub mod dirs;
pub mod logging;

// Re-export error types from core
pub use hooky_core::{Error, Result};

// Re-export main types
pub use config::{Config, GeneralConfig, IconMode, LinkMode, PluginConfig, UiConfig};
pub use dirs::{config_dir, user_config_file};
