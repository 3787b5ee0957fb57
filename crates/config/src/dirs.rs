//! XDG directory utilities
//!
//! - `XDG_CONFIG_HOME` defaults to ~/.config

use std::path::PathBuf;
use xdg::BaseDirectories;

/// Get the hooky config directory
///
/// Returns `$XDG_CONFIG_HOME/hooky` or `~/.config/hooky`
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix("hooky").get_config_home()
}

/// Get the user-level config file path
///
/// Returns `$XDG_CONFIG_HOME/hooky/config.toml`
#[must_use]
pub fn user_config_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_user_config_file_under_config_dir() {
        if let (Some(dir), Some(file)) = (config_dir(), user_config_file()) {
            assert!(file.starts_with(&dir));
            assert!(dir.to_string_lossy().contains("hooky"));
            assert_eq!(file.file_name().unwrap(), "config.toml");
        }
    }
}
