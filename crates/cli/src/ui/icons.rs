//! Status markers for terminal output
//!
//! Markers can be disabled via configuration (`ui.icons`), in which case
//! output carries no prefix.

/// Marker constants
pub struct Icons;

impl Icons {
    pub const STATUS_SUCCESS: &'static str = "[OK]";
    pub const STATUS_WARNING: &'static str = "[!]";
    pub const STATUS_ERROR: &'static str = "[X]";
    pub const STATUS_INFO: &'static str = "[i]";
    pub const STATUS_HOOK: &'static str = "[*]";
}

/// Status icon type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Success,
    Warning,
    Error,
    Info,
    Hook,
}

impl StatusIcon {
    /// Marker text, or an empty string when icons are disabled
    pub fn get(&self, show: bool) -> &'static str {
        if !show {
            return "";
        }
        match self {
            Self::Success => Icons::STATUS_SUCCESS,
            Self::Warning => Icons::STATUS_WARNING,
            Self::Error => Icons::STATUS_ERROR,
            Self::Info => Icons::STATUS_INFO,
            Self::Hook => Icons::STATUS_HOOK,
        }
    }

    /// Marker followed by a space, for prefixing a line
    pub fn prefix(&self, show: bool) -> String {
        if show {
            format!("{} ", self.get(true))
        } else {
            String::new()
        }
    }
}
