//! CLI command implementations
//!
//! This module contains all command implementations for the hooky CLI.

pub mod add;
pub mod check;
pub mod configure;
pub mod install;
pub mod probe;
pub mod run;
pub mod status;
pub mod toggle;
pub mod uninstall;
