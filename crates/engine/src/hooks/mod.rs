//! Git hook management
//!
//! - `registry`: the fixed table of git hooks
//! - `installer`: slot inspection, runner installation and scripts directories
//! - `discovery`: configured plugin scripts and where they are installed
//! - `mode`: whether the process runs standalone or on behalf of a hook
//! - `driver`: builds checks from plugins and runs them

pub mod discovery;
pub mod driver;
pub mod installer;
pub mod mode;
pub mod registry;

pub use discovery::{Plugin, PluginRegistry, SetupAction};
pub use driver::Driver;
pub use installer::{
    AssumeYes, Confirm, InstallOutcome, InstalledHook, RemoveOutcome, SlotState, RUNNER,
};
pub use mode::RunMode;
pub use registry::{HOOKS, HookSignature};
