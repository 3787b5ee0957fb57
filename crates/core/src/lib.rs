//! Core types and utilities for hooky
//!
//! This is the foundation crate (Layer 0) that all other hooky crates depend on.
//! It provides:
//! - Base error types
//! - The explicit memoization cache used by file discovery
//!
//! This crate has no dependencies on other hooky crates.

pub mod cache;
pub mod error;

pub use cache::Memo;
pub use error::{Error, Result};
