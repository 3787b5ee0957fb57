//! Terminal UI components for hooky

pub mod icons;

pub use icons::{Icons, StatusIcon};
