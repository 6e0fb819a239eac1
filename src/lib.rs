//! devshell - reproducible native development shells
//!
//! Layers overlays on a pinned package channel, materializes the result for
//! one platform and composes the shell environment (library search path and
//! executable path) from declared build and runtime inputs.

pub mod cli;
pub mod compose;
pub mod config;
pub mod deps;
pub mod error;
pub mod eval;
pub mod overlay;
pub mod package_set;
pub mod platform;
pub mod repository;
pub mod shell;
pub mod ui;

pub use error::{DevshellError, DevshellResult};
