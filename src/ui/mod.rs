//! Terminal output helpers
//!
//! Styled output with `console`, with plain ASCII markers when stdout is not
//! a terminal or when running in CI.

mod context;
mod output;

pub use context::UiContext;
pub use output::{
    key_value, outro_error, outro_success, outro_warn, section, step_error_detail, step_ok_detail,
    step_warn, step_warn_hint,
};
