//! Command handlers - extracted from main.rs for testability
//!
//! Handlers return the text to print; `main` does the printing.

pub mod check;
pub mod compile;
pub mod config;

pub use check::execute_check;
pub use compile::execute_compile;
pub use config::execute_config;
