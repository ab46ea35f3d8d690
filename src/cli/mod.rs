//! Command-line interface.

mod commands;

pub use commands::{is_verbose, run};
