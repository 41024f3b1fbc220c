//! Command-line surface: argument parsing and shared display infrastructure.

pub mod args;
pub mod constants;
