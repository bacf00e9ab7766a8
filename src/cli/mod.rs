//! Command-line interface: argument definitions and command entry points.

mod args;
pub mod build;
pub mod serve;

pub use args::{Cli, Commands};
