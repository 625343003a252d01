//! Tooling & Integration Layer
//!
//! Command-line surface over the registry facade.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
