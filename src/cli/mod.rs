//! Command-line interface for campaign-forge.
//!
//! Provides one-shot generation and an interactive generate/refine/rate loop.

mod commands;
pub mod interactive;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands, GenerateArgs, OracleArgs};
pub use interactive::{InteractiveShell, ShellCommand};
