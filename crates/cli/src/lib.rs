//! Operator commands for the Myco findings database.
//!
//! The `myco` binary parses [`cli::Cli`] and dispatches to [`commands`].

pub mod cli;
pub mod commands;
