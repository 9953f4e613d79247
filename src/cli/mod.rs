//! CLI command handlers
//!
//! Each subcommand is implemented in its own module.

pub mod definitions;
pub mod syn_ant;
