//! Command implementations.
//!
//! Each submodule owns one subcommand: translate arguments, call into
//! `planter-core` / `planter-adapters`, and display results.  No planning
//! logic lives here.

pub mod apply;
pub mod check;
pub mod completions;
pub mod config;
pub mod plan;
pub mod tree;
