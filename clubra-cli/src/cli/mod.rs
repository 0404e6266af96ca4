//! Command-line interface for the clubra engine.
//!
//! `cluster` partitions an instance from its coordinates, `load` reads a
//! cluster or route file, `mincut` reports the global minimum cut of a
//! fractional solution and `rank` lists branching candidates for it.

mod commands;

pub use commands::{
    Cli, CliError, ClusterCommand, ClusteringArgs, Command, CommandOutput, LoadCommand, MinCutCommand,
    ModeArg, RankCommand, render_output, run_cli,
};
