//! Support library for the clubra CLI binary.
//!
//! Exposes the command pipeline and logging set-up so doctests and tests can
//! drive commands without spawning a process.

pub mod cli;
pub mod logging;
