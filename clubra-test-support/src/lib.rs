//! Shared test utilities used across clubra crates.
//!
//! [`tracing::RecordingLayer`] captures spans and events so tests can assert
//! instrumentation, and [`instances`] holds small routing instances whose
//! clusters, cuts and candidates are known by hand. Instances are plain data
//! so the crate does not depend on `clubra-core`.

pub mod instances;
pub mod tracing;
