//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use clubra_core::ClubraError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic instance generation failed.
    #[error("synthetic instance generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// The engine rejected the generated inputs.
    #[error("engine setup failed: {0}")]
    Engine(#[from] ClubraError),
}
