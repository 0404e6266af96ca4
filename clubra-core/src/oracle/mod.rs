//! Interfaces to the external solvers the engine consumes.
//!
//! A tour oracle supplies the Hamiltonian tour cut by
//! [`crate::TourClusterer`]; a cutset oracle supplies the vertex subsets ranked
//! by the cutset branching strategy. Both are traits with blanket
//! implementations for closures, and each ships a simple built-in
//! implementation so the engine runs without the external solvers.

mod cutset;
mod tour;

pub use self::{
    cutset::{Cutset, CutsetOracle, CutsetRequest, SupportComponentCutsets},
    tour::{NearestNeighbourTour, Tour, TourError, TourErrorCode, TourOracle},
};

#[cfg(test)]
mod tests;
