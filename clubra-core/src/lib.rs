//! Clubra core library.
//!
//! Graph decomposition and branching-candidate engine for branch-and-price
//! vehicle routing. Given a routing instance and the fractional edge values of
//! a relaxation, the crate produces:
//!
//! - customer clusters, either by single linkage over a minimum spanning tree
//!   or by cutting a Hamiltonian tour, or driven by the fractional solution
//!   itself ([`clustering`]);
//! - the global minimum cut of the fractional support graph ([`mincut`]);
//! - a ranked list of branching disjunctions built from clusters, cutsets and
//!   costly fractional edges ([`branching`]).
//!
//! All computations are synchronous. State that must outlive a single call,
//! such as the cutset ordinal table, lives in an explicit
//! [`BranchingSession`] owned by the caller.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod branching;
pub mod clustering;
mod error;
pub mod files;
mod geometry;
pub mod graph;
pub mod mincut;
mod mst;
pub mod oracle;
mod partition;
mod solution;

pub use crate::{
    branching::{
        BranchingCandidateRanker, BranchingConfig, BranchingConfigBuilder, BranchingDisjunction,
        BranchingSession, BranchingStrategy, CandidateKind, LinearExpression, RankingError,
        RankingErrorCode, RankingInput,
    },
    clustering::{
        ClusteringMode, ClusteringParams, ClusteringParamsBuilder, ClusteringSummary,
        FractionalClustering, FractionalClusteringConfig, SingleLinkageClusterer, TourClusterer,
    },
    error::{ClubraError, ClubraErrorCode, ConfigError, ConfigErrorCode, Result},
    files::{ClusterFileError, ClusterFileErrorCode},
    geometry::{EuclideanDistances, Point, Rounding},
    graph::{GraphError, GraphErrorCode, UnionFind, WeightedEdge, WeightedGraph},
    mincut::{Cut, MinCutError, MinCutErrorCode, MinCutResult},
    mst::{SpanningTree, kruskal},
    partition::{Cluster, ClusterId, ClusterPartition, PartitionError, PartitionErrorCode},
    solution::{FractionalSolution, SolutionError, SolutionErrorCode},
};
