//! Error types for the clubra core library.
//!
//! Each module reports its own error enum. [`ClubraError`] aggregates them for
//! callers that drive the whole engine, and [`ConfigError`] covers parameter
//! validation shared by the builders.

use thiserror::Error;

use crate::{
    branching::RankingError, files::ClusterFileError, graph::GraphError, mincut::MinCutError,
    oracle::TourError, partition::PartitionError, solution::SolutionError,
};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::std::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// Invalid parameter supplied to one of the configuration builders.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The standard-deviation multiplier must be finite.
    #[error("std_dev_multiplier must be finite (got {got})")]
    InvalidStdDevMultiplier {
        /// Rejected multiplier.
        got: f64,
    },
    /// The big-cluster size threshold must lie in `(0, 1]`.
    #[error("big_cluster_size_threshold must lie in (0, 1] (got {got})")]
    InvalidSizeThreshold {
        /// Rejected threshold.
        got: f64,
    },
    /// The cutoff decreasing step must be finite and strictly positive.
    #[error("decreasing_step must be finite and positive (got {got})")]
    InvalidDecreasingStep {
        /// Rejected step.
        got: f64,
    },
    /// The fractional clustering threshold must lie in `(0, 2]`.
    #[error("fractional clustering threshold must lie in (0, 2] (got {got})")]
    InvalidFractionalThreshold {
        /// Rejected threshold.
        got: f64,
    },
    /// The cutset boundary target must lie strictly between 2 and 4.
    #[error("cutset boundary target must lie in (2, 4) (got {got})")]
    InvalidBoundaryTarget {
        /// Rejected target.
        got: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConfigError`] variants.
    enum ConfigErrorCode for ConfigError {
        /// The standard-deviation multiplier must be finite.
        InvalidStdDevMultiplier => InvalidStdDevMultiplier { .. } => "CONFIG_INVALID_STD_DEV_MULTIPLIER",
        /// The big-cluster size threshold must lie in `(0, 1]`.
        InvalidSizeThreshold => InvalidSizeThreshold { .. } => "CONFIG_INVALID_SIZE_THRESHOLD",
        /// The cutoff decreasing step must be finite and strictly positive.
        InvalidDecreasingStep => InvalidDecreasingStep { .. } => "CONFIG_INVALID_DECREASING_STEP",
        /// The fractional clustering threshold must lie in `(0, 2]`.
        InvalidFractionalThreshold => InvalidFractionalThreshold { .. } => "CONFIG_INVALID_FRACTIONAL_THRESHOLD",
        /// The cutset boundary target must lie strictly between 2 and 4.
        InvalidBoundaryTarget => InvalidBoundaryTarget { .. } => "CONFIG_INVALID_BOUNDARY_TARGET",
    }
}

/// Error type aggregating every failure the engine can report.
///
/// None of these are retried: a caller that receives one is expected to stop
/// the computation it was driving.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClubraError {
    /// Configuration validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Graph construction failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// A cluster partition precondition was violated.
    #[error(transparent)]
    Partition(#[from] PartitionError),
    /// A fractional solution was malformed.
    #[error(transparent)]
    Solution(#[from] SolutionError),
    /// A tour oracle result was unusable.
    #[error(transparent)]
    Tour(#[from] TourError),
    /// The minimum cut could not be computed.
    #[error(transparent)]
    MinCut(#[from] MinCutError),
    /// Candidate ranking inputs were inconsistent.
    #[error(transparent)]
    Ranking(#[from] RankingError),
    /// A cluster, route or solution file could not be loaded.
    #[error(transparent)]
    ClusterFile(#[from] ClusterFileError),
}

define_error_codes! {
    /// Stable codes describing [`ClubraError`] variants.
    enum ClubraErrorCode for ClubraError {
        /// Configuration validation failed.
        Config => Config(..) => "CLUBRA_CONFIG",
        /// Graph construction failed.
        Graph => Graph(..) => "CLUBRA_GRAPH",
        /// A cluster partition precondition was violated.
        Partition => Partition(..) => "CLUBRA_PARTITION",
        /// A fractional solution was malformed.
        Solution => Solution(..) => "CLUBRA_SOLUTION",
        /// A tour oracle result was unusable.
        Tour => Tour(..) => "CLUBRA_TOUR",
        /// The minimum cut could not be computed.
        MinCut => MinCut(..) => "CLUBRA_MIN_CUT",
        /// Candidate ranking inputs were inconsistent.
        Ranking => Ranking(..) => "CLUBRA_RANKING",
        /// A cluster, route or solution file could not be loaded.
        ClusterFile => ClusterFile(..) => "CLUBRA_CLUSTER_FILE",
    }
}

/// Convenient alias for results returned by the engine-level API.
pub type Result<T> = core::result::Result<T, ClubraError>;
