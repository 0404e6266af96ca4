//! Text formats exchanged with the rest of the routing toolchain.
//!
//! - Cluster files: a header with `DIMENSION`, `CLUSTERING_ALG` and
//!   `CLUSTERING_PARAMS`, then a `CLUSTERS` section of lines
//!   `<id> <node> <node> ...` closed by `EOF`.
//! - Route files in the CVRPLIB solution layout, `Route #k: <node> ...`; each
//!   route becomes one route cluster.
//! - Fractional solutions as `<i> <j> <value>` lines.
//! - Coordinates as `<x> <y> [demand]` lines, the depot first.
//!
//! Parsers work on text so they can be tested without touching the disk;
//! the `load_*` wrappers add file access and tracing.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::{
    error::define_error_codes,
    geometry::Point,
    partition::{ClusterPartition, PartitionError},
    solution::{FractionalSolution, SolutionError},
};

/// Errors raised while reading cluster, route, coordinate or solution files.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClusterFileError {
    /// The file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The header never declares `DIMENSION`.
    #[error("no DIMENSION specified")]
    MissingDimension,
    /// The `DIMENSION` line is malformed or declares zero nodes.
    #[error("cannot read DIMENSION on line {line}")]
    InvalidDimension {
        /// One-based line number.
        line: usize,
    },
    /// No `CLUSTERS` section follows the header.
    #[error("no CLUSTERS section found")]
    MissingClustersSection,
    /// A node token is not a non-negative integer.
    #[error("invalid node `{token}` on line {line_number}")]
    InvalidNode {
        /// One-based line number.
        line_number: usize,
        /// Offending token.
        token: String,
    },
    /// The clusters list a different number of nodes than declared.
    #[error(
        "clusters list {listed} nodes but DIMENSION declares {declared} and the instance has {expected}"
    )]
    DimensionMismatch {
        /// Value of the `DIMENSION` header.
        declared: usize,
        /// Total number of node entries across all clusters.
        listed: usize,
        /// Nodes in the instance, depot included.
        expected: usize,
    },
    /// A solution line is not `<i> <j> <value>`.
    #[error("expected `<i> <j> <value>` on line {line_number}")]
    InvalidSolutionLine {
        /// One-based line number.
        line_number: usize,
    },
    /// A coordinate line is not `<x> <y> [demand]`.
    #[error("expected `<x> <y> [demand]` on line {line_number}")]
    InvalidCoordinateLine {
        /// One-based line number.
        line_number: usize,
    },
    /// The listed clusters do not form a valid partition.
    #[error(transparent)]
    Partition(#[from] PartitionError),
    /// The listed values do not form a valid solution.
    #[error(transparent)]
    Solution(#[from] SolutionError),
}

define_error_codes! {
    /// Stable codes describing [`ClusterFileError`] variants.
    enum ClusterFileErrorCode for ClusterFileError {
        /// The file could not be read.
        Io => Io { .. } => "CLUSTER_FILE_IO",
        /// The header never declares `DIMENSION`.
        MissingDimension => MissingDimension => "CLUSTER_FILE_MISSING_DIMENSION",
        /// The `DIMENSION` line is malformed.
        InvalidDimension => InvalidDimension { .. } => "CLUSTER_FILE_INVALID_DIMENSION",
        /// No `CLUSTERS` section follows the header.
        MissingClustersSection => MissingClustersSection => "CLUSTER_FILE_MISSING_CLUSTERS",
        /// A node token is not a non-negative integer.
        InvalidNode => InvalidNode { .. } => "CLUSTER_FILE_INVALID_NODE",
        /// The clusters list a different number of nodes than declared.
        DimensionMismatch => DimensionMismatch { .. } => "CLUSTER_FILE_DIMENSION_MISMATCH",
        /// A solution line is malformed.
        InvalidSolutionLine => InvalidSolutionLine { .. } => "CLUSTER_FILE_INVALID_SOLUTION_LINE",
        /// A coordinate line is malformed.
        InvalidCoordinateLine => InvalidCoordinateLine { .. } => "CLUSTER_FILE_INVALID_COORDINATE_LINE",
        /// The listed clusters do not form a valid partition.
        Partition => Partition(..) => "CLUSTER_FILE_PARTITION",
        /// The listed values do not form a valid solution.
        Solution => Solution(..) => "CLUSTER_FILE_SOLUTION",
    }
}

/// Contents of a cluster-definition file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterFile {
    dimension: usize,
    algorithm: Option<String>,
    parameters: Option<String>,
    clusters: Vec<Vec<usize>>,
}

impl ClusterFile {
    /// Returns the declared `DIMENSION`.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the `CLUSTERING_ALG` header value.
    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }

    /// Returns the `CLUSTERING_PARAMS` header value.
    #[must_use]
    pub fn parameters(&self) -> Option<&str> {
        self.parameters.as_deref()
    }

    /// Returns the cluster member lists in file order.
    #[must_use]
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Returns the total number of node entries across all clusters.
    #[must_use]
    pub fn listed_nodes(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum()
    }

    /// Checks the node count against `customer_count` and builds the
    /// partition, numbering clusters from `1` in file order.
    ///
    /// # Errors
    /// Returns [`ClusterFileError::DimensionMismatch`] unless the listed node
    /// count equals both `DIMENSION` and `customer_count + 1`, and
    /// [`ClusterFileError::Partition`] for invalid member lists.
    pub fn into_partition(self, customer_count: usize) -> Result<ClusterPartition, ClusterFileError> {
        let listed = self.listed_nodes();
        let expected = customer_count + 1;
        if listed != self.dimension || listed != expected {
            return Err(ClusterFileError::DimensionMismatch {
                declared: self.dimension,
                listed,
                expected,
            });
        }
        Ok(ClusterPartition::from_clusters(expected, self.clusters)?)
    }
}

fn header_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.trim()
        .strip_prefix(key)?
        .trim_start()
        .strip_prefix(':')
        .map(str::trim)
}

fn parse_nodes<'a>(
    tokens: impl Iterator<Item = &'a str>,
    line_number: usize,
) -> Result<Vec<usize>, ClusterFileError> {
    tokens
        .map(|token| {
            token.parse().map_err(|_| ClusterFileError::InvalidNode {
                line_number,
                token: token.to_owned(),
            })
        })
        .collect()
}

/// Parses the text of a cluster-definition file.
///
/// The first token of every cluster line is the cluster label and is
/// ignored. The section ends at a line starting with `EOF` or at the end of
/// the text.
///
/// # Errors
/// Returns [`ClusterFileError::MissingDimension`],
/// [`ClusterFileError::InvalidDimension`],
/// [`ClusterFileError::MissingClustersSection`] or
/// [`ClusterFileError::InvalidNode`] for malformed input.
///
/// # Examples
/// ```
/// use clubra_core::files::parse_clusters;
///
/// let file = parse_clusters(
///     "DIMENSION : 4\nCLUSTERING_ALG : mst\nCLUSTERS\n1 0\n2 1 2\n3 3\nEOF\n",
/// )
/// .expect("well-formed file");
/// assert_eq!(file.dimension(), 4);
/// assert_eq!(file.algorithm(), Some("mst"));
/// assert_eq!(file.clusters(), &[vec![0], vec![1, 2], vec![3]]);
/// ```
pub fn parse_clusters(text: &str) -> Result<ClusterFile, ClusterFileError> {
    let mut file = ClusterFile::default();
    let mut dimension = None;
    let mut lines = text.lines().enumerate().map(|(index, line)| (index + 1, line));

    let mut found_section = false;
    for (line_number, line) in lines.by_ref() {
        if let Some(value) = header_value(line, "DIMENSION") {
            let declared = value
                .parse::<usize>()
                .ok()
                .filter(|&declared| declared > 0)
                .ok_or(ClusterFileError::InvalidDimension { line: line_number })?;
            dimension = Some(declared);
        } else if let Some(value) = header_value(line, "CLUSTERING_ALG") {
            file.algorithm = Some(value.to_owned());
        } else if let Some(value) = header_value(line, "CLUSTERING_PARAMS") {
            file.parameters = Some(value.to_owned());
        } else if line.trim_start().starts_with("CLUSTERS") {
            found_section = true;
            break;
        }
    }
    file.dimension = dimension.ok_or(ClusterFileError::MissingDimension)?;
    if !found_section {
        return Err(ClusterFileError::MissingClustersSection);
    }

    for (line_number, line) in lines {
        let trimmed = line.trim();
        if trimmed.starts_with("EOF") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        file.clusters
            .push(parse_nodes(trimmed.split_whitespace().skip(1), line_number)?);
    }
    Ok(file)
}

/// Parses route lines into cluster member lists.
///
/// Every line containing `Route` contributes the tokens after its second
/// one; parsing stops at a line containing `CLUSTERS`. Empty routes are
/// skipped.
///
/// # Errors
/// Returns [`ClusterFileError::InvalidNode`] for non-numeric node tokens.
///
/// # Examples
/// ```
/// use clubra_core::files::parse_route_clusters;
///
/// let routes = parse_route_clusters("Route #1: 3 1\nRoute #2: 2 4\nCost 120\n")
///     .expect("well-formed routes");
/// assert_eq!(routes, vec![vec![3, 1], vec![2, 4]]);
/// ```
pub fn parse_route_clusters(text: &str) -> Result<Vec<Vec<usize>>, ClusterFileError> {
    let mut routes = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.contains("CLUSTERS") {
            break;
        }
        if !line.contains("Route") {
            continue;
        }
        let nodes = parse_nodes(line.split_whitespace().skip(2), index + 1)?;
        if nodes.is_empty() {
            debug!(line = index + 1, "empty route skipped");
            continue;
        }
        routes.push(nodes);
    }
    Ok(routes)
}

/// Parses `<i> <j> <value>` lines into a solution.
///
/// Blank lines and lines starting with `#` are skipped. Without an explicit
/// `node_count` the solution spans the largest listed index.
///
/// # Errors
/// Returns [`ClusterFileError::InvalidSolutionLine`] for malformed lines and
/// [`ClusterFileError::Solution`] for indices outside `node_count` or
/// non-finite values.
pub fn parse_fractional_solution(
    text: &str,
    node_count: Option<usize>,
) -> Result<FractionalSolution, ClusterFileError> {
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let invalid = || ClusterFileError::InvalidSolutionLine {
            line_number: index + 1,
        };
        let mut tokens = trimmed.split_whitespace();
        let (Some(i), Some(j), Some(value), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(invalid());
        };
        entries.push((
            i.parse::<usize>().map_err(|_| invalid())?,
            j.parse::<usize>().map_err(|_| invalid())?,
            value.parse::<f64>().map_err(|_| invalid())?,
        ));
    }
    let node_count = node_count.unwrap_or_else(|| {
        entries
            .iter()
            .map(|&(i, j, _)| i.max(j) + 1)
            .max()
            .unwrap_or(0)
    });
    Ok(FractionalSolution::from_edges(node_count, entries)?)
}

/// Node coordinates and demands, the depot first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coordinates {
    points: Vec<Point>,
    demands: Vec<f64>,
}

impl Coordinates {
    /// Returns the node locations.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the node demands; missing demands read as `0`.
    #[must_use]
    pub fn demands(&self) -> &[f64] {
        &self.demands
    }

    /// Returns the number of customers.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Consumes the file, returning points and demands.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Point>, Vec<f64>) {
        (self.points, self.demands)
    }
}

/// Parses `<x> <y> [demand]` lines. Blank lines and `#` comments are
/// skipped.
///
/// # Errors
/// Returns [`ClusterFileError::InvalidCoordinateLine`] for malformed lines.
pub fn parse_coordinates(text: &str) -> Result<Coordinates, ClusterFileError> {
    let mut coordinates = Coordinates::default();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let values: Vec<f64> = trimmed
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<_, _>>()
            .map_err(|_| ClusterFileError::InvalidCoordinateLine {
                line_number: index + 1,
            })?;
        let (x, y, demand) = match values.as_slice() {
            &[x, y] => (x, y, 0.0),
            &[x, y, demand] => (x, y, demand),
            _ => {
                return Err(ClusterFileError::InvalidCoordinateLine {
                    line_number: index + 1,
                });
            }
        };
        coordinates.points.push(Point::new(x, y));
        coordinates.demands.push(demand);
    }
    Ok(coordinates)
}

fn read(path: &Path) -> Result<String, ClusterFileError> {
    fs::read_to_string(path).map_err(|source| ClusterFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a cluster-definition file for an instance with `customer_count`
/// customers.
///
/// # Errors
/// Returns [`ClusterFileError::Io`] when the file cannot be read and the
/// errors of [`parse_clusters`] and [`ClusterFile::into_partition`].
#[instrument(name = "files.load_clusters", skip(path), fields(file = %path.display()), err)]
pub fn load_clusters(path: &Path, customer_count: usize) -> Result<ClusterPartition, ClusterFileError> {
    let file = parse_clusters(&read(path)?)?;
    info!(
        algorithm = file.algorithm().unwrap_or_default(),
        parameters = file.parameters().unwrap_or_default(),
        clusters = file.clusters().len(),
        "clusters defined by file"
    );
    file.into_partition(customer_count)
}

/// Loads a route file as route clusters over `customer_count` customers.
///
/// Route `k` becomes cluster `k`. The depot belongs to no route, so the
/// result is meant for [`RankingInput::with_routes`] rather than as the
/// cluster partition being ranked.
///
/// [`RankingInput::with_routes`]: crate::branching::RankingInput::with_routes
///
/// # Errors
/// Returns [`ClusterFileError::Io`] when the file cannot be read,
/// [`ClusterFileError::InvalidNode`] for malformed routes and
/// [`ClusterFileError::Partition`] for nodes outside the instance.
#[instrument(name = "files.load_route_clusters", skip(path), fields(file = %path.display()), err)]
pub fn load_route_clusters(
    path: &Path,
    customer_count: usize,
) -> Result<ClusterPartition, ClusterFileError> {
    let routes = parse_route_clusters(&read(path)?)?;
    info!(routes = routes.len(), "route clusters loaded");
    Ok(ClusterPartition::from_clusters(customer_count + 1, routes)?)
}

/// Loads a fractional solution file.
///
/// # Errors
/// Returns [`ClusterFileError::Io`] when the file cannot be read and the
/// errors of [`parse_fractional_solution`].
pub fn read_fractional_solution(
    path: &Path,
    node_count: Option<usize>,
) -> Result<FractionalSolution, ClusterFileError> {
    parse_fractional_solution(&read(path)?, node_count)
}

/// Loads a coordinate file.
///
/// # Errors
/// Returns [`ClusterFileError::Io`] when the file cannot be read and the
/// errors of [`parse_coordinates`].
pub fn load_coordinates(path: &Path) -> Result<Coordinates, ClusterFileError> {
    parse_coordinates(&read(path)?)
}

/// Writes `partition` as a cluster-definition file that
/// [`parse_clusters`] reads back.
///
/// # Errors
/// Propagates failures of `out`.
pub fn write_partition<W: Write>(
    out: &mut W,
    partition: &ClusterPartition,
    algorithm: &str,
    parameters: &str,
) -> io::Result<()> {
    let listed: usize = partition.clusters().iter().map(|cluster| cluster.len()).sum();
    writeln!(out, "DIMENSION : {listed}")?;
    writeln!(out, "CLUSTERING_ALG : {algorithm}")?;
    writeln!(out, "CLUSTERING_PARAMS : {parameters}")?;
    writeln!(out, "CLUSTERS")?;
    for cluster in partition.clusters() {
        write!(out, "{}", cluster.id())?;
        for node in cluster.members() {
            write!(out, " {node}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "EOF")
}

/// Writes the strictly positive entries of `solution` as `<i> <j> <value>`
/// lines with `i < j`.
///
/// # Errors
/// Propagates failures of `out`.
pub fn write_fractional_solution<W: Write>(
    out: &mut W,
    solution: &FractionalSolution,
) -> io::Result<()> {
    for (i, j, value) in solution.positive_edges() {
        writeln!(out, "{i} {j} {value}")?;
    }
    Ok(())
}
