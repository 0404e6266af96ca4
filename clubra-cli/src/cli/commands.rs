//! Command implementations and argument parsing for the clubra CLI.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use clubra_core::{
    BranchingCandidateRanker, BranchingConfigBuilder, BranchingDisjunction, BranchingSession,
    BranchingStrategy, ClubraError, ClusterPartition, ClusteringMode, ClusteringParams,
    ClusteringParamsBuilder, ConfigError, EuclideanDistances, FractionalSolution, MinCutResult,
    RankingInput, Rounding,
    clustering::cluster_instance,
    files::{
        Coordinates, load_clusters, load_coordinates, load_route_clusters,
        read_fractional_solution, write_fractional_solution, write_partition,
    },
    mincut::customer_min_cut,
    oracle::{CutsetOracle, CutsetRequest, NearestNeighbourTour, SupportComponentCutsets},
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_MAX_EDGE_CANDIDATES: usize = 10;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "clubra",
    about = "Cluster routing instances and rank branching candidates."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster an instance from its coordinate file.
    Cluster(ClusterCommand),
    /// Load a cluster-definition or route file.
    Load(LoadCommand),
    /// Compute the global minimum cut over the customers of a solution.
    Mincut(MinCutCommand),
    /// Rank branching candidates for a fractional solution.
    Rank(RankCommand),
}

impl Command {
    const fn label(&self) -> &'static str {
        match self {
            Self::Cluster(_) => "cluster",
            Self::Load(_) => "load",
            Self::Mincut(_) => "mincut",
            Self::Rank(_) => "rank",
        }
    }
}

/// How customer clusters are built from coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Cut the minimum spanning tree.
    #[default]
    SingleLinkage,
    /// Cut a Hamiltonian tour.
    Tour,
    /// Tree clusters followed by the distinct tour clusters.
    Both,
}

impl From<ModeArg> for ClusteringMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::SingleLinkage => Self::SingleLinkage,
            ModeArg::Tour => Self::Tour,
            ModeArg::Both => Self::Both,
        }
    }
}

/// Clustering parameters shared by `cluster` and `rank`.
#[derive(Debug, Args, Clone)]
pub struct ClusteringArgs {
    /// Clustering algorithm.
    #[arg(long, value_enum, default_value_t = ModeArg::SingleLinkage)]
    pub mode: ModeArg,

    /// Initial standard-deviation multiplier for the tree cutoff.
    #[arg(long, default_value_t = 1.5)]
    pub std_dev_multiplier: f64,

    /// Initial standard-deviation multiplier for the tour cutoff.
    #[arg(long, default_value_t = 1.5)]
    pub tour_std_dev_multiplier: f64,

    /// Largest cluster as a fraction of the customers.
    #[arg(long = "size-threshold", default_value_t = 0.4)]
    pub size_threshold: f64,

    /// Multiplier decrement applied while the cutoff exceeds every edge.
    #[arg(long, default_value_t = 0.25)]
    pub decreasing_step: f64,

    /// Keep clusters larger than the size threshold.
    #[arg(long)]
    pub allow_big_clusters: bool,

    /// Keep single-customer clusters.
    #[arg(long)]
    pub allow_singletons: bool,

    /// Round distances to the nearest integer.
    #[arg(long)]
    pub round: bool,
}

impl ClusteringArgs {
    fn params(&self) -> Result<ClusteringParams, ConfigError> {
        ClusteringParamsBuilder::new()
            .with_std_dev_multiplier(self.std_dev_multiplier)
            .with_tour_std_dev_multiplier(self.tour_std_dev_multiplier)
            .with_big_cluster_size_threshold(self.size_threshold)
            .with_decreasing_step(self.decreasing_step)
            .with_enable_big_clusters(self.allow_big_clusters)
            .with_enable_singletons(self.allow_singletons)
            .build()
    }

    const fn rounding(&self) -> Rounding {
        if self.round {
            Rounding::NearestInteger
        } else {
            Rounding::Exact
        }
    }

    fn describe(&self) -> String {
        format!(
            "std_dev_multiplier={} tour_std_dev_multiplier={} size_threshold={} decreasing_step={} big_clusters={} singletons={}",
            self.std_dev_multiplier,
            self.tour_std_dev_multiplier,
            self.size_threshold,
            self.decreasing_step,
            self.allow_big_clusters,
            self.allow_singletons,
        )
    }
}

/// Options accepted by the `cluster` command.
#[derive(Debug, Args, Clone)]
pub struct ClusterCommand {
    /// Coordinate file with `<x> <y> [demand]` lines, depot first.
    pub coords: PathBuf,

    /// Clustering parameters.
    #[command(flatten)]
    pub clustering: ClusteringArgs,

    /// Also write the clusters as a cluster-definition file.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Options accepted by the `load` command.
#[derive(Debug, Args, Clone)]
pub struct LoadCommand {
    /// Cluster-definition or route file.
    pub path: PathBuf,

    /// Number of customers in the instance.
    #[arg(long)]
    pub customers: usize,

    /// Read `Route #k:` lines instead of a cluster-definition file.
    #[arg(long)]
    pub routes: bool,
}

/// Options accepted by the `mincut` command.
#[derive(Debug, Args, Clone)]
pub struct MinCutCommand {
    /// Solution file with `<i> <j> <value>` lines.
    pub solution: PathBuf,

    /// Nodes in the instance, depot included; inferred when omitted.
    #[arg(long)]
    pub nodes: Option<usize>,
}

/// Options accepted by the `rank` command.
#[derive(Debug, Args, Clone)]
#[command(group(
    ArgGroup::new("partition_source")
        .required(true)
        .multiple(true)
        .args(["clusters", "routes", "coords"])
))]
pub struct RankCommand {
    /// Solution file with `<i> <j> <value>` lines.
    pub solution: PathBuf,

    /// Cluster-definition file providing the partition.
    #[arg(long)]
    pub clusters: Option<PathBuf>,

    /// Route file supplying the route clusters of `route-degree` branching.
    #[arg(long)]
    pub routes: Option<PathBuf>,

    /// Coordinate file; supplies edge costs and demands, and the partition
    /// when no cluster file is given.
    #[arg(long)]
    pub coords: Option<PathBuf>,

    /// Nodes in the instance, depot included; inferred when omitted.
    #[arg(long)]
    pub nodes: Option<usize>,

    /// Enabled strategies; defaults to `cluster-degree,aggregate`, plus
    /// `route-degree` when a route file is given.
    #[arg(long = "strategy", value_delimiter = ',')]
    pub strategies: Vec<BranchingStrategy>,

    /// Cap on costly-edge candidates.
    #[arg(long, default_value_t = DEFAULT_MAX_EDGE_CANDIDATES)]
    pub max_edge_candidates: usize,

    /// Keep cutsets that equal a cluster.
    #[arg(long)]
    pub keep_duplicate_cutsets: bool,

    /// Vehicle capacity; separates support-graph cutsets when set.
    #[arg(long, requires = "coords")]
    pub capacity: Option<f64>,

    /// Cap on separated cutsets.
    #[arg(long, requires = "capacity")]
    pub max_cutsets: Option<usize>,

    /// Write the root solution here before ranking.
    #[arg(long)]
    pub save_root: Option<PathBuf>,

    /// Clustering parameters used with `--coords`.
    #[command(flatten)]
    pub clustering: ClusteringArgs,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing an output file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The engine rejected the inputs.
    #[error(transparent)]
    Core(#[from] ClubraError),
}

impl CliError {
    fn core(err: impl Into<ClubraError>) -> Self {
        Self::Core(err.into())
    }
}

/// Result of a command, ready to render.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// Clusters of `cluster` and `load`.
    Partition(ClusterPartition),
    /// Minimum cut of `mincut`.
    MinCut(MinCutResult),
    /// Ranked candidates of `rank`.
    Ranking(Vec<BranchingDisjunction>),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when an input cannot be read or an output cannot be
/// written, or when the engine rejects the inputs.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clubra_cli::cli::{Cli, Command, CommandOutput, LoadCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "Route #1: 1 2\nRoute #2: 3\n")?;
/// let cli = Cli {
///     command: Command::Load(LoadCommand {
///         path: file.path().to_path_buf(),
///         customers: 3,
///         routes: true,
///     }),
/// };
/// let CommandOutput::Partition(partition) = run_cli(cli)? else {
///     panic!("load returns a partition");
/// };
/// assert_eq!(partition.len(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutput, CliError> {
    Span::current().record("command", field::display(cli.command.label()));
    match cli.command {
        Command::Cluster(command) => run_cluster(&command),
        Command::Load(command) => run_load(&command),
        Command::Mincut(command) => run_mincut(&command),
        Command::Rank(command) => run_rank(&command),
    }
}

fn distances_of(coordinates: &Coordinates, args: &ClusteringArgs) -> EuclideanDistances {
    EuclideanDistances::new(coordinates.points().to_vec()).with_rounding(args.rounding())
}

fn partition_from_coordinates(
    distances: &EuclideanDistances,
    args: &ClusteringArgs,
) -> Result<ClusterPartition, CliError> {
    let params = args.params().map_err(CliError::core)?;
    let summary = cluster_instance(
        distances,
        &params,
        args.mode.into(),
        &NearestNeighbourTour::new(args.rounding()),
    )?;
    Ok(summary.into_partition())
}

#[instrument(name = "cli.cluster", err, skip(command), fields(path = %command.coords.display()))]
pub(super) fn run_cluster(command: &ClusterCommand) -> Result<CommandOutput, CliError> {
    let coordinates = load_coordinates(&command.coords).map_err(CliError::core)?;
    let distances = distances_of(&coordinates, &command.clustering);
    let partition = partition_from_coordinates(&distances, &command.clustering)?;
    if let Some(path) = &command.output {
        let algorithm = command
            .clustering
            .mode
            .to_possible_value()
            .map_or_else(String::new, |value| value.get_name().to_owned());
        let parameters = command.clustering.describe();
        write_file(path, |out| write_partition(out, &partition, &algorithm, &parameters))?;
        info!(path = %path.display(), "cluster file written");
    }
    Ok(CommandOutput::Partition(partition))
}

#[instrument(name = "cli.load", err, skip(command), fields(path = %command.path.display()))]
pub(super) fn run_load(command: &LoadCommand) -> Result<CommandOutput, CliError> {
    let partition = if command.routes {
        load_route_clusters(&command.path, command.customers)
    } else {
        load_clusters(&command.path, command.customers)
    }
    .map_err(CliError::core)?;
    Ok(CommandOutput::Partition(partition))
}

#[instrument(name = "cli.mincut", err, skip(command), fields(path = %command.solution.display()))]
pub(super) fn run_mincut(command: &MinCutCommand) -> Result<CommandOutput, CliError> {
    let solution = read_fractional_solution(&command.solution, command.nodes).map_err(CliError::core)?;
    let result = customer_min_cut(&solution).map_err(CliError::core)?;
    Ok(CommandOutput::MinCut(result))
}

#[instrument(
    name = "cli.rank",
    err,
    skip(command),
    fields(path = %command.solution.display(), candidates = field::Empty)
)]
pub(super) fn run_rank(command: &RankCommand) -> Result<CommandOutput, CliError> {
    let coordinates = command
        .coords
        .as_deref()
        .map(load_coordinates)
        .transpose()
        .map_err(CliError::core)?;
    let node_count = coordinates
        .as_ref()
        .map(|coordinates| coordinates.points().len())
        .or(command.nodes);
    let solution = read_fractional_solution(&command.solution, node_count).map_err(CliError::core)?;
    let distances = coordinates
        .as_ref()
        .map(|coordinates| distances_of(coordinates, &command.clustering));
    let partition = rank_partition(command, &solution, distances.as_ref())?;
    let routes = command
        .routes
        .as_deref()
        .map(|path| load_route_clusters(path, solution.customer_count()))
        .transpose()
        .map_err(CliError::core)?;

    let mut session = BranchingSession::new();
    if let Some(path) = &command.save_root
        && session.first_root_visit()
    {
        write_file(path, |out| write_fractional_solution(out, &solution))?;
        info!(path = %path.display(), "root solution written");
    }

    let cutsets = match (command.capacity, &coordinates) {
        (Some(capacity), Some(coordinates)) => {
            let request = CutsetRequest::new(coordinates.demands().to_vec(), capacity, &solution);
            let oracle = command
                .max_cutsets
                .map_or_else(SupportComponentCutsets::default, |limit| {
                    SupportComponentCutsets::default().with_max_sets(limit)
                });
            oracle.separate(&request)
        }
        _ => Vec::new(),
    };

    let mut config = BranchingConfigBuilder::new()
        .with_max_edge_candidates(command.max_edge_candidates)
        .with_cutset_deduplication(!command.keep_duplicate_cutsets);
    if !command.strategies.is_empty() {
        config = config.with_strategies(command.strategies.iter().copied());
    } else if routes.is_some() {
        config = config.with_strategy(BranchingStrategy::RouteClusterDegree, true);
    }
    let ranker = BranchingCandidateRanker::new(config.build());

    let cost = distances
        .as_ref()
        .map(|distances| move |i: usize, j: usize| distances.distance(i, j));
    let mut input = RankingInput::new(&solution, &partition).with_cutsets(&cutsets);
    if let Some(routes) = routes.as_ref() {
        input = input.with_routes(routes);
    }
    if let Some(cost) = cost.as_ref() {
        input = input.with_edge_cost(cost);
    }
    let ranked = ranker.rank(&input, &mut session).map_err(CliError::core)?;
    Span::current().record("candidates", ranked.len());
    Ok(CommandOutput::Ranking(ranked))
}

fn rank_partition(
    command: &RankCommand,
    solution: &FractionalSolution,
    distances: Option<&EuclideanDistances>,
) -> Result<ClusterPartition, CliError> {
    let customers = solution.customer_count();
    if let Some(path) = &command.clusters {
        return load_clusters(path, customers).map_err(CliError::core);
    }
    match distances {
        Some(distances) => partition_from_coordinates(distances, &command.clustering),
        None => Ok(ClusterPartition::depot_only(customers)),
    }
}

fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(io_error)
}

/// Renders `output` to `writer`.
///
/// Partitions print one `C<id> <node> ...` line per cluster, minimum cuts a
/// `min cut: <value>` line followed by `Cut#k <node> ...` lines, and rankings
/// one `<name>\t<value>` line per candidate.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clubra_cli::cli::{CommandOutput, render_output};
/// # use clubra_core::ClusterPartition;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let partition = ClusterPartition::with_depot(2, vec![vec![1, 2]])?;
/// let mut buffer = Vec::new();
/// render_output(&CommandOutput::Partition(partition), &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "C1 0\nC2 1 2\n");
/// # Ok(())
/// # }
/// ```
pub fn render_output(output: &CommandOutput, mut writer: impl Write) -> io::Result<()> {
    match output {
        CommandOutput::Partition(partition) => write!(writer, "{partition}"),
        CommandOutput::MinCut(result) => {
            writeln!(writer, "min cut: {}", result.value())?;
            write!(writer, "{result}")
        }
        CommandOutput::Ranking(ranked) => {
            for candidate in ranked {
                writeln!(writer, "{}\t{}", candidate.name(), candidate.value())?;
            }
            Ok(())
        }
    }
}
