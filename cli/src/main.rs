//! GFX CLI: inspect GEXF graph documents from the command line
//!
//! Every subcommand loads one graph file, runs a single query and prints the
//! result as a table or as JSON. Failures exit with the code of their error
//! kind.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gfx::{
    Analyzer, CentralityKind, ComponentKind, EdgeFilter, EdgeIndex, EngineConfig, ExportFormat,
    GfxError, Graph, NeighborDirection, NodeFilter, ReachDirection, TieBreak,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gfx", version, about = "Inspect and query GEXF graph documents")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// YAML file with algorithm settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Order ties alphabetically instead of by declaration order
    #[arg(long, global = true)]
    sorted: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum NeighborArg {
    In,
    Out,
    All,
}

impl From<NeighborArg> for NeighborDirection {
    fn from(arg: NeighborArg) -> Self {
        match arg {
            NeighborArg::In => NeighborDirection::In,
            NeighborArg::Out => NeighborDirection::Out,
            NeighborArg::All => NeighborDirection::All,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ReachArg {
    Forward,
    Backward,
    Both,
}

impl From<ReachArg> for ReachDirection {
    fn from(arg: ReachArg) -> Self {
        match arg {
            ReachArg::Forward => ReachDirection::Forward,
            ReachArg::Backward => ReachDirection::Backward,
            ReachArg::Both => ReachDirection::Both,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ComponentArg {
    Connected,
    Weak,
    Strong,
}

impl From<ComponentArg> for ComponentKind {
    fn from(arg: ComponentArg) -> Self {
        match arg {
            ComponentArg::Connected => ComponentKind::Connected,
            ComponentArg::Weak => ComponentKind::Weak,
            ComponentArg::Strong => ComponentKind::Strong,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show document metadata
    Meta { file: PathBuf },

    /// Show a structural summary and the attribute keys in use
    Info { file: PathBuf },

    /// List nodes, optionally filtered
    Nodes {
        file: PathBuf,
        /// Attribute filter `key=value`, repeatable
        #[arg(long = "attr", value_parser = parse_key_value)]
        attributes: Vec<(String, String)>,
        /// Shell-style glob over node labels
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List edges, optionally filtered
    Edges {
        file: PathBuf,
        #[arg(long = "attr", value_parser = parse_key_value)]
        attributes: Vec<(String, String)>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        target: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Nodes within a number of hops
    Neighbors {
        file: PathBuf,
        node: String,
        #[arg(long, value_enum, default_value = "all")]
        direction: NeighborArg,
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },

    /// Shortest path between two nodes
    Path {
        file: PathBuf,
        source: String,
        target: String,
        /// Minimize summed edge weight instead of hop count
        #[arg(long)]
        weighted: bool,
    },

    /// Every simple path between two nodes
    AllPaths {
        file: PathBuf,
        source: String,
        target: String,
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Whether the target is reachable from the source
    HasPath {
        file: PathBuf,
        source: String,
        target: String,
    },

    /// Nodes reachable from a node
    Reachable {
        file: PathBuf,
        node: String,
        #[arg(long, value_enum, default_value = "forward")]
        direction: ReachArg,
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Nodes adjacent to both given nodes
    CommonNeighbors {
        file: PathBuf,
        first: String,
        second: String,
    },

    /// Whole-graph statistics
    Stats { file: PathBuf },

    /// Centrality ranking
    Centrality {
        file: PathBuf,
        /// degree, betweenness, closeness, pagerank or eigenvector
        #[arg(long, default_value = "pagerank")]
        kind: CentralityKind,
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long)]
        weighted: bool,
    },

    /// Connected components
    Components {
        file: PathBuf,
        #[arg(long, value_enum, default_value = "connected")]
        kind: ComponentArg,
    },

    /// Degree of one node, or of all nodes highest first
    Degree {
        file: PathBuf,
        node: Option<String>,
        #[arg(long)]
        top: Option<usize>,
    },

    /// Ego graph around a node
    Ego {
        file: PathBuf,
        node: String,
        #[arg(long, default_value_t = 1)]
        radius: usize,
        /// Write the subgraph as GEXF instead of printing a summary
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Subgraph induced by a set of nodes
    Subgraph {
        file: PathBuf,
        #[arg(required = true)]
        nodes: Vec<String>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Convert to another format
    Export {
        file: PathBuf,
        /// json, gexf, graphml, adjlist or edgelist
        #[arg(long, default_value = "json")]
        to: ExportFormat,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<GfxError>()
            .map(|err| err.kind().exit_code())
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .map_err(GfxError::from)
                .with_context(|| format!("cannot read {}", path.display()))?;
            EngineConfig::from_yaml_str(&source)?
        }
        None => EngineConfig::default(),
    };
    if cli.sorted {
        config = config.with_tie_break(TieBreak::Lexicographic);
    }
    Ok(config)
}

/// Load a GEXF document, or node-link JSON when the extension is `.json`.
fn load_graph(path: &Path) -> Result<Graph> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let graph = if is_json {
        let source = fs::read_to_string(path)
            .map_err(GfxError::from)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Graph::from_node_link_json(&source)?
    } else {
        let file = fs::File::open(path)
            .map_err(GfxError::from)
            .with_context(|| format!("cannot open {}", path.display()))?;
        Graph::from_gexf_reader(std::io::BufReader::new(file))?
    };
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .map_err(GfxError::from)
                .with_context(|| format!("cannot write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

#[derive(Serialize)]
struct SubgraphSummary<'a> {
    nodes: Vec<&'a str>,
    node_count: usize,
    edge_count: usize,
}

fn show_subgraph(graph: &Graph, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    if output.is_some() {
        return write_or_print(output, &graph.to_gexf()?);
    }
    let summary = SubgraphSummary {
        nodes: graph.nodes().map(|n| n.id.as_str()).collect(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
    };
    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            let nodes: Vec<_> = graph.nodes().collect();
            println!("{}", render::nodes(&nodes));
            println!("{} node(s), {} edge(s)", summary.node_count, summary.edge_count);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let format = cli.format;

    match cli.command {
        Commands::Meta { file } => {
            let meta = load_graph(&file)?.metadata();
            match format {
                OutputFormat::Json => print_json(&meta)?,
                OutputFormat::Table => println!("{}", render::metadata(&meta)),
            }
        }
        Commands::Info { file } => {
            let info = load_graph(&file)?.info();
            match format {
                OutputFormat::Json => print_json(&info)?,
                OutputFormat::Table => println!("{}", render::info(&info)),
            }
        }
        Commands::Nodes {
            file,
            attributes,
            label,
            limit,
        } => {
            let graph = load_graph(&file)?;
            let mut filter = NodeFilter::new();
            for (key, value) in attributes {
                filter = filter.attribute(key, value);
            }
            if let Some(pattern) = label {
                filter = filter.label_glob(&pattern)?;
            }
            let nodes: Vec<_> = graph
                .nodes_matching(&filter)
                .take(limit.unwrap_or(usize::MAX))
                .collect();
            match format {
                OutputFormat::Json => print_json(&nodes)?,
                OutputFormat::Table => {
                    println!("{}", render::nodes(&nodes));
                    println!("{} node(s)", nodes.len());
                }
            }
        }
        Commands::Edges {
            file,
            attributes,
            source,
            target,
            kind,
            limit,
        } => {
            let graph = load_graph(&file)?;
            let mut filter = EdgeFilter::new();
            for (key, value) in attributes {
                filter = filter.attribute(key, value);
            }
            if let Some(source) = source {
                filter = filter.source(source);
            }
            if let Some(target) = target {
                filter = filter.target(target);
            }
            if let Some(kind) = kind {
                filter = filter.kind(kind);
            }
            let indices: Vec<EdgeIndex> = graph
                .edges_matching(&filter)
                .map(|(index, _)| index)
                .take(limit.unwrap_or(usize::MAX))
                .collect();
            let records: Vec<_> = indices
                .into_iter()
                .filter_map(|index| graph.edge_record(index))
                .collect();
            match format {
                OutputFormat::Json => print_json(&records)?,
                OutputFormat::Table => {
                    println!("{}", render::edges(&records));
                    println!("{} edge(s)", records.len());
                }
            }
        }
        Commands::Neighbors {
            file,
            node,
            direction,
            depth,
        } => {
            let graph = load_graph(&file)?;
            let found = Analyzer::with_config(&graph, config).neighbors(&node, direction.into(), depth)?;
            match format {
                OutputFormat::Json => print_json(&found)?,
                OutputFormat::Table => println!("{}", render::nodes(&found)),
            }
        }
        Commands::Path {
            file,
            source,
            target,
            weighted,
        } => {
            let graph = load_graph(&file)?;
            let path = Analyzer::with_config(&graph, config).shortest_path(&source, &target, weighted)?;
            match (format, path) {
                (OutputFormat::Json, path) => print_json(&path)?,
                (OutputFormat::Table, Some(path)) => println!("{}", render::paths(&[path])),
                (OutputFormat::Table, None) => println!("No path from {} to {}", source, target),
            }
        }
        Commands::AllPaths {
            file,
            source,
            target,
            max_depth,
        } => {
            let graph = load_graph(&file)?;
            let paths = Analyzer::with_config(&graph, config).all_paths(&source, &target, max_depth)?;
            match format {
                OutputFormat::Json => print_json(&paths)?,
                OutputFormat::Table => {
                    println!("{}", render::paths(&paths));
                    println!("{} path(s)", paths.len());
                }
            }
        }
        Commands::HasPath { file, source, target } => {
            let graph = load_graph(&file)?;
            let found = Analyzer::with_config(&graph, config).has_path(&source, &target)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "source": source,
                    "target": target,
                    "has_path": found,
                }))?,
                OutputFormat::Table => println!("{}", found),
            }
        }
        Commands::Reachable {
            file,
            node,
            direction,
            max_depth,
        } => {
            let graph = load_graph(&file)?;
            let found = Analyzer::with_config(&graph, config).reachable(&node, direction.into(), max_depth)?;
            match format {
                OutputFormat::Json => print_json(&found)?,
                OutputFormat::Table => {
                    println!("{}", render::nodes(&found));
                    println!("{} node(s) reachable", found.len());
                }
            }
        }
        Commands::CommonNeighbors { file, first, second } => {
            let graph = load_graph(&file)?;
            let found = Analyzer::with_config(&graph, config).common_neighbors(&first, &second)?;
            match format {
                OutputFormat::Json => print_json(&found)?,
                OutputFormat::Table => println!("{}", render::nodes(&found)),
            }
        }
        Commands::Stats { file } => {
            let graph = load_graph(&file)?;
            let stats = Analyzer::with_config(&graph, config).stats();
            match format {
                OutputFormat::Json => print_json(&stats)?,
                OutputFormat::Table => println!("{}", render::stats(&stats)),
            }
        }
        Commands::Centrality {
            file,
            kind,
            top,
            weighted,
        } => {
            let graph = load_graph(&file)?;
            let result = Analyzer::with_config(&graph, config).centrality(kind, weighted)?;
            match format {
                OutputFormat::Json => {
                    let ranked: Vec<_> = result
                        .top_n(top)
                        .into_iter()
                        .map(|(node, score)| serde_json::json!({ "node": node, "score": score }))
                        .collect();
                    print_json(&serde_json::json!({ "kind": result.kind, "top": ranked }))?;
                }
                OutputFormat::Table => println!("{}", render::scores(&result, top)),
            }
        }
        Commands::Components { file, kind } => {
            let graph = load_graph(&file)?;
            let info = Analyzer::with_config(&graph, config).components(kind.into());
            match format {
                OutputFormat::Json => print_json(&info)?,
                OutputFormat::Table => {
                    println!("{}", render::components(&info));
                    println!("{} {} component(s)", info.num_components, info.kind);
                }
            }
        }
        Commands::Degree { file, node, top } => {
            let graph = load_graph(&file)?;
            let analyzer = Analyzer::with_config(&graph, config);
            let degrees = match node {
                Some(id) => vec![analyzer.degree(&id)?],
                None => {
                    let mut all = analyzer.degrees();
                    all.truncate(top.unwrap_or(usize::MAX));
                    all
                }
            };
            match format {
                OutputFormat::Json => print_json(&degrees)?,
                OutputFormat::Table => println!("{}", render::degrees(&degrees)),
            }
        }
        Commands::Ego {
            file,
            node,
            radius,
            output,
        } => {
            let graph = load_graph(&file)?;
            let ego = graph.ego_graph(&node, radius)?;
            show_subgraph(&ego, output.as_deref(), format)?;
        }
        Commands::Subgraph { file, nodes, output } => {
            let graph = load_graph(&file)?;
            let sub = graph.induced_subgraph(&nodes)?;
            show_subgraph(&sub, output.as_deref(), format)?;
        }
        Commands::Export { file, to, output } => {
            let graph = load_graph(&file)?;
            let mut content = graph.export(to)?;
            if !content.ends_with('\n') {
                content.push('\n');
            }
            write_or_print(output.as_deref(), &content)?;
        }
    }

    Ok(())
}
