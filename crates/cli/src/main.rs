//! kgdash command-line host.
//!
//! Renders knowledge-graph views from a Neo4j database and talks to the
//! tool-execution service.
//!
//! # Usage
//!
//! ```bash
//! # Interactive graph of pull requests, written to a file
//! kgdash graph --node-type PullRequest --layout Hierarchical --out graph.html
//!
//! # Workflow view as a Sankey figure
//! kgdash workflow --figure
//!
//! # Health of both backends
//! kgdash health
//! ```
//!
//! Configuration comes from `--config <file.toml>` and the `NEO4J_URI`,
//! `NEO4J_USER`, `NEO4J_PASSWORD`, `NEO4J_DATABASE` and `CONDUIT_URL`
//! environment variables. Log verbosity follows `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kgdash_conduit::ConduitClient;
use kgdash_core::{DashboardConfig, VizError, VizResult};
use kgdash_engine::{GraphFilter, GraphVisualizer, Layout, SpringConfig};
use kgdash_neo4j::HttpGraph;
use serde::Serialize;
use serde_json::json;

#[derive(Parser)]
#[command(name = "kgdash")]
#[command(version)]
#[command(about = "Knowledge graph dashboard views from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the interactive graph as HTML
    Graph {
        /// Source entity types to include (repeatable; default all)
        #[arg(long = "node-type")]
        node_types: Vec<String>,

        /// Relationship types to include (repeatable; default all)
        #[arg(long = "rel-type")]
        rel_types: Vec<String>,

        /// Match source entities whose name or id contains this text
        #[arg(long, short)]
        search: Option<String>,

        /// Force-directed, Hierarchical, Circular or Random
        #[arg(long, short)]
        layout: Option<String>,

        /// Maximum relationships shown (10..=500)
        #[arg(long)]
        limit: Option<usize>,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// List entity and relationship types
    Types,

    /// Workflow view
    Workflow {
        /// Source entity type
        #[arg(long, default_value = "PullRequest")]
        source_type: String,

        /// Print the Sankey figure instead of rows
        #[arg(long)]
        figure: bool,
    },

    /// Coordination view
    Coordination {
        /// Peer entity type
        #[arg(long, default_value = "Agent")]
        peer_type: String,

        /// Layout seed for the network figure
        #[arg(long)]
        seed: Option<u64>,

        /// Print the network figure instead of rows
        #[arg(long)]
        figure: bool,
    },

    /// Counts, usage, growth and recent activity
    Stats {
        /// Number of recent entities
        #[arg(long, default_value_t = 10)]
        recent: usize,
    },

    /// Health of the graph database and the tool service
    Health,

    /// Structural metrics
    Metrics {
        /// Print the bar chart figure instead of values
        #[arg(long)]
        figure: bool,
    },

    /// Tools offered by the tool service
    Tools,

    /// Run one tool
    Exec {
        /// Tool server
        server: String,
        /// Tool name
        tool: String,
        /// JSON payload
        #[arg(long, default_value = "{}")]
        payload: String,
    },

    /// Ask the task planner for a plan
    Plan {
        /// Task description
        task: String,
    },

    /// Print a fortune
    Fortune,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> VizResult<()> {
    let config = DashboardConfig::load(cli.config.as_deref())?;
    tracing::debug!(target: "kgdash::cli", neo4j = %config.neo4j_uri, conduit = %config.conduit_url, "configuration loaded");

    match cli.command {
        Commands::Graph {
            node_types,
            rel_types,
            search,
            layout,
            limit,
            out,
        } => {
            let config = match limit {
                Some(l) => config.node_limit(l),
                None => config,
            };
            let layout = Layout::from_name(layout.as_deref().unwrap_or(&config.default_layout));
            let filter = GraphFilter::new()
                .node_types(node_types)
                .rel_types(rel_types)
                .search(search.unwrap_or_default())
                .limit(config.node_limit);
            let html = visualizer(&config).create_interactive_graph(&filter, layout)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    eprintln!("wrote {}", path.display());
                }
                None => print!("{}", html),
            }
            Ok(())
        }
        Commands::Types => {
            let viz = visualizer(&config);
            print_json(&json!({
                "node_types": viz.node_types(),
                "relationship_types": viz.relationship_types(),
            }))
        }
        Commands::Workflow {
            source_type,
            figure,
        } => {
            let viz = visualizer(&config).workflow_source(source_type);
            let rows = viz.workflow();
            if figure {
                print_json(&viz.sankey(&rows).to_figure().to_json())
            } else {
                print_json(&rows)
            }
        }
        Commands::Coordination {
            peer_type,
            seed,
            figure,
        } => {
            let mut spring = SpringConfig::default();
            if let Some(seed) = seed {
                spring = spring.seed(seed);
            }
            let viz = visualizer(&config).coordination_peer(peer_type).spring(spring);
            let rows = viz.coordination();
            if figure {
                print_json(&viz.flow(&rows).to_figure().to_json())
            } else {
                print_json(&rows)
            }
        }
        Commands::Stats { recent } => {
            let viz = visualizer(&config);
            print_json(&json!({
                "statistics": viz.statistics(),
                "usage": viz.usage_patterns(),
                "growth": viz.growth(),
                "recent_activity": viz.recent_activity(recent),
            }))
        }
        Commands::Health => {
            let report = visualizer(&config).check_health();
            let checks: serde_json::Map<String, serde_json::Value> = report
                .checks()
                .iter()
                .map(|(name, ok)| (name.to_string(), json!(ok)))
                .collect();
            print_json(&json!({
                "graph": checks,
                "conduit": ConduitClient::from_config(&config).health_check(),
            }))
        }
        Commands::Metrics { figure } => {
            let viz = visualizer(&config);
            let metrics = viz.graph_metrics();
            if figure {
                print_json(&viz.metrics_chart(&metrics).to_json())
            } else {
                print_json(&metrics)
            }
        }
        Commands::Tools => print_json(&ConduitClient::from_config(&config).available_tools()),
        Commands::Exec {
            server,
            tool,
            payload,
        } => {
            let payload: serde_json::Value = serde_json::from_str(&payload)
                .map_err(|e| VizError::invalid_input(format!("payload is not JSON: {}", e)))?;
            print_json(&ConduitClient::from_config(&config).execute_tool(&server, &tool, &payload))
        }
        Commands::Plan { task } => {
            print_json(&ConduitClient::from_config(&config).task_planning(&task))
        }
        Commands::Fortune => {
            println!("{}", ConduitClient::from_config(&config).fortune());
            Ok(())
        }
    }
}

fn visualizer(config: &DashboardConfig) -> GraphVisualizer<HttpGraph> {
    GraphVisualizer::new(HttpGraph::from_config(config))
}

fn print_json<T: Serialize>(value: &T) -> VizResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
