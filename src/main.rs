//! envoy-route-map CLI entry point.
//!
//! Submits Envoy config files to the graph-builder service (or loads a
//! pre-built graph with `--graph`), prints stats and warnings to stderr and
//! writes the filtered graph as SVG.

use std::fs;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use env_logger::Env;

use envoy_route_map::client::{DEFAULT_SERVER_URL, HttpGraphBuilder};
use envoy_route_map::model::{ConfigFormat, GraphResult, Node, VisualizeRequest};
use envoy_route_map::view::{FilterPredicate, TypeFilter};
use envoy_route_map::{App, AppConfig};

/// Envoy configuration to listener/route/cluster topology graph (SVG).
#[derive(Parser, Debug)]
#[command(
    name = "envoy-route-map",
    version = env!("ENVOY_ROUTE_MAP_VERSION"),
    about = "Envoy configuration to listener/route/cluster topology graph (SVG)"
)]
struct Cli {
    /// Envoy config files (JSON or YAML, config_dump accepted)
    inputs: Vec<String>,

    /// Graph-builder service base URL
    #[arg(short = 's', long = "server", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Load an already-built graph JSON instead of calling the service
    #[arg(short = 'g', long = "graph", conflicts_with = "inputs")]
    graph: Option<String>,

    /// Config format hint: auto, json, yaml
    #[arg(short = 'f', long = "format", default_value = "auto")]
    format: String,

    /// Only show nodes of this type (listener, route_config, virtual_host, route, cluster, ...)
    #[arg(short = 't', long = "type", default_value = "all")]
    type_filter: String,

    /// Case-insensitive search over node labels and ids
    #[arg(long = "search", default_value = "")]
    search: String,

    /// Print the node with this id to stderr
    #[arg(long = "select")]
    select: Option<String>,

    /// Surface width in pixels
    #[arg(long = "width")]
    width: Option<f64>,

    /// Surface height in pixels
    #[arg(long = "height")]
    height: Option<f64>,

    /// JSON settings file (layout, viewport, render sections)
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Check the service health and exit
    #[arg(long = "health")]
    health: bool,

    /// Write SVG to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn load_config(cli: &Cli) -> AppConfig {
    let mut config = match cli.config {
        Some(ref path) => AppConfig::from_json_file(path)
            .unwrap_or_else(|e| fail(format!("cannot load config '{}': {}", path, e))),
        None => AppConfig::default(),
    };
    if let Some(w) = cli.width {
        config.viewport.width = w;
    }
    if let Some(h) = cli.height {
        config.viewport.height = h;
    }
    config
}

fn print_summary(app: &App) {
    if let Some(stats) = app.stats() {
        for (label, count) in stats.entries() {
            eprintln!("{:>14}: {}", label, count);
        }
    }
    for warning in app.warnings() {
        eprintln!("warning: {}", warning);
    }
}

fn print_node(node: Option<&Node>) {
    let Some(node) = node else { return };
    match serde_json::to_string_pretty(node) {
        Ok(json) => eprintln!("{}", json),
        Err(e) => eprintln!("error: cannot format node '{}': {}", node.id, e),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if cli.health {
        match HttpGraphBuilder::new(&cli.server).healthz().await {
            Ok(status) => {
                println!("{}", status);
                return;
            }
            Err(e) => fail(e.detail()),
        }
    }

    let format = ConfigFormat::parse(&cli.format).unwrap_or_else(|| {
        fail(format!("unknown format '{}'; use auto, json or yaml", cli.format))
    });
    let type_filter: TypeFilter = cli.type_filter.parse().unwrap_or_else(|e| fail(e));

    let mut app = App::new(load_config(&cli));
    app.subscribe_selection(print_node);

    if let Some(ref path) = cli.graph {
        let text = fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path, e)));
        let result: GraphResult = serde_json::from_str(&text)
            .unwrap_or_else(|e| fail(format!("'{}' is not a graph: {}", path, e)));
        if let Err(e) = app.load_graph(result) {
            fail(e);
        }
    } else {
        if cli.inputs.is_empty() {
            fail("no config files given (or use --graph)");
        }
        let configs: Vec<String> = cli
            .inputs
            .iter()
            .map(|path| {
                fs::read_to_string(path)
                    .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path, e)))
            })
            .collect();
        let builder = HttpGraphBuilder::new(&cli.server);
        if let Err(e) = app.visualize(&builder, VisualizeRequest::new(configs, format)).await {
            fail(app.error().map(str::to_string).unwrap_or_else(|| e.to_string()));
        }
    }

    print_summary(&app);

    app.set_predicate(FilterPredicate::new(type_filter, cli.search.clone()));
    if let Some(ref id) = cli.select {
        if app.select_node(id).is_none() {
            fail(format!("no node with id '{}'", id));
        }
    }

    let svg = app.render_svg().unwrap_or_else(|e| fail(e));

    if let Some(ref path) = cli.output {
        if let Err(e) = fs::write(path, svg) {
            fail(format!("cannot write '{}': {}", path, e));
        }
    } else {
        println!("{}", svg);
        if let Err(e) = io::stdout().flush() {
            fail(format!("cannot flush stdout: {}", e));
        }
    }
}
