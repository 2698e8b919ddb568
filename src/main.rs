//! idea-graph CLI: work-centric explorer for an academic knowledge graph.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};

use idea_graph::config::ExplorerConfig;
use idea_graph::error::IdeaGraphResult;
use idea_graph::export::{WorkGraphExport, to_dot, to_json};
use idea_graph::inspect::{properties_of, top_keywords};
use idea_graph::model::{BuildOptions, GraphModel};
use idea_graph::namespace::NamespaceRegistry;
use idea_graph::ontology::OntologyClass;
use idea_graph::overview::{WorkFilter, build_overview, fetch_citations, fetch_works};
use idea_graph::query::QueryService;
use idea_graph::query::http::HttpSparqlClient;
use idea_graph::query::local::LocalStore;
use idea_graph::session::ExplorerSession;
use idea_graph::traverse::TraversalConfig;

#[derive(Parser)]
#[command(name = "idea-graph", version, about = "Work-centric knowledge graph explorer")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SPARQL endpoint URL (overrides config and IDEA_GRAPH_ENDPOINT).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Query a local Turtle/N-Triples file instead of an endpoint.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Dot,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all works and the citations among them.
    Overview {
        /// Case-insensitive title substring.
        #[arg(long)]
        title: Option<String>,

        /// Case-insensitive venue substring.
        #[arg(long)]
        venue: Option<String>,

        /// Exact publication year.
        #[arg(long)]
        year: Option<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show the layered graph around one work.
    Work {
        /// IRI of the work.
        iri: String,

        /// Class group to expand (class IRI, prefixed name, or `used`/`introduced`).
        #[arg(long = "expand")]
        expand: Vec<String>,

        /// Layer to hide (structure, argument, metadata, person, keyword, event, other).
        /// Locally, foaf and bibo types classify as structure, so `person` and
        /// `event` only match triples the store tags with a `layer` hint.
        #[arg(long = "hide")]
        hide: Vec<String>,

        /// Hop bound (1-3), overrides the config.
        #[arg(long)]
        max_hops: Option<usize>,

        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },

    /// List the outgoing properties of an entity.
    Inspect {
        /// Entity IRI, or a `class:` node id.
        iri: String,
    },

    /// Show the most used discipline keywords.
    Keywords {
        /// Number of keywords (defaults to the config value).
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn load_config(cli: &Cli) -> IdeaGraphResult<ExplorerConfig> {
    let config = match &cli.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    config.validate()?;
    Ok(config)
}

fn open_service(cli: &Cli, config: &ExplorerConfig) -> IdeaGraphResult<Box<dyn QueryService>> {
    match &cli.data {
        Some(path) => {
            let store = LocalStore::in_memory()?;
            store.load_file(path)?;
            Ok(Box::new(store))
        }
        None => {
            tracing::debug!(endpoint = %config.endpoint, "using remote endpoint");
            Ok(Box::new(HttpSparqlClient::new(
                config.endpoint.clone(),
                Duration::from_secs(config.timeout_secs),
            )))
        }
    }
}

fn print_graph(model: &GraphModel) {
    println!("Nodes ({}):", model.node_count());
    for node in model.nodes() {
        println!("  [{:?}] {} ({})", node.category, node.label, node.id);
    }
    println!("Edges ({}):", model.edge_count());
    for edge in model.edges() {
        println!("  {} -[{}]-> {}", edge.source, edge.label, edge.target);
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let service = open_service(&cli, &config)?;

    match &cli.command {
        Commands::Overview {
            title,
            venue,
            year,
            format,
        } => {
            let works = fetch_works(&service, config.overview_limit)?;
            let citations = fetch_citations(&service)?;
            let filter = WorkFilter {
                title: title.clone(),
                venue: venue.clone(),
                year: year.clone(),
            };
            let model = build_overview(&works, &citations, &filter, config.label_max_len);

            match format {
                Format::Json => println!("{}", to_json(&model).into_diagnostic()?),
                Format::Dot => print!("{}", to_dot(&model, "overview")),
                Format::Text => {
                    println!("{} works found", model.node_count());
                    for work in filter.apply(&works) {
                        println!("  {} / {}", work.hover(), work.iri);
                    }
                    println!("Citations ({}):", model.edge_count());
                    for edge in model.edges() {
                        println!("  {} -> {}", edge.source, edge.target);
                    }
                }
            }
        }

        Commands::Work {
            iri,
            expand,
            hide,
            max_hops,
            format,
        } => {
            let mut session = ExplorerSession::new();
            session.select_work(iri.clone());
            for name in expand {
                let class = OntologyClass::from_name(name)
                    .ok_or_else(|| miette!("unknown class group: {name}"))?;
                session.expansion_mut().set(class.key(), true);
            }

            let mut options = BuildOptions::from_config(&config);
            for layer in hide {
                if !options.layers.hide_named(layer) {
                    return Err(miette!("unknown layer: {layer}"));
                }
            }

            let max_hops = max_hops.unwrap_or(config.max_hops);
            if !(1..=3).contains(&max_hops) {
                return Err(miette!("--max-hops must be between 1 and 3, got {max_hops}"));
            }

            let (result, model) = session
                .build_graph(&service, TraversalConfig { max_hops }, &options)
                .ok_or_else(|| miette!("no work selected"))?;

            match format {
                Format::Json => {
                    let export = WorkGraphExport::new(&result, &model);
                    println!("{}", to_json(&export).into_diagnostic()?);
                }
                Format::Dot => print!("{}", to_dot(&model, iri)),
                Format::Text => {
                    println!("Work: {}", NamespaceRegistry::global().shorten(iri));
                    if let Some(title) = &result.title {
                        println!("  title: {title}");
                    }
                    println!("  state: {}", result.state);
                    let expanded: Vec<&str> = session.expansion().expanded_keys().collect();
                    if !expanded.is_empty() {
                        println!("  expanded: {}", expanded.join(", "));
                    }
                    println!("  triples: {}", result.triples.len());
                    for hop in &result.hops {
                        match &hop.error {
                            Some(error) => println!("  hop {}: failed ({error})", hop.hop),
                            None => println!(
                                "  hop {}: {} rows, {} new triples",
                                hop.hop, hop.rows, hop.new_triples
                            ),
                        }
                    }
                    print_graph(&model);
                }
            }
        }

        Commands::Inspect { iri } => {
            let mut session = ExplorerSession::new();
            session.handle_click(iri);
            let target = session
                .detail_target()
                .ok_or_else(|| miette!("nothing to inspect"))?;
            let rows = properties_of(&service, target)?;
            let registry = NamespaceRegistry::global();
            println!("{} ({} properties):", registry.shorten(target), rows.len());
            for row in &rows {
                let value = if row.is_resource {
                    registry.shorten(&row.value)
                } else {
                    format!("\"{}\"", row.value)
                };
                println!("  {} {}", row.short_predicate(), value);
            }
        }

        Commands::Keywords { limit } => {
            let limit = limit.unwrap_or(config.keyword_limit);
            let keywords = top_keywords(&service, limit)?;
            if keywords.is_empty() {
                println!("No keywords found.");
            } else {
                for keyword in &keywords {
                    println!("  {} ({})", keyword.label, keyword.uses);
                }
            }
        }
    }

    Ok(())
}
