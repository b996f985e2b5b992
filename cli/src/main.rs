//! talentgraph CLI: build a talent graph from employee records, or
//! summarize an existing graph document.

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::{Path, PathBuf};
use talentgraph::{
    Config, EdgeType, GraphDocument, GraphStatistics, InferenceReport, LLMProvider,
};
use tracing::Level;

#[derive(Parser)]
#[command(name = "talentgraph", version, about = "Talent graph builder")]
struct Cli {
    /// Output format for summaries
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// More logging (-v debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Employee records (JSON array)
    #[arg(long, short, default_value = "data/employees.json")]
    input: PathBuf,

    /// Graph document to write
    #[arg(long, short, default_value = "data/talent-graph.json")]
    output: PathBuf,

    /// YAML config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Skip relationship inference
    #[arg(long)]
    no_ai: bool,

    /// Source identifier recorded in the metadata
    #[arg(long)]
    source: Option<String>,

    /// LLM provider (openai, azure, anthropic, gemini, ollama)
    #[arg(long, env = "TALENTGRAPH_PROVIDER")]
    provider: Option<String>,

    /// Model name (deployment name for Azure)
    #[arg(long, env = "TALENTGRAPH_MODEL")]
    model: Option<String>,

    #[arg(long, env = "TALENTGRAPH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL (endpoint for Azure)
    #[arg(long, env = "TALENTGRAPH_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Pairs per inference request
    #[arg(long)]
    batch_size: Option<usize>,

    /// Pause between inference requests in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph from employee records
    Build(BuildArgs),
    /// Summarize a graph document
    Stats {
        /// Graph document
        graph: PathBuf,

        /// Rows in the top-N lists
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => run_build(args, &cli.format).await,
        Commands::Stats { graph, top } => run_stats(&graph, top, &cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &BuildArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::default(),
    };

    let inference = &mut config.inference;
    if let Some(provider) = &args.provider {
        inference.provider = provider.parse::<LLMProvider>()?;
    }
    if let Some(model) = &args.model {
        inference.model = model.clone();
    }
    if let Some(key) = &args.api_key {
        inference.api_key = Some(key.clone());
    }
    if let Some(url) = &args.api_base_url {
        inference.api_base_url = Some(url.clone());
    }
    if let Some(batch_size) = args.batch_size {
        inference.batch_size = batch_size;
    }
    if let Some(delay_ms) = args.delay_ms {
        inference.delay_ms = delay_ms;
    }
    inference.validate()?;

    if let Some(source) = &args.source {
        config.source = Some(source.clone());
    }
    Ok(config)
}

async fn run_build(args: BuildArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let outcome = talentgraph::run(&config, &args.input, &args.output, !args.no_ai)
        .await
        .with_context(|| format!("building graph from {}", args.input.display()))?;

    let stats = outcome.document.statistics(5);
    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "output": args.output.display().to_string(),
                "metadata": outcome.document.metadata,
                "statistics": stats,
                "inference": outcome.report,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            let meta = &outcome.document.metadata;
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["", "count"]);
            table.add_row(vec!["employees".to_string(), meta.employee_count.to_string()]);
            table.add_row(vec!["nodes".to_string(), meta.node_count.to_string()]);
            table.add_row(vec!["edges".to_string(), meta.edge_count.to_string()]);
            add_edge_rows(&mut table, &stats);
            if let Some(report) = &outcome.report {
                add_report_rows(&mut table, report);
            }
            println!("{}", table);
            println!(
                "Wrote {} (ai_enhanced: {})",
                args.output.display(),
                meta.ai_enhanced
            );
        }
    }
    Ok(())
}

fn add_edge_rows(table: &mut Table, stats: &GraphStatistics) {
    for edge_type in EdgeType::ALL {
        let count = stats.edge_count(edge_type);
        if count > 0 {
            table.add_row(vec![format!("  {}", edge_type), count.to_string()]);
        }
    }
}

fn add_report_rows(table: &mut Table, report: &InferenceReport) {
    table.add_row(vec!["inference batches".to_string(), report.batches.to_string()]);
    table.add_row(vec![
        "  failed".to_string(),
        report.failed_batches.to_string(),
    ]);
}

fn run_stats(path: &Path, top: usize, format: &OutputFormat) -> anyhow::Result<()> {
    let document = GraphDocument::from_json_file(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let stats = document.statistics(top);

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "metadata": document.metadata,
                "statistics": stats,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            let meta = &document.metadata;
            println!("Source:       {}", meta.source);
            println!("Generated:    {}", meta.generated_at);
            println!("Employees:    {}", meta.employee_count);
            println!("AI enhanced:  {}", meta.ai_enhanced);
            println!();

            let mut counts = Table::new();
            counts.set_content_arrangement(ContentArrangement::Dynamic);
            counts.set_header(vec!["", "count"]);
            counts.add_row(vec!["people".to_string(), stats.person_count.to_string()]);
            counts.add_row(vec!["attributes".to_string(), stats.attribute_count.to_string()]);
            add_edge_rows(&mut counts, &stats);
            println!("{}", counts);

            if !stats.top_attributes.is_empty() {
                let mut attributes = Table::new();
                attributes.set_content_arrangement(ContentArrangement::Dynamic);
                attributes.set_header(vec!["attribute", "categories", "people"]);
                for attr in &stats.top_attributes {
                    let categories: Vec<String> =
                        attr.categories.iter().map(|c| c.to_string()).collect();
                    attributes.add_row(vec![
                        attr.label.clone(),
                        categories.join(", "),
                        attr.people.to_string(),
                    ]);
                }
                println!("{}", attributes);
            }

            if !stats.strongest_pairs.is_empty() {
                let mut pairs = Table::new();
                pairs.set_content_arrangement(ContentArrangement::Dynamic);
                pairs.set_header(vec!["person", "person", "shared"]);
                for pair in &stats.strongest_pairs {
                    pairs.add_row(vec![
                        pair.source.clone(),
                        pair.target.clone(),
                        pair.weight.to_string(),
                    ]);
                }
                println!("{}", pairs);
            }
        }
    }
    Ok(())
}
