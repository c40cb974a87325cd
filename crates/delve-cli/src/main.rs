//! Delve CLI - automated deep research sessions from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use delve_core::pipeline::{Executor, Planner, Reporter};
use delve_core::{Config, FileStore, OpenAIClient, Pipeline, ReportMethod, Store, TavilyClient};

#[derive(Parser)]
#[command(name = "delve")]
#[command(about = "Automated deep research: topic in, cited report out", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new research session
    New {
        /// The topic to research, in any language
        #[arg(required = true)]
        topic: Vec<String>,

        /// Report style: basic, detailed, or social
        #[arg(long, default_value = "detailed")]
        method: ReportMethod,

        /// Override the model used for the final report
        #[arg(long)]
        model: Option<String>,

        /// Stop after the search stage, without generating a report
        #[arg(long)]
        skip_report: bool,
    },
    /// Generate a report for a searched session
    Report {
        /// Session ID, e.g. RS_20260115_142501
        session_id: String,

        /// Report style: basic, detailed, or social
        #[arg(long, default_value = "detailed")]
        method: ReportMethod,

        /// Override the model used for the final report
        #[arg(long)]
        model: Option<String>,
    },
    /// List stored research sessions
    List,
    /// Write a delve.toml with the default configuration
    Init {
        /// Overwrite an existing delve.toml
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("delve_core=debug,delve_cli=debug,info")
    } else {
        EnvFilter::new("delve_core=info,delve_cli=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::New {
            topic,
            method,
            model,
            skip_report,
        } => {
            let config = load_config()?;
            let topic = topic.join(" ");
            tracing::info!(topic, skip_report, "starting research session");
            run_new(&config, &topic, method, model, skip_report).await
        }
        Commands::Report {
            session_id,
            method,
            model,
        } => {
            let config = load_config()?;
            tracing::info!(session_id, method = method.display_name(), "generating report");
            run_report(&config, &session_id, method, model).await
        }
        Commands::List => {
            let config = load_config()?;
            run_list(&config)
        }
        // Init must work even when an existing config file is broken
        Commands::Init { force } => run_init(force),
    }
}

fn load_config() -> Result<Config> {
    let config = Config::load().context("failed to load configuration")?;
    tracing::debug!("configuration loaded");
    Ok(config)
}

type ResearchPipeline = Pipeline<OpenAIClient, TavilyClient, FileStore>;

fn build_pipeline(config: &Config, report_model: Option<String>) -> Result<ResearchPipeline> {
    let store = FileStore::from_config(&config.storage);
    let search = TavilyClient::from_config(&config.search)
        .context("search API key missing; set TAVILY_API_KEY or [search] api_key")?;

    let smart = OpenAIClient::from_config(&config.llm, config.llm.smart_model.clone())
        .context("LLM API key missing; set OPENAI_KEY or [llm] api_key")?;
    let long = OpenAIClient::from_config(&config.llm, config.llm.long_model.clone())?;
    let report_model = report_model.unwrap_or_else(|| config.llm.report_model.clone());
    let report = OpenAIClient::from_config(&config.llm, report_model)?;

    let planner = Planner::new(smart, config.plan.clone());
    let executor = Executor::new(search, config.search.concurrency);
    let reporter = Reporter::new(long, report, config.report.clone(), config.search.min_score);

    Ok(Pipeline::new(store, planner, executor, reporter))
}

async fn run_new(
    config: &Config,
    topic: &str,
    method: ReportMethod,
    model: Option<String>,
    skip_report: bool,
) -> Result<()> {
    let pipeline = build_pipeline(config, model)?;
    let method = (!skip_report).then_some(method);

    let outcome = pipeline.run(topic, method).await?;

    println!("Session: {}", outcome.session.id);
    println!("  Topic: {}", outcome.session.topic);
    println!("  Stage: {}", outcome.session.stage.display_name());
    println!(
        "  Searches: {} saved, {} failed",
        outcome.search.saved, outcome.search.failed
    );
    for err in &outcome.search.errors {
        eprintln!("    - {err}");
    }

    match outcome.report {
        Some(report) => {
            println!("  Report: {}", report.report_path.display());
            println!(
                "  References: {} sources in {}",
                report.citation_count,
                report.reference_path.display()
            );
        }
        None => {
            println!(
                "  Report skipped. Use 'delve report {}' to generate one.",
                outcome.session.id
            );
        }
    }

    Ok(())
}

async fn run_report(
    config: &Config,
    session_id: &str,
    method: ReportMethod,
    model: Option<String>,
) -> Result<()> {
    let pipeline = build_pipeline(config, model)?;
    let (session, artifacts) = pipeline.report(session_id, method).await?;

    println!("Session: {}", session.id);
    println!("  Method: {}", method.display_name());
    println!("  Report: {}", artifacts.report_path.display());
    println!(
        "  References: {} sources in {}",
        artifacts.citation_count,
        artifacts.reference_path.display()
    );

    Ok(())
}

fn run_init(force: bool) -> Result<()> {
    let path = "delve.toml";

    if std::path::Path::new(path).exists() && !force {
        println!("{path} already exists. Use --force to overwrite it.");
        return Ok(());
    }

    std::fs::write(path, Config::default_config_string())
        .with_context(|| format!("failed to write {path}"))?;

    println!("Wrote {path}. API keys are read from the environment:");
    println!("  OPENAI_KEY      LLM API key");
    println!("  TAVILY_API_KEY  search API key");

    Ok(())
}

fn run_list(config: &Config) -> Result<()> {
    let store = FileStore::from_config(&config.storage);
    let sessions = store.list_sessions()?;

    if sessions.is_empty() {
        println!(
            "No sessions found in {}. Use 'delve new <topic>' to start one.",
            config.storage.output_dir
        );
        return Ok(());
    }

    for session in &sessions {
        println!(
            "{}  {:<8}  {}  {}",
            session.id,
            session.stage.display_name(),
            session.created_at.format("%Y-%m-%d %H:%M"),
            session.topic
        );
    }
    println!("Total: {} sessions", sessions.len());

    Ok(())
}
