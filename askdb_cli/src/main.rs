//! askdb - ask questions of a SQLite dataset in plain language.

mod logging;
mod output;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use askdb_core::bridge::{available_providers, build_provider};
use askdb_core::{AskConfig, Catalog, ProviderKind, QueryPipeline, SqliteExecutor};
use clap::{Parser, Subcommand, ValueEnum};
use output::Format;

const EXAMPLE_QUESTIONS: &[&str] = &[
    "Top 5 QBs by passing yards",
    "Jared Goff completion percentage",
    "Third down conversion leaders with minimum 50 attempts",
    "Red zone touchdown percentage for top QBs",
    "QBs with most 300+ yard games",
    "Joe Burrow vs Patrick Mahomes passing stats",
    "Worst interception rate among starting QBs",
];

/// Ask questions of a SQLite dataset in plain language.
#[derive(Parser)]
#[command(name = "askdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the YAML config file (defaults to ./askdb.yaml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Only log warnings and errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON response envelope
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        /// The question, in plain language
        question: String,

        /// Include the generated SQL in the output
        #[arg(long)]
        show_sql: bool,

        /// Translation provider (ollama, gemini)
        #[arg(long)]
        provider: Option<ProviderKind>,
    },

    /// Interactive session (default when no command is given)
    Repl {
        /// Translation provider (ollama, gemini)
        #[arg(long)]
        provider: Option<ProviderKind>,
    },

    /// Check the database connection
    Status,

    /// List translation providers and whether they can be used
    Providers,

    /// Show example questions
    Examples,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = AskConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::init_logging(&config.log_level, cli.verbose, cli.quiet)?;
    let format = Format::from(cli.format);

    match cli.command.unwrap_or(Commands::Repl { provider: None }) {
        Commands::Ask {
            question,
            show_sql,
            provider,
        } => {
            let pipeline = build_pipeline(&config, provider)?;
            let outcome = pipeline
                .process(&question, show_sql || config.include_sql)
                .await;
            output::print_outcome(&outcome, format)?;
            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Repl { provider } => {
            let pipeline = build_pipeline(&config, provider)?;
            repl(&pipeline, config.include_sql, format).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status => {
            let status = executor_for(&config).status();
            output::print_status(&status, format)?;
            Ok(if status.connected {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Providers => {
            output::print_providers(&available_providers(&config.provider), format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Examples => {
            for example in EXAMPLE_QUESTIONS {
                println!("  - {}", example);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn executor_for(config: &AskConfig) -> SqliteExecutor {
    let executor = SqliteExecutor::new(&config.database.path);
    match &config.database.probe_table {
        Some(table) => executor.with_probe_table(table),
        None => executor,
    }
}

fn build_pipeline(config: &AskConfig, provider: Option<ProviderKind>) -> anyhow::Result<QueryPipeline> {
    let kind = provider.unwrap_or(config.provider.kind);
    let schema = Catalog::new(&config.database.path).schema_context();
    if schema.is_empty() {
        tracing::warn!(
            "No tables found in {}; the model will not see a schema",
            config.database.path.display()
        );
    }

    let provider = build_provider(kind, &config.provider, &schema)
        .with_context(|| format!("Failed to initialize {} provider", kind))?;
    Ok(QueryPipeline::new(provider, Arc::new(executor_for(config))))
}

async fn repl(pipeline: &QueryPipeline, include_sql: bool, format: Format) -> anyhow::Result<()> {
    let mut show_sql = include_sql;

    println!("askdb v{} - using {}", env!("CARGO_PKG_VERSION"), pipeline.provider_name());
    println!("Ready. Commands:");
    println!("  - Type any question in plain language");
    println!("  - STATS: show answered/failed counters");
    println!("  - SQL ON | SQL OFF: toggle showing generated SQL");
    println!("  - EXIT: Type 'exit' or 'quit' to exit\n");

    loop {
        print!("askdb> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("stats") {
            output::print_stats(&pipeline.stats().snapshot(), format)?;
            continue;
        }

        if input.eq_ignore_ascii_case("sql on") || input.eq_ignore_ascii_case("sql off") {
            show_sql = input.eq_ignore_ascii_case("sql on");
            println!("Show SQL: {}", if show_sql { "on" } else { "off" });
            continue;
        }

        println!("Translating: '{}'", input);
        let outcome = pipeline.process(input, show_sql).await;
        output::print_outcome(&outcome, format)?;
        println!();
    }

    Ok(())
}
