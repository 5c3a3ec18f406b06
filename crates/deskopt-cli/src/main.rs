use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deskopt::core::{EngineConfig, Role};
use deskopt::ergo::{RuleBook, RuleBookSource};
use deskopt::{ScanRequest, run_analysis};
use log::info;

/// Desk ergonomics analysis from calibrated photo clicks.
#[derive(Debug, Parser)]
#[command(name = "deskopt", author, version, about = "Score a desk layout from one photo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a scan request and print the report as JSON.
    Analyze {
        /// Path to JSON file containing a ScanRequest.
        #[arg(long)]
        input: String,

        /// Optional path to JSON EngineConfig. Defaults are used if omitted.
        #[arg(long)]
        config: Option<String>,

        /// Optional path to a JSON rule book. The built-in catalog is used if omitted.
        #[arg(long)]
        rules: Option<String>,
    },
    /// Print the built-in rule book, optionally restricted to one role.
    Rules {
        #[arg(long)]
        role: Option<Role>,
    },
    /// Print the default engine configuration.
    Config,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}

fn analyze_from_files(
    input_path: &str,
    config_path: Option<&str>,
    rules_path: Option<&str>,
) -> Result<String> {
    let request: ScanRequest = load_json_file(Path::new(input_path))?;

    let config = match config_path {
        Some(path) => load_json_file::<EngineConfig>(Path::new(path))?,
        None => EngineConfig::default(),
    };
    let book = match rules_path {
        Some(path) => load_json_file::<RuleBook>(Path::new(path))?,
        None => RuleBook::builtin(),
    };
    info!(
        "analyzing {} detections for a {} ({} rules)",
        request.detections.len(),
        request.profile.role,
        book.rules().len()
    );

    let report = run_analysis(&request, &book, &config).context("analysis failed")?;
    Ok(serde_json::to_string_pretty(&report)?)
}

fn rules_json(role: Option<Role>) -> Result<String> {
    let book = RuleBook::builtin();
    let source = RuleBookSource {
        categories: book.categories().to_vec(),
        rules: match role {
            Some(role) => book.rules_for_role(role).cloned().collect(),
            None => book.rules().to_vec(),
        },
    };
    Ok(serde_json::to_string_pretty(&source)?)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let json = match cli.command {
        Command::Analyze {
            input,
            config,
            rules,
        } => analyze_from_files(&input, config.as_deref(), rules.as_deref())?,
        Command::Rules { role } => rules_json(role)?,
        Command::Config => serde_json::to_string_pretty(&EngineConfig::default())?,
    };
    println!("{json}");
    Ok(())
}
