use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use deckhand_core::{CommandResult, ValidateResult};
use deckhand_persist::{ResultStore, SqliteStore};
use deckhand_pipeline::{OutputOptions, Pipeline, SecretObfuscator};
use tracing::{info, warn};

mod status;

use status::StatusLine;

#[derive(Parser, Debug)]
#[command(name = "deckhandctl", version, about = "Render, store and route deployment results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output descriptor `format[=path]` (format: text|yaml, path `-` for stdout). Repeatable.
    #[arg(short = 'o', long = "output")]
    output: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a command result document (YAML, `-` for stdin)
    Render {
        file: PathBuf,
        #[command(flatten)]
        out: OutputArgs,
        /// Omit per-object diff tables from text output
        #[arg(long = "short-output", action = ArgAction::SetTrue)]
        short: bool,
        /// Do not obfuscate sensitive values
        #[arg(long = "no-obfuscate", action = ArgAction::SetTrue)]
        no_obfuscate: bool,
        /// Also write the result to the result store
        #[arg(long = "write-command-result", action = ArgAction::SetTrue)]
        write_command_result: bool,
        /// Result id (default: random UUID)
        #[arg(long = "result-id")]
        result_id: Option<String>,
    },
    /// Render a validation result document (YAML, `-` for stdin)
    Validate {
        file: PathBuf,
        #[command(flatten)]
        out: OutputArgs,
        #[arg(long = "result-id")]
        result_id: Option<String>,
    },
    /// Print stored command results as multi-document YAML
    History {
        /// Destination (`-` or a path). Repeatable.
        #[arg(short = 'o', long = "output")]
        output: Vec<String>,
        #[arg(long = "limit", default_value_t = 20)]
        limit: usize,
    },
}

fn init_tracing() {
    let env = std::env::var("DECKHAND_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // stdout carries rendered results; logs go to stderr
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

fn init_metrics() {
    if let Ok(addr) = std::env::var("DECKHAND_METRICS_ADDR") {
        if let Ok(sock) = addr.parse::<std::net::SocketAddr>() {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            match builder.with_http_listener(sock).install() {
                Ok(_) => tracing::info!(addr = %addr, "Prometheus metrics exporter listening"),
                Err(e) => tracing::warn!(error = %e, "failed to install metrics exporter"),
            }
        } else {
            tracing::warn!(addr = %addr, "invalid DECKHAND_METRICS_ADDR; expected host:port");
        }
    }
}

fn read_document(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s).context("reading stdin")?;
        return Ok(s);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn parse_command_result(doc: &str) -> Result<CommandResult> {
    serde_yaml::from_str(doc).context("parsing command result YAML")
}

fn parse_validate_result(doc: &str) -> Result<ValidateResult> {
    serde_yaml::from_str(doc).context("parsing validate result YAML")
}

fn result_id(explicit: Option<String>) -> String {
    explicit.unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Open the result store; failure is logged and the run continues without persistence.
fn open_store() -> Option<SqliteStore> {
    match SqliteStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "result store open failed; skipping command result write");
            None
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    init_metrics();
    let cli = Cli::parse();
    let progress = StatusLine::new();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    match cli.command {
        Commands::Render { file, out, short, no_obfuscate, write_command_result, result_id: id } => {
            let cr = parse_command_result(&read_document(&file)?)?;
            let id = result_id(id);
            info!(id = %id, objects = cr.objects.len(), "render invoked");
            let opts = OutputOptions { output: out.output, short, no_obfuscate };
            let store = if write_command_result { open_store() } else { None };
            let mut pipeline = Pipeline::new(&progress, &SecretObfuscator);
            if let Some(store) = store.as_ref() {
                pipeline = pipeline.with_store(store);
            }
            pipeline.output_command_result(&mut stdout, &id, &opts, cr, write_command_result)?;
        }
        Commands::Validate { file, out, result_id: id } => {
            let vr = parse_validate_result(&read_document(&file)?)?;
            let id = result_id(id);
            info!(id = %id, results = vr.results.len(), "validate invoked");
            Pipeline::new(&progress, &SecretObfuscator).output_validate_result(&mut stdout, &id, &out.output, vr)?;
        }
        Commands::History { output, limit } => {
            let store = SqliteStore::open_default()?;
            let rows = store.list_command_results(Some(limit))?;
            info!(count = rows.len(), "history invoked");
            let docs = rows
                .iter()
                .map(|r| serde_yaml::from_str::<serde_yaml::Value>(&r.yaml).with_context(|| format!("parsing stored result {}", r.id)))
                .collect::<Result<Vec<_>>>()?;
            Pipeline::new(&progress, &SecretObfuscator).output_yaml_result(&mut stdout, &output, &docs, true)?;
        }
    }

    Ok(())
}
