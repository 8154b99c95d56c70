use anyhow::{bail, Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tfe_runtask::config::Config;
use tfe_runtask::provider::{Provider, ProviderConfig};
use tfe_runtask::resource::workspace_run_task::workspace_run_task_schema;
use tfe_runtask::resource::{lifecycle, plan, PlanAction, ResourceError};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Manage TFE workspace run task associations
#[derive(Parser, Debug)]
#[command(name = "tfe-runtask", version = tfe_runtask::VERSION, about, long_about = None)]
struct Args {
    /// TFE hostname or address
    #[arg(long, global = true, env = "TFE_HOSTNAME")]
    hostname: Option<String>,

    /// API token
    #[arg(long, global = true, env = "TFE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(
        long,
        global = true,
        env = "TFE_SSL_SKIP_VERIFY",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    ssl_skip_verify: bool,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print resource schemas as JSON
    Schema,
    /// Show the change needed to reach the configuration
    Plan {
        /// State file (missing means the resource does not exist yet)
        #[arg(long)]
        state: PathBuf,
        /// Configuration document, JSON or YAML (omit to plan a destroy)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Apply the configuration and write the resulting state
    Apply {
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Re-read the recorded association and update the state file
    Refresh {
        #[arg(long)]
        state: PathBuf,
    },
    /// Delete the recorded association
    Destroy {
        #[arg(long)]
        state: PathBuf,
    },
    /// Import an existing association: <ORGANIZATION>/<WORKSPACE NAME>/<TASK NAME>
    Import {
        id: String,
        #[arg(long)]
        state: PathBuf,
    },
    /// Save connection settings to the config file
    Configure {
        #[arg(long)]
        set_hostname: Option<String>,
        #[arg(long)]
        set_ssl_skip_verify: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    // RUST_LOG narrows further, e.g. `tfe_runtask::tfe=trace`
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tfe-runtask started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("tfe-runtask").join("tfe-runtask.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".tfe-runtask").join("tfe-runtask.log");
    }
    PathBuf::from("tfe-runtask.log")
}

/// Read a JSON or YAML document; `.yaml`/`.yml` select YAML
fn read_document(path: &Path) -> Result<Value> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("Invalid YAML in {:?}", path))
    } else {
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
    }
}

/// Missing, blank or `null` state file means no resource
fn read_state(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let state = read_document(path)?;
    Ok(Some(state).filter(|s| !s.is_null()))
}

fn write_state(path: &Path, state: Option<&Value>) -> Result<()> {
    match state {
        Some(state) => {
            let content = serde_json::to_string_pretty(state)?;
            std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("State written to {:?}", path);
        }
        None => {
            if path.exists() {
                std::fs::remove_file(path)
                    .with_context(|| format!("Failed to remove {:?}", path))?;
                tracing::info!("State removed: {:?}", path);
            }
        }
    }
    Ok(())
}

/// Print every diagnostic to stderr and turn the error into an exit failure
fn report(err: ResourceError) -> anyhow::Error {
    for diagnostic in err.diagnostics() {
        match &diagnostic.attribute {
            Some(attribute) => eprintln!("Error: {} (at {})", diagnostic.summary, attribute),
            None => eprintln!("Error: {}", diagnostic.summary),
        }
        eprintln!("\n  {}\n", diagnostic.detail);
    }
    anyhow::Error::new(err)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Merge CLI/env settings over the saved config file
fn resolve_config(args: &Args) -> Config {
    let mut config = Config::load();
    if let Some(hostname) = &args.hostname {
        config.hostname = Some(hostname.clone());
    }
    if let Some(token) = &args.token {
        config.token = Some(token.clone());
    }
    if args.ssl_skip_verify {
        config.ssl_skip_verify = Some(true);
    }
    config
}

fn configure_provider(config: &Config) -> Result<Provider> {
    let hostname = config.effective_hostname();
    let Some(token) = config.effective_token() else {
        bail!(
            "No API token for {}: set TFE_TOKEN, pass --token, or run `terraform login {}`",
            hostname,
            hostname
        );
    };

    let provider = Provider::configure(&ProviderConfig {
        hostname,
        token,
        ssl_skip_verify: config.effective_ssl_skip_verify(),
    })?;
    Ok(provider)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = resolve_config(&args);

    match &args.command {
        Command::Schema => print_json(&Provider::resource_schemas()),
        Command::Plan { state, config: desired } => {
            let prior = read_state(state)?;
            let desired = desired.as_deref().map(read_document).transpose()?;
            let change = plan::plan(
                &workspace_run_task_schema(),
                prior.as_ref(),
                desired.as_ref(),
            )
            .map_err(report)?;
            print_json(&change)
        }
        Command::Apply { state, config: desired } => {
            let provider = configure_provider(&config)?;
            let resource = provider.workspace_run_task();
            let prior = read_state(state)?;
            let desired = desired.as_deref().map(read_document).transpose()?;

            let change = lifecycle::plan_change(&resource, prior.as_ref(), desired.as_ref())
                .map_err(report)?;
            if change.action == PlanAction::NoOp {
                println!("No changes.");
                return Ok(());
            }

            let new_state = lifecycle::apply(&resource, prior.as_ref(), &change)
                .await
                .map_err(report)?;
            write_state(state, new_state.as_ref())?;
            println!("Apply complete: {:?}", change.action);
            Ok(())
        }
        Command::Refresh { state } => {
            let provider = configure_provider(&config)?;
            let resource = provider.workspace_run_task();
            let Some(prior) = read_state(state)? else {
                bail!("No state at {:?}", state);
            };

            let refreshed = lifecycle::refresh(&resource, &prior).await.map_err(report)?;
            if refreshed.is_none() {
                eprintln!("Warning: the association no longer exists and was removed from state");
            }
            write_state(state, refreshed.as_ref())
        }
        Command::Destroy { state } => {
            let provider = configure_provider(&config)?;
            let resource = provider.workspace_run_task();
            let prior = read_state(state)?;

            let change = lifecycle::plan_change(&resource, prior.as_ref(), None).map_err(report)?;
            let new_state = lifecycle::apply(&resource, prior.as_ref(), &change)
                .await
                .map_err(report)?;
            write_state(state, new_state.as_ref())?;
            println!("Destroy complete.");
            Ok(())
        }
        Command::Import { id, state } => {
            if read_state(state)?.is_some() {
                bail!("State file {:?} already tracks an association", state);
            }
            let provider = configure_provider(&config)?;
            let resource = provider.workspace_run_task();

            let imported = lifecycle::import(&resource, id).await.map_err(report)?;
            write_state(state, Some(&imported))?;
            print_json(&imported)
        }
        Command::Configure {
            set_hostname,
            set_ssl_skip_verify,
        } => {
            let mut saved = Config::load();
            if let Some(hostname) = set_hostname {
                saved.set_hostname(hostname)?;
            }
            if let Some(skip) = set_ssl_skip_verify {
                saved.set_ssl_skip_verify(*skip)?;
            }
            println!("hostname: {}", saved.effective_hostname());
            println!("ssl_skip_verify: {}", saved.effective_ssl_skip_verify());
            Ok(())
        }
    }
}
