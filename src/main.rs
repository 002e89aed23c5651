use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use module_bridge::config::{validate_config, Config, ConfigLoader};
use module_bridge::{
    ModuleBridge, ScriptError, ScriptFunction, ScriptObject, ScriptValue, SnapshotProvider,
    TracingErrorSink,
};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Query a process snapshot through the script-facing Module bridge
#[derive(Debug, Parser)]
#[command(name = "module-bridge", version, about)]
struct Cli {
    /// JSON process snapshot to query (overrides `[provider] snapshot`)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, default_value = "module-bridge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the imports of a module, one JSON record per line
    Imports {
        module: String,
        /// Stop after this many records
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the exports of a module
    Exports {
        module: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the ranges of a module granting at least PROTECTION
    Ranges {
        module: String,
        #[arg(long, default_value = "---")]
        protection: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the base address of a module, or null
    Base { module: String },
    /// Print the address of an exported symbol, or null
    Export {
        /// Restrict the search to one module
        #[arg(long)]
        module: Option<String>,
        symbol: String,
    },
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_ascii_lowercase()));
    let file = config
        .logging
        .open_log_file()
        .with_context(|| format!("failed to open log file {}", config.logging.file))?;

    // stdout carries the records
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// `{onMatch, onComplete}` printing each record; returns "stop" at `limit`
fn printing_callbacks(limit: Option<usize>) -> ScriptValue {
    let printed = Rc::new(Cell::new(0usize));

    let counter = Rc::clone(&printed);
    let on_match = ScriptFunction::new(move |args| {
        let record = args.first().cloned().unwrap_or_default();
        let line = serde_json::to_string(&record).map_err(|e| ScriptError::new(e.to_string()))?;
        println!("{line}");

        counter.set(counter.get() + 1);
        if limit.is_some_and(|limit| counter.get() >= limit) {
            Ok(ScriptValue::from("stop"))
        } else {
            Ok(ScriptValue::Undefined)
        }
    });

    let on_complete = ScriptFunction::new(move |_| {
        debug!(records = printed.get(), "enumeration complete");
        Ok(ScriptValue::Undefined)
    });

    ScriptObject::new()
        .with("onMatch", on_match)
        .with("onComplete", on_complete)
        .into()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new(&cli.config)
        .load_or_default()
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    validate_config(&config)?;

    init_logging(&config)?;
    info!("Starting module-bridge v{}", env!("CARGO_PKG_VERSION"));

    let snapshot = match cli.snapshot.clone().or_else(|| config.provider.snapshot.clone().map(PathBuf::from)) {
        Some(path) => path,
        None => bail!("no snapshot given; pass --snapshot or set [provider] snapshot"),
    };

    let provider = SnapshotProvider::from_path(&snapshot)
        .with_context(|| format!("failed to load snapshot {}", snapshot.display()))?;
    let bridge = ModuleBridge::with_options(provider, TracingErrorSink, config.bridge_options());

    let (operation, args) = match cli.command {
        Command::Imports { module, limit } => (
            "enumerateImports",
            vec![module.into(), printing_callbacks(limit)],
        ),
        Command::Exports { module, limit } => (
            "enumerateExports",
            vec![module.into(), printing_callbacks(limit)],
        ),
        Command::Ranges {
            module,
            protection,
            limit,
        } => (
            "enumerateRanges",
            vec![module.into(), protection.into(), printing_callbacks(limit)],
        ),
        Command::Base { module } => ("findBaseAddress", vec![module.into()]),
        Command::Export { module, symbol } => (
            "findExportByName",
            vec![ScriptValue::from(module), symbol.into()],
        ),
    };

    let result = bridge.invoke(operation, &args)?;

    match (operation, result) {
        ("findBaseAddress" | "findExportByName", value) => {
            println!("{}", serde_json::to_string(&value)?);
        }
        (_, ScriptValue::Null) => bail!("{operation}: invalid arguments"),
        _ => {}
    }

    Ok(())
}
