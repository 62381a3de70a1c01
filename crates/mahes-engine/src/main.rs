//! Intent replay binary for the Mahes progression engine.
//!
//! Replays a YAML intent script against a file-backed session and prints
//! the final game state as YAML.
//!
//! ```text
//! mahes-engine <script.yaml> [--config <mahes-config.yaml>]
//! ```
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`mahes-config.yaml`, defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Load the content catalog (configured path or built-in reference)
//! 4. Open the file store under `storage.save_dir`
//! 5. Replay the script
//! 6. Log the summary and print the final state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mahes_catalog::{Catalog, CatalogError};
use mahes_core::{ConfigError, GameConfig};
use mahes_engine::{GameSession, Script, ScriptError};
use mahes_store::{FileStore, StoreError};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Config file used when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "mahes-config.yaml";

/// Top-level error for the replay binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
enum EngineError {
    /// Bad command line.
    #[error("usage: mahes-engine <script.yaml> [--config <path>] ({message})")]
    Usage {
        /// What was wrong with the arguments.
        message: String,
    },

    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Catalog loading failed.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },

    /// The save directory could not be opened.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The intent script could not be loaded.
    #[error("script error: {source}")]
    Script {
        /// The underlying script error.
        #[from]
        source: ScriptError,
    },

    /// The final state could not be rendered.
    #[error("output error: {source}")]
    Output {
        /// The underlying YAML error.
        source: serde_yml::Error,
    },
}

/// Parsed command line.
struct Args {
    script: PathBuf,
    config: PathBuf,
}

fn main() -> Result<(), EngineError> {
    let args = parse_args(std::env::args().skip(1))?;

    // 1. Load configuration.
    let config = GameConfig::load_or_default(&args.config)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        config = %args.config.display(),
        save_dir = %config.storage.save_dir.display(),
        max_entries = ?config.leaderboard.max_entries,
        "mahes-engine starting"
    );

    // 3. Load the catalog.
    let catalog = Arc::new(load_catalog(config.catalog.path.as_deref())?);
    info!(questions = catalog.len(), "Catalog loaded");

    // 4. Open the store.
    let store = FileStore::open(&config.storage.save_dir)?;

    // 5. Replay.
    let script = Script::from_file(&args.script)?;
    info!(
        script = %args.script.display(),
        intents = script.intents.len(),
        "Replaying script"
    );
    let mut session = GameSession::new(catalog, store, &config);
    let report = script.replay(&mut session);

    // 6. Summarize.
    let state = session.state();
    info!(
        accepted = report.outcomes.len(),
        rejected = report.rejected.len(),
        phase = %session.phase(),
        score = state.stats.score,
        karma = state.stats.karma,
        level = session.level().level,
        completed = state.progress.completed_challenges.len(),
        ending = ?session.ending(),
        "Replay finished"
    );

    let rendered = serde_yml::to_string(state).map_err(|source| EngineError::Output { source })?;
    print!("{rendered}");
    Ok(())
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args, EngineError> {
    let mut script = None;
    let mut config = PathBuf::from(DEFAULT_CONFIG_PATH);

    while let Some(arg) = argv.next() {
        if arg == "--config" {
            let value = argv.next().ok_or_else(|| EngineError::Usage {
                message: String::from("--config needs a path"),
            })?;
            config = PathBuf::from(value);
        } else if script.is_none() {
            script = Some(PathBuf::from(arg));
        } else {
            return Err(EngineError::Usage {
                message: format!("unexpected argument {arg}"),
            });
        }
    }

    let script = script.ok_or_else(|| EngineError::Usage {
        message: String::from("missing script path"),
    })?;
    Ok(Args { script, config })
}

/// Load the configured catalog, or the built-in reference content.
fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog from file");
            Catalog::from_file(path)
        }
        None => Catalog::reference(),
    }
}
