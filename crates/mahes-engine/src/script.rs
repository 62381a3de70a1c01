//! Deterministic replay of YAML intent scripts.
//!
//! A script pins its own clock: intent `n` is dispatched at
//! `start + n * step_secs`, so replaying the same script against the same
//! catalog and an empty store always yields the same final state.

use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use mahes_store::KeyValueStore;

use crate::intent::{Intent, Outcome};
use crate::session::GameSession;

/// Default seconds between scripted intents.
const DEFAULT_STEP_SECS: i64 = 30;

/// Errors that can occur when loading a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Failed to read the script file.
    #[error("failed to read script: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the script YAML.
    #[error("failed to parse script YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ScriptError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// A list of intents with a pinned clock.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    /// Time of the first intent.
    #[serde(default = "default_start")]
    pub start: DateTime<Utc>,

    /// Seconds between consecutive intents.
    #[serde(default = "default_step_secs")]
    pub step_secs: i64,

    /// Intents in dispatch order.
    pub intents: Vec<Intent>,
}

impl Script {
    /// Load a script from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a script from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Yaml`] if the string is not a valid script.
    pub fn parse(yaml: &str) -> Result<Self, ScriptError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// The dispatch time of intent number `index`.
    pub fn time_of(&self, index: usize) -> DateTime<Utc> {
        let offset = i64::try_from(index)
            .ok()
            .and_then(|n| n.checked_mul(self.step_secs))
            .and_then(TimeDelta::try_seconds)
            .unwrap_or_default();
        self.start.checked_add_signed(offset).unwrap_or(self.start)
    }

    /// Dispatch every intent against `session`. Rejected intents are
    /// counted and replay continues.
    pub fn replay<S: KeyValueStore>(&self, session: &mut GameSession<S>) -> ReplayReport {
        let mut report = ReplayReport::default();
        for (index, intent) in self.intents.iter().enumerate() {
            match session.dispatch(intent.clone(), self.time_of(index)) {
                Ok(outcome) => {
                    tracing::info!(
                        step = index,
                        event = ?outcome.event,
                        phase = %outcome.phase,
                        "Step applied"
                    );
                    report.outcomes.push(outcome);
                }
                Err(e) => {
                    tracing::info!(step = index, error = %e, "Step rejected");
                    report.rejected.push((index, e.to_string()));
                }
            }
        }
        report
    }
}

/// What happened during a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Outcomes of accepted intents, in order.
    pub outcomes: Vec<Outcome>,
    /// Index and message of each rejected intent.
    pub rejected: Vec<(usize, String)>,
}

const fn default_start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

const fn default_step_secs() -> i64 {
    DEFAULT_STEP_SECS
}
