//! Engine configuration.
//!
//! # Responsibility
//! - Hold the tunable amounts (penalties, rewards) and sync timing.
//! - Parse an optional JSON document with per-field defaults.
//!
//! # Invariants
//! - `sync.debounce_ms` is strictly positive after `validate()`.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sync: SyncConfig,
    pub penalties: PenaltyConfig,
    pub rewards: RewardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Quiet period before a pending write is sent.
    pub debounce_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { debounce_ms: 1_000 }
    }
}

/// Per-item deductions applied on day rollover.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    pub missed_task: u64,
    pub missed_habit: u64,
    pub overdue_book: u64,
    pub missed_journal: u64,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            missed_task: 20,
            missed_habit: 10,
            overdue_book: 20,
            missed_journal: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub journal_entry: u64,
    pub day_complete: u64,
    /// Used when neither the user nor the suggester supplies a value.
    pub default_task_points: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            journal_entry: 50,
            day_complete: 500,
            default_task_points: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files; `None` disables file logs.
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid engine config: {err}"),
            Self::Invalid(reason) => write!(f, "invalid engine config: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl EngineConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.debounce_ms == 0 {
            return Err(ConfigError::Invalid("sync.debounce_ms must be positive"));
        }
        Ok(())
    }
}
