//! Scheduler configuration: the scoring mode.
//!
//! The mode is read once, before the scheduler is built, and never changes
//! afterwards.  It comes from an optional YAML args document:
//! ```yaml
//! mode: Most     # Least | Most
//! ```
//!
//! * No args document at all → `Least`, with a warning.
//! * Args document present → `mode` must be exactly `Least` or `Most`;
//!   anything else (including a missing field) is a configuration error.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::scheduler::SchedulerError;

pub const LEAST_MODE: &str = "Least";
pub const MOST_MODE: &str = "Most";

// ── ScoringMode ───────────────────────────────────────────────────────────────

/// Which end of the memory range the scorer favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringMode {
    /// Prefer nodes with *less* allocatable memory (pack tightly).
    #[default]
    Least,
    /// Prefer nodes with *more* allocatable memory (spread out).
    Most,
}

impl ScoringMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringMode::Least => LEAST_MODE,
            ScoringMode::Most => MOST_MODE,
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMode {
    type Err = SchedulerError;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LEAST_MODE => Ok(ScoringMode::Least),
            MOST_MODE => Ok(ScoringMode::Most),
            other => Err(SchedulerError::InvalidMode(other.to_string())),
        }
    }
}

// ── SchedulerArgs ─────────────────────────────────────────────────────────────

/// Scheduler args document as it appears in YAML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulerArgs {
    #[serde(default)]
    pub mode: Option<String>,
}

impl SchedulerArgs {
    /// Parses the args document at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not valid YAML.
    /// The `mode` value itself is checked by [`scoring_mode`](Self::scoring_mode).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading scheduler args from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open scheduler args file: {}", path.display()))?;

        let args: SchedulerArgs = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        Ok(args)
    }

    /// Validated scoring mode of this document.
    pub fn scoring_mode(&self) -> Result<ScoringMode, SchedulerError> {
        match self.mode.as_deref() {
            None => Err(SchedulerError::MissingMode),
            Some(mode) => mode.parse(),
        }
    }
}

/// Resolve the scoring mode from an optional args document.
pub fn resolve_scoring_mode(args: Option<&SchedulerArgs>) -> Result<ScoringMode, SchedulerError> {
    match args {
        None => {
            warn!("No scheduler args provided, defaulting to mode {}", LEAST_MODE);
            Ok(ScoringMode::Least)
        }
        Some(args) => args.scoring_mode(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
