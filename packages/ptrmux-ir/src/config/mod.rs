//! Run configuration
//!
//! The mode switch is deliberately crude: a sentinel file in the working
//! directory selects fact-based resolution; its content is ignored. Paths and
//! the analysis command are configurable so tests can point the pass at a
//! temp directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Resolution strategy for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Every access may reach every candidate
    Conservative,

    /// Candidate sets come from the external fact database
    Database,
}

/// Configuration of one pass run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassConfig {
    /// Directory the marker and database files live in and the analysis
    /// command runs from
    pub work_dir: PathBuf,

    /// Sentinel file selecting database mode (existence check only)
    pub marker_file: String,

    /// Fact database file the analysis produces
    pub database_file: String,

    /// Collaborator command that refreshes the database
    pub analysis_command: String,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            marker_file: "config".to_string(),
            database_file: "pointsTo.facts".to_string(),
            analysis_command: "./analysis.sh".to_string(),
        }
    }
}

impl PassConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_marker_file(mut self, name: impl Into<String>) -> Self {
        self.marker_file = name.into();
        self
    }

    pub fn with_database_file(mut self, name: impl Into<String>) -> Self {
        self.database_file = name.into();
        self
    }

    pub fn with_analysis_command(mut self, command: impl Into<String>) -> Self {
        self.analysis_command = command.into();
        self
    }

    pub fn marker_path(&self) -> PathBuf {
        self.work_dir.join(&self.marker_file)
    }

    pub fn database_path(&self) -> PathBuf {
        self.work_dir.join(&self.database_file)
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Decide the run mode, once, from marker-file presence
    pub fn run_mode(&self) -> RunMode {
        if self.marker_path().exists() {
            RunMode::Database
        } else {
            RunMode::Conservative
        }
    }
}
