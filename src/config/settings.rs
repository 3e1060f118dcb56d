//! Configuration settings for the SAT-based line sorter

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub limits: LimitsConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

/// Hard ceilings on the input; the encoding grows as N² * W
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_lines: usize,
    pub max_line_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub preset: SolverPreset,
}

/// CaDiCaL configuration the live engine is created with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SolverPreset {
    Default,
    Plain,
    Sat,
    Unsat,
}

impl SolverPreset {
    pub fn as_str(self) -> &'static str {
        match self {
            SolverPreset::Default => "default",
            SolverPreset::Plain => "plain",
            SolverPreset::Sat => "sat",
            SolverPreset::Unsat => "unsat",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub validate: bool,
    pub stats_format: StatsFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatsFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            limits: LimitsConfig {
                max_lines: 4096,
                max_line_length: 1024,
            },
            solver: SolverConfig {
                preset: SolverPreset::Default,
            },
            output: OutputConfig {
                validate: true,
                stats_format: StatsFormat::Text,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_lines == 0 {
            anyhow::bail!("Maximum number of lines must be positive");
        }

        if self.limits.max_line_length == 0 {
            anyhow::bail!("Maximum line length must be positive");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(max_lines) = cli_overrides.max_lines {
            self.limits.max_lines = max_lines;
        }
        if let Some(max_line_length) = cli_overrides.max_line_length {
            self.limits.max_line_length = max_line_length;
        }
        if let Some(preset) = cli_overrides.preset {
            self.solver.preset = preset;
        }
        if cli_overrides.no_validate {
            self.output.validate = false;
        }
        if cli_overrides.json {
            self.output.stats_format = StatsFormat::Json;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub max_lines: Option<usize>,
    pub max_line_length: Option<usize>,
    pub preset: Option<SolverPreset>,
    pub no_validate: bool,
    pub json: bool,
}
