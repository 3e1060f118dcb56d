//! Configuration management for the SAT-based line sorter

pub mod settings;

pub use settings::{
    Settings, LimitsConfig, SolverConfig, OutputConfig, SolverPreset, StatsFormat, CliOverrides
};
