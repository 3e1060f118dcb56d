//! Command line front end for the SAT-based line sorter

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use satsort::{
    config::{CliOverrides, Settings, SolverPreset},
    lines::write_lines,
    sorting::SortProblem,
    utils::{ColorOutput, StatisticsFormatter},
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "satsort")]
#[command(about = "Sort lines by solving a SAT encoding of the ordering")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Maximum number of input lines (overrides config)
    #[arg(long, global = true)]
    max_lines: Option<usize>,

    /// Maximum length of one line in bytes (overrides config)
    #[arg(long, global = true)]
    max_line_length: Option<usize>,

    /// CaDiCaL configuration for the live solver (overrides config)
    #[arg(long, global = true, value_enum)]
    preset: Option<SolverPreset>,

    /// Skip re-checking the decoded output
    #[arg(long, global = true)]
    no_validate: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort lines with the built-in solver
    Sort {
        /// Input file (standard input when omitted)
        input: Option<PathBuf>,
    },

    /// Write the clause artifact in DIMACS format
    Encode {
        /// Input file (standard input when omitted)
        input: Option<PathBuf>,

        /// Artifact file (standard output when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode an external solver's result for the artifact of the same input
    Decode {
        /// Input file the artifact was generated from
        input: Option<PathBuf>,

        /// Solver result file
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Report the size of the encoding without solving
    Stats {
        /// Input file (standard input when omitted)
        input: Option<PathBuf>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create the default configuration file
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match cli.command {
        Commands::Sort { input } => {
            let settings = load_settings(&cli.global, false)?;
            sort_command(settings, input.as_deref(), cli.global.verbose)
        }
        Commands::Encode { input, output } => {
            let settings = load_settings(&cli.global, false)?;
            encode_command(settings, input.as_deref(), output.as_deref())
        }
        Commands::Decode { input, model } => {
            let settings = load_settings(&cli.global, false)?;
            decode_command(settings, input.as_deref(), &model)
        }
        Commands::Stats { input, json } => {
            let settings = load_settings(&cli.global, json)?;
            stats_command(settings, input.as_deref())
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_settings(global: &GlobalArgs, json: bool) -> Result<Settings> {
    let mut settings = if global.config.exists() {
        Settings::from_file(&global.config)
            .with_context(|| format!("Failed to load config from {}", global.config.display()))?
    } else {
        warn!(path = %global.config.display(), "config file not found, using defaults");
        Settings::default()
    };

    settings.merge_with_cli(&CliOverrides {
        max_lines: global.max_lines,
        max_line_length: global.max_line_length,
        preset: global.preset,
        no_validate: global.no_validate,
        json,
    });
    settings
        .validate()
        .context("Configuration validation failed")?;

    Ok(settings)
}

fn sort_command(settings: Settings, input: Option<&Path>, verbose: bool) -> Result<()> {
    let start_time = Instant::now();
    let problem = SortProblem::from_input(settings, input).context("Failed to read input")?;

    if verbose {
        eprintln!("{}", problem.estimate_complexity());
    }

    let outcome = problem.sort()?;
    info!(seconds = start_time.elapsed().as_secs_f64(), "sorted");

    let stdout = io::stdout();
    write_lines(BufWriter::new(stdout.lock()), &outcome.lines)
        .context("Failed to write sorted lines")?;

    if verbose {
        if let Some(statistics) = &outcome.statistics {
            eprintln!("{}", statistics);
        }
        if let Some(validation) = &outcome.validation {
            eprintln!("{}", ColorOutput::success(&validation.to_string()));
        }
    }

    Ok(())
}

fn encode_command(settings: Settings, input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let problem = SortProblem::from_input(settings, input).context("Failed to read input")?;

    let statistics = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create artifact file {}", path.display()))?;
            problem.write_artifact(BufWriter::new(file))?
        }
        None => problem.write_artifact(io::stdout().lock())?,
    };

    if let Some(path) = output {
        eprintln!(
            "{}",
            ColorOutput::info(&format!(
                "Wrote {} variables and {} clauses to {}",
                statistics.constraints.variables.total_variables,
                statistics.constraints.total_clauses,
                path.display()
            ))
        );
    }

    Ok(())
}

fn decode_command(settings: Settings, input: Option<&Path>, model: &Path) -> Result<()> {
    let problem = SortProblem::from_input(settings, input).context("Failed to read input")?;

    let file = File::open(model)
        .with_context(|| format!("Failed to open solver result {}", model.display()))?;
    let outcome = problem
        .decode(BufReader::new(file))
        .with_context(|| format!("Failed to decode {}", model.display()))?;

    let stdout = io::stdout();
    write_lines(BufWriter::new(stdout.lock()), &outcome.lines)
        .context("Failed to write sorted lines")?;

    Ok(())
}

fn stats_command(settings: Settings, input: Option<&Path>) -> Result<()> {
    let format = settings.output.stats_format;
    let problem = SortProblem::from_input(settings, input).context("Failed to read input")?;
    let statistics = problem.encoding_statistics()?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", StatisticsFormatter::format(&statistics, format)?)
        .context("Failed to write statistics")?;

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    let config_dir = directory.join("config");
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("{}", ColorOutput::success(&format!("Created: {}", config_path.display())));
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Skipped: {} (already exists)", config_path.display()))
        );
    }

    Ok(())
}
