use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use refguard_core::{Config, Diagnostic, DiagnosticCode, Severity};
use refguard_dbt::Manifest;
use refguard_engine::{
    check_primary_key_description, check_snapshot_target_schema, unreadable_file, CheckOutcome,
    TableNameCheck,
};

/// All checks passed
const EXIT_OK: u8 = 0;

/// At least one check failed
const EXIT_VIOLATIONS: u8 = 1;

/// Manifest or config could not be loaded; no check ran
const EXIT_LOAD_FAILURE: u8 = 2;

/// RefGuard - pre-commit checks for dbt projects
#[derive(Parser)]
#[command(name = "refguard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: refguard.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write a JSON report to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fail when SQL references tables without source() or ref()
    CheckScriptHasNoTableName {
        /// Ignore table names without a schema qualifier
        #[arg(long)]
        ignore_dotless_table: bool,

        /// SQL files or directories to scan
        filenames: Vec<PathBuf>,
    },

    /// Fail when a changed model's primary-key column has no description
    CheckModelHasPrimaryKeyDescription {
        /// Path to dbt manifest.json
        #[arg(short, long, default_value = "target/manifest.json")]
        manifest: PathBuf,

        /// Changed files
        filenames: Vec<String>,
    },

    /// Fail when a changed snapshot does not set target_schema via generate_schema_name
    CheckSnapshotHasTargetSchema {
        /// Path to dbt manifest.json
        #[arg(short, long, default_value = "target/manifest.json")]
        manifest: PathBuf,

        /// Changed files
        filenames: Vec<String>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::CheckScriptHasNoTableName { .. } => "check-script-has-no-table-name",
            Self::CheckModelHasPrimaryKeyDescription { .. } => "check-model-has-primary-key-description",
            Self::CheckSnapshotHasTargetSchema { .. } => "check-snapshot-has-target-schema",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(EXIT_LOAD_FAILURE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<u8> {
    let config = load_config(cli.config.as_deref(), cli.verbose)?;
    let check = cli.command.name();
    let output = cli.output.as_deref();

    tracing::info!(check, "running check");

    match cli.command {
        Commands::CheckScriptHasNoTableName { ignore_dotless_table, filenames } => Ok(
            table_name_command(&config, &filenames, ignore_dotless_table, output, cli.verbose),
        ),
        Commands::CheckModelHasPrimaryKeyDescription { manifest, filenames } => {
            let Some(manifest) = load_manifest(&manifest) else {
                return Ok(EXIT_LOAD_FAILURE);
            };
            let outcome = check_primary_key_description(
                &filenames,
                &manifest,
                &config.primary_key,
                &config.allowlist,
            );
            Ok(finish(&config, outcome, check, output, cli.verbose))
        }
        Commands::CheckSnapshotHasTargetSchema { manifest, filenames } => {
            let Some(manifest) = load_manifest(&manifest) else {
                return Ok(EXIT_LOAD_FAILURE);
            };
            let outcome =
                check_snapshot_target_schema(&filenames, &manifest, &config.snapshot, &config.allowlist);
            Ok(finish(&config, outcome, check, output, cli.verbose))
        }
    }
}

/// Load the config file given on the command line, or refguard.toml if present
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(config_path) = path {
        return Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()));
    }

    let default_path = Path::new("refguard.toml");
    if default_path.exists() {
        return Config::from_file(default_path).context("Failed to load refguard.toml");
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

fn load_manifest(path: &Path) -> Option<Manifest> {
    match Manifest::from_file(path) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            eprintln!("Unable to load manifest file ({})", e);
            None
        }
    }
}

/// Raw table name check over files and directories
fn table_name_command(
    config: &Config,
    filenames: &[PathBuf],
    ignore_dotless_table: bool,
    output: Option<&Path>,
    verbose: bool,
) -> u8 {
    let mut rules = config.table_name.clone();
    rules.ignore_dotless_table |= ignore_dotless_table;

    let mut outcome = CheckOutcome::default();

    for path in expand_sql_paths(filenames) {
        let file = path.display().to_string();
        if config.allowlist.is_file_skipped(&file) {
            tracing::debug!(file = %file, "skipped by allowlist");
            continue;
        }

        if verbose {
            eprintln!("  {} {}...", "Checking".cyan(), file);
        }

        let diagnostics = match std::fs::read_to_string(&path) {
            Ok(sql) => TableNameCheck::check(file, &sql, &rules)
                .diagnostic()
                .into_iter()
                .collect(),
            Err(e) => vec![unreadable_file(file, e)],
        };
        outcome.extend(CheckOutcome::new(1, diagnostics));
    }

    finish(config, outcome, "check-script-has-no-table-name", output, verbose)
}

/// Files named directly, plus every `.sql` file under named directories
fn expand_sql_paths(filenames: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for path in filenames {
        if !path.is_dir() {
            paths.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_sql(entry.path()) => {
                    paths.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unreadable directory entry"),
            }
        }
    }

    paths
}

fn is_sql(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("sql"))
}

/// Apply overrides, print, optionally save the report, and pick the exit code
///
/// A report that cannot be written fails the hook but is not a load failure.
fn finish(
    config: &Config,
    outcome: CheckOutcome,
    check: &str,
    output: Option<&Path>,
    verbose: bool,
) -> u8 {
    let outcome = outcome.with_overrides(&config.severity);
    let mut code = if outcome.has_errors() { EXIT_VIOLATIONS } else { EXIT_OK };

    print_diagnostics(&outcome.diagnostics);

    if verbose {
        eprintln!();
        eprintln!(
            "Checked {} ({} errors, {} warnings)",
            outcome.checked,
            outcome.error_count(),
            outcome.warning_count()
        );
    }

    if let Some(path) = output {
        let report = outcome.into_report(check);
        match report.save_to_file(path) {
            Ok(()) if verbose => eprintln!("{} {}", "Report saved to:".green(), path.display()),
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to write report");
                eprintln!("{} Failed to write report to {}: {}", "error:".red().bold(), path.display(), e);
                code = EXIT_VIOLATIONS;
            }
        }
    }

    code
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    let missing_pkey: Vec<&str> = diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::ModelMissingPrimaryKeyDescription)
        .flat_map(|d| d.subjects.iter().map(String::as_str))
        .collect();

    for diag in diagnostics {
        let file = diag.location.as_ref().map(|l| l.file.as_str()).unwrap_or("<unknown>");
        let label = severity_label(diag.severity);

        match diag.code {
            DiagnosticCode::ScriptHasTableName => {
                println!("{}{}: {}:", label, file.red(), diag.message);
                for table in &diag.subjects {
                    println!("- {}", table.yellow());
                }
            }
            DiagnosticCode::ModelMissingPrimaryKeyDescription => {
                tracing::debug!(message = %diag.message, "primary key diagnostic");
            }
            _ => println!("{}{}: {}", label, file.red(), diag.message),
        }
    }

    if !missing_pkey.is_empty() {
        println!(
            "Following models are missing primary-key description:\n- {}",
            missing_pkey.join("\n- ").yellow()
        );
    }
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Error => String::new(),
        Severity::Warn => format!("{} ", "warning:".yellow().bold()),
        Severity::Info => format!("{} ", "info:".cyan()),
    }
}
