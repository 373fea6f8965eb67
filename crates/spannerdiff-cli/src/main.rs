use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use spannerdiff::{
    CancelToken, Catalog, DatabaseConfig, FileCatalog, FilterConfig, Options, Plan, RunOutcome,
    run,
};

/// Idempotent schema management for Cloud Spanner.
#[derive(Parser, Debug)]
#[command(name = "spannerdiff", version, about)]
struct Cli {
    /// Google Cloud project ID (or set SPANNER_PROJECT_ID).
    #[arg(short = 'p', long = "project", env = "SPANNER_PROJECT_ID", value_name = "project_id")]
    project: String,

    /// Spanner instance ID (or set SPANNER_INSTANCE_ID).
    #[arg(short = 'i', long = "instance", env = "SPANNER_INSTANCE_ID", value_name = "instance_id")]
    instance: String,

    /// Spanner database ID (or set SPANNER_DATABASE_ID).
    #[arg(short = 'd', long = "database", env = "SPANNER_DATABASE_ID", value_name = "database_id")]
    database: String,

    /// Read desired SQL from the file rather than stdin; repeatable,
    /// comma-separated. `-` means stdin.
    #[arg(long = "file", value_name = "sql_file", default_value = "-")]
    file: Vec<String>,

    /// Don't run DDLs, just show them.
    #[arg(long)]
    dry_run: bool,

    /// Just dump the current schema to stdout.
    #[arg(long)]
    export: bool,

    /// Enable destructive changes such as DROP TABLE, DROP INDEX.
    #[arg(long)]
    enable_drop: bool,

    /// YAML file specifying target_tables and skip_tables.
    #[arg(long, value_name = "path")]
    config: Option<PathBuf>,

    /// Fail on changes that cannot be planned instead of warning.
    #[arg(long)]
    strict: bool,

    /// Root directory of the file-backed catalog state (or set
    /// SPANNERDIFF_STATE_DIR). A network-backed catalog replaces this.
    #[arg(long = "state-dir", env = "SPANNERDIFF_STATE_DIR", value_name = "dir")]
    state_dir: PathBuf,
}

fn main() -> ExitCode {
    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn execute() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.config {
        Some(path) => FilterConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FilterConfig::default(),
    };

    let desired_ddls = if cli.export {
        String::new()
    } else {
        read_files(&parse_files(&cli.file))?
    };

    let options = Options {
        desired_ddls,
        dry_run: cli.dry_run,
        export: cli.export,
        enable_drop: cli.enable_drop,
        strict: cli.strict,
        filter,
    };

    let database = DatabaseConfig {
        project_id: cli.project,
        instance_id: cli.instance,
        database_id: cli.database,
    };
    let mut catalog = FileCatalog::new(&cli.state_dir, &database);

    let outcome = run(&mut catalog, &options, &CancelToken::new())?;
    catalog.close()?;

    match outcome {
        RunOutcome::Exported { ddl } => {
            if ddl.is_empty() {
                println!("-- No schema exists --");
            } else {
                println!("{ddl}");
            }
        }
        RunOutcome::NoChange { plan } => {
            print_warnings(&plan);
            println!("-- Nothing is modified --");
        }
        RunOutcome::DryRun { plan } => {
            print_warnings(&plan);
            println!("{}", "-- dry run --".bright_cyan());
            print_statements(&plan, cli.enable_drop);
        }
        RunOutcome::Applied { plan } => {
            print_warnings(&plan);
            println!("{}", "-- Apply --".bright_green());
            print_statements(&plan, cli.enable_drop);
        }
    }

    Ok(())
}

fn print_statements(plan: &Plan, enable_drop: bool) {
    for statement in &plan.statements {
        if statement.skipped(enable_drop) {
            println!("{}", format!("-- Skipped: {}", statement.sql).yellow());
        } else {
            println!("{}", statement.sql);
        }
    }
}

fn print_warnings(plan: &Plan) {
    for violation in &plan.violations {
        eprintln!("{} {violation}", "warning:".yellow().bold());
    }
    for change in &plan.unsupported {
        eprintln!("{} {change}", "warning:".yellow().bold());
    }
}

/// Splits repeatable `--file` values on commas and trims the entries.
fn parse_files(files: &[String]) -> Vec<String> {
    files
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Concatenates the files in order; `-` reads standard input.
fn read_files(paths: &[String]) -> Result<String> {
    let mut combined = String::new();
    for path in paths {
        if path == "-" {
            std::io::stdin()
                .read_to_string(&mut combined)
                .context("failed to read stdin")?;
        } else {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read '{path}'"))?;
            combined.push_str(&text);
        }
        if !combined.ends_with('\n') {
            combined.push('\n');
        }
    }
    Ok(combined)
}
