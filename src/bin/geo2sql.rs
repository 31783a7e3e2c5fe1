//! geo2sql: GeoJSON to PostGIS INSERT statements
//!
//! # Usage
//!
//! ```bash
//! # Whole route as one MultiLineString row
//! geo2sql route lucknow_cables.geojson -n "BNZ-GKP (no.2)"
//!
//! # One row per segment
//! geo2sql segments lucknow_cables.geojson -n "BNZ-GKP (no.2)"
//!
//! # Poles along an existing route (prompts for anything missing)
//! geo2sql poles
//!
//! # Everything from geo2sql.toml
//! geo2sql --config jobs/lucknow.toml
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::*;
use geo2sql::prelude::*;
use geo2sql::prompt::{self, LinePrompter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geo2sql")]
#[command(version)]
#[command(about = "Turn GeoJSON cable routes and poles into PostGIS INSERT statements", long_about = None)]
#[command(after_help = "EXAMPLES:
    geo2sql route cables.geojson -n 'BNZ-GKP (no.2)'
    geo2sql segments cables.geojson -n 'BNZ-GKP (no.2)' -o insert_routes.sql
    geo2sql poles poles.geojson -n 'BNZ-GKP (no.2)' --dry-run")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Job settings file (defaults to ./geo2sql.toml if present)
    #[arg(short, long, global = true, env = "GEO2SQL_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every LineString into one cable_routes row
    Route(JobArgs),
    /// Write one cable_routes row per LineString
    Segments(JobArgs),
    /// Write one ohe_poles row per Point
    Poles(JobArgs),
}

#[derive(Args, Default)]
struct JobArgs {
    /// GeoJSON FeatureCollection to read
    input: Option<PathBuf>,

    /// Route name (segments: base name; poles: route to link to)
    #[arg(short = 'n', long = "name")]
    route_name: Option<String>,

    /// Route type stored in cable_routes.type
    #[arg(short = 't', long = "type")]
    route_type: Option<String>,

    /// Output SQL file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep elevation and any extra coordinate components
    #[arg(long)]
    keep_elevation: bool,

    /// Start the output with a provenance comment
    #[arg(long)]
    header: bool,

    /// Print the SQL instead of writing the output file
    #[arg(short, long)]
    dry_run: bool,
}

impl JobArgs {
    fn settings(&self, mode: Option<Mode>) -> JobSettings {
        JobSettings {
            mode,
            input: self.input.clone(),
            output: self.output.clone(),
            route_name: self.route_name.clone(),
            route_type: self.route_type.clone(),
            keep_elevation: self.keep_elevation.then_some(true),
            header: self.header.then_some(true),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute(&cli) {
        match e.downcast_ref::<Geo2SqlError>() {
            Some(err) if err.is_warning() => {
                println!("{} {}", "⚠".yellow(), err.to_string().yellow());
            }
            _ => {
                eprintln!("{} {}", "✗ Error:".red().bold(), e);
                process::exit(1);
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "geo2sql=debug" } else { "geo2sql=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: &Cli) -> Result<()> {
    let no_args = JobArgs::default();
    let (mode, args) = match &cli.command {
        Some(Commands::Route(args)) => (Some(Mode::Route), args),
        Some(Commands::Segments(args)) => (Some(Mode::Segments), args),
        Some(Commands::Poles(args)) => (Some(Mode::Poles), args),
        None => (None, &no_args),
    };

    let file_settings = match &cli.config {
        Some(path) => JobSettings::load(path)?,
        None => match JobSettings::discover()? {
            Some((path, settings)) => {
                if cli.verbose {
                    println!("{} {}", "Using config:".dimmed(), path.display());
                }
                settings
            }
            None => JobSettings::default(),
        },
    };

    let mut settings = args.settings(mode).merge(file_settings);
    if settings.mode.is_none() {
        show_usage();
        return Ok(());
    }
    if settings.input.is_none() || settings.route_name.as_deref().is_none_or(str::is_empty) {
        let mut prompter = LinePrompter::new()?;
        prompt::fill_missing(&mut settings, &mut prompter)?;
    }
    let config = settings.resolve()?;

    if cli.verbose {
        println!("{} {}", "Reading from".dimmed(), config.input.display().to_string().yellow());
    }

    if args.dry_run {
        print!("{}", render(&config)?);
        return Ok(());
    }

    let report = run(&config)?;
    println!(
        "{} {} INSERT statement(s) written to '{}'",
        "✓".green(),
        report.statements.to_string().cyan(),
        report.output.display().to_string().cyan()
    );
    println!(
        "{}",
        "You can now run this file in your database client (psql, DBeaver, Supabase SQL Editor).".dimmed()
    );
    Ok(())
}

fn show_usage() {
    println!("{}", "geo2sql: GeoJSON to PostGIS INSERT statements".cyan().bold());
    println!();
    println!("Usage: geo2sql <route|segments|poles> [INPUT] [OPTIONS]");
    println!();
    println!("Try: geo2sql --help");
}
