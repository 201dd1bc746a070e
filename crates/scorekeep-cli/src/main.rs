//! Scorekeep CLI
//!
//! Command-line front end over the score store

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scorekeep_core::logging_facility::{init, init_with_filter, Profile};
use scorekeep_store::DEFAULT_DB_FILE;

mod commands;

const QUIET_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(name = "scorekeep")]
#[command(about = "Scorekeep - keep a sorted list of named scores", long_about = None)]
struct Cli {
    /// Path to the scores database
    #[arg(long, global = true, env = "SCOREKEEP_DB", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Show store lifecycle logs; otherwise only warnings and errors
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a new score
    Add(commands::scores::AddArgs),
    /// List all scores, highest first
    List(commands::scores::ListArgs),
    /// Show one score
    Show(commands::scores::ShowArgs),
    /// Change the name and value of a score
    Edit(commands::scores::EditArgs),
    /// Remove a score
    Remove(commands::scores::RemoveArgs),
}

fn main() {
    let cli = Cli::parse();

    let profile = match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    };
    if cli.verbose {
        init(profile);
    } else {
        init_with_filter(profile, QUIET_FILTER);
    }

    let result = match cli.command {
        Commands::Add(args) => commands::scores::add(&cli.db, args),
        Commands::List(args) => commands::scores::list(&cli.db, args),
        Commands::Show(args) => commands::scores::show(&cli.db, args),
        Commands::Edit(args) => commands::scores::edit(&cli.db, args),
        Commands::Remove(args) => commands::scores::remove(&cli.db, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
