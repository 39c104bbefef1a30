mod commands;
mod context;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use commands::EventArgs;
use context::Context;

#[derive(Parser)]
#[command(name = "calview")]
#[command(about = "Browse your calendar by month, list a day's events and draft new ones")]
struct Cli {
    /// JSON events file (defaults to events_file from the config, then sample events)
    #[arg(long, global = true)]
    events: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid with the events on each day
    Month {
        /// Month to show (YYYY-MM, defaults to the selected date's month)
        #[arg(long)]
        month: Option<String>,

        /// Highlight this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        select: Option<String>,

        /// Show the month before
        #[arg(long, conflicts_with = "next")]
        prev: bool,

        /// Show the month after
        #[arg(long)]
        next: bool,
    },
    /// Show how many events fall in each month of a year
    Year {
        #[arg(long)]
        year: Option<i32>,
    },
    /// List the events on a day
    Day {
        /// YYYY-MM-DD, defaults to today
        date: Option<String>,
    },
    /// Check whether an event occurs on a date, or list its occurrences up to --until
    Occurs {
        id: String,

        /// YYYY-MM-DD
        date: String,

        /// List every occurrence from DATE until this date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
    },
    /// Create an event and print it as JSON
    New {
        #[command(flatten)]
        fields: EventArgs,
    },
    /// Change an event and print the result as JSON
    Edit {
        id: String,

        #[command(flatten)]
        fields: EventArgs,
    },
    /// Remove an event and list what remains on its day
    Delete { id: String },
    /// Show the config file location, creating a default one if missing
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Config => commands::config::run(),
        Commands::Month {
            month,
            select,
            prev,
            next,
        } => {
            let ctx = Context::load(cli.events.as_deref())?;
            let step = i32::from(next) - i32::from(prev);
            commands::month::run(ctx, month.as_deref(), select.as_deref(), step)
        }
        Commands::Year { year } => {
            let ctx = Context::load(cli.events.as_deref())?;
            commands::year::run(&ctx, year)
        }
        Commands::Day { date } => {
            let ctx = Context::load(cli.events.as_deref())?;
            commands::day::run(ctx, date.as_deref())
        }
        Commands::Occurs { id, date, until } => {
            let ctx = Context::load(cli.events.as_deref())?;
            commands::occurs::run(&ctx, &id, &date, until.as_deref())
        }
        Commands::New { fields } => {
            let ctx = Context::load(cli.events.as_deref())?;
            commands::new::run(ctx, fields)
        }
        Commands::Edit { id, fields } => {
            let ctx = Context::load(cli.events.as_deref())?;
            commands::edit::run(ctx, &id, fields)
        }
        Commands::Delete { id } => {
            let ctx = Context::load(cli.events.as_deref())?;
            commands::delete::run(ctx, &id)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }
}
