use anyhow::Result;
use clap::{Parser, Subcommand};
use finsimple_core::ChartKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod llm;
mod render;
mod state;

use commands::ChartArgs;

#[derive(Parser, Debug)]
#[command(
    name = "finsimple",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINSIMPLE_BUILD_SHA"), ")"),
    about = "Clean, chart and analyze financial CSV exports"
)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the file as uploaded
    Raw {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Show the cleaned table, or export it with --out
    Clean {
        #[arg(long)]
        csv: PathBuf,

        /// Write the cleaned table as CSV instead of printing a preview
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Min / max / mean across the numeric columns
    Metrics {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Bind two numeric columns to a chart and print the series
    Chart {
        #[arg(long)]
        csv: PathBuf,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Ask Gemini for a narrative analysis of the cleaned table
    Analyze {
        #[arg(long)]
        csv: PathBuf,

        /// Model id (default from config, e.g. gemini-2.5-pro)
        #[arg(long)]
        model: Option<String>,
    },

    /// Raw data, processed data, metrics, chart and analysis in one go
    Report {
        #[arg(long)]
        csv: PathBuf,

        #[command(flatten)]
        chart: ChartOpts,

        #[arg(long)]
        model: Option<String>,

        /// Skip the Gemini request
        #[arg(long, default_value_t = false)]
        skip_ai: bool,
    },

    /// Manage ~/.finsimple/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(clap::Args, Debug)]
struct ChartOpts {
    /// line, bar, area, scatter or pie
    #[arg(long, default_value = "line")]
    kind: ChartKind,

    /// X-axis column (default: first numeric column)
    #[arg(long)]
    x: Option<String>,

    /// Y-axis column (default: first numeric column)
    #[arg(long)]
    y: Option<String>,
}

impl From<ChartOpts> for ChartArgs {
    fn from(o: ChartOpts) -> Self {
        ChartArgs {
            kind: o.kind,
            x: o.x,
            y: o.y,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the key may come from the shell or config.toml.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Raw { csv } => commands::raw(&csv, &config::load_config()?)?,

        Command::Clean { csv, out } => commands::clean_cmd(&csv, out, &config::load_config()?)?,

        Command::Metrics { csv } => commands::metrics(&csv)?,

        Command::Chart { csv, chart } => commands::chart(&csv, &chart.into())?,

        Command::Analyze { csv, model } => {
            let cfg = config::load_config()?;
            commands::analyze(&csv, &cfg, model.as_deref()).await?;
        }

        Command::Report {
            csv,
            chart,
            model,
            skip_ai,
        } => {
            let cfg = config::load_config()?;
            commands::report(&csv, &cfg, &chart.into(), model.as_deref(), skip_ai).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}
