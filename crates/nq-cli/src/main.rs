mod config;
mod logging;
mod region;
mod report;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use crate::config::QaConfig;
use crate::run::{Destination, run_connectivity, run_crossings};

#[derive(Parser, Debug)]
#[command(name = "nq")]
#[command(about = "Quality checks for waterway and road line networks")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, required = true)]
    config: PathBuf,
    /// Only log warnings and errors.
    #[arg(long, short = 'q')]
    quiet: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tag every waterway with the outlet it drains to (0 when none).
    #[command(name = "connectivity")]
    Connectivity(OutputArgs),
    /// Find road/waterway crossings without bridge or tunnel tags.
    #[command(name = "crossings")]
    Crossings(OutputArgs),
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Overrides `output.dir` from the config.
    #[arg(long)]
    destination: Option<PathBuf>,
    /// Overrides `output.prefix` from the config.
    #[arg(long)]
    prefix: Option<String>,
}

impl OutputArgs {
    fn resolve(&self, cfg: &QaConfig) -> Destination {
        Destination {
            dir: self
                .destination
                .clone()
                .unwrap_or_else(|| cfg.output.dir.clone()),
            prefix: self
                .prefix
                .clone()
                .unwrap_or_else(|| cfg.output.prefix.clone()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = QaConfig::from_path(&cli.config)?;

    let args = match &cli.cmd {
        Command::Connectivity(args) | Command::Crossings(args) => args,
    };
    let dest = args.resolve(&cfg);
    logging::init(&dest.dir, cli.quiet)?;
    info!(config = %cli.config.display(), destination = %dest.dir.display(), "nq started");

    let outcome = match &cli.cmd {
        Command::Connectivity(_) => run_connectivity(&cfg, &dest).map(|r| {
            for section in &r.sections {
                for region in &section.regions {
                    info!(
                        check = %section.name,
                        region = %region.region,
                        reached = region.reached,
                        unreached = region.unreached.len(),
                        invalid = region.invalid_geometry.len(),
                        "connectivity"
                    );
                }
            }
        }),
        Command::Crossings(_) => run_crossings(&cfg, &dest).map(|r| {
            for region in &r.regions {
                info!(
                    region = %region.region,
                    correct = region.summary.correct,
                    no_info = region.summary.no_info,
                    "crossings"
                );
            }
        }),
    };

    if let Err(err) = &outcome {
        error!("{err:#}");
    }
    outcome
}
