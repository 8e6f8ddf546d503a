// THEORY:
// Command line arguments backing the `snapper_vision` binary. Sweep flags map
// onto `Overrides`; probe flags describe a single scan and skip the config file.

use clap::{Args as ClapArgs, Parser, Subcommand};
use snapper_vision::config::{Overrides, TargetConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "snapper_vision",
    about = "Locate known target shapes inside a character-grid snapper image",
    version
)]
pub struct Args {
    /// Log filter, e.g. `info` or `snapper_vision=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also write log output to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,
    /// Scan every position of the image for each target
    Sweep(SweepArgs),
    /// Scan a single position of the image for one target
    Probe(ProbeArgs),
}

#[derive(ClapArgs, Debug)]
pub struct SweepArgs {
    /// JSON config file; flags given here override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Snapper image text file
    #[arg(long, short = 'i')]
    pub image: Option<PathBuf>,

    /// Target as NAME=PATH; repeat for several targets
    #[arg(long, short = 't')]
    pub target: Vec<TargetConfig>,

    /// Character treated as background
    #[arg(long, short = 'b')]
    pub blank: Option<String>,

    /// Minimum fraction of occupied cells that must match, in [0, 1]
    #[arg(long, short = 'm')]
    pub min_confidence: Option<f64>,

    /// Spread the sweep over a worker pool
    #[arg(long)]
    pub parallel: bool,

    /// Worker count for --parallel (defaults to the number of CPUs)
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Mirror the printed results into this file
    #[arg(long, short = 'e')]
    pub echo_file: Option<PathBuf>,

    /// Also print positions where the target was not found
    #[arg(long)]
    pub report_misses: bool,

    /// Print the reports as JSON instead of summary lines
    #[arg(long)]
    pub json: bool,
}

impl SweepArgs {
    pub fn overrides(&self, log_level: Option<String>) -> Overrides {
        Overrides {
            image: self.image.clone(),
            targets: self.target.clone(),
            blank_character: self.blank.clone(),
            minimum_confidence: self.min_confidence,
            workers: self.workers,
            echo_file: self.echo_file.clone(),
            log_level,
            report_misses: self.report_misses,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct ProbeArgs {
    /// Snapper image text file
    #[arg(long, short = 'i')]
    pub image: PathBuf,

    /// Target as NAME=PATH
    #[arg(long, short = 't')]
    pub target: TargetConfig,

    /// Character treated as background
    #[arg(long, short = 'b', default_value = " ")]
    pub blank: String,

    /// Minimum fraction of occupied cells that must match, in [0, 1]
    #[arg(long, short = 'm', default_value = "0.75")]
    pub min_confidence: f64,

    /// Horizontal (column) offset of the window
    #[arg(long, value_name = "COL")]
    pub horizontal: usize,

    /// Vertical (row) offset of the window
    #[arg(long, value_name = "ROW")]
    pub vertical: usize,
}
