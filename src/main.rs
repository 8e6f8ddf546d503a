mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Commands, ProbeArgs, SweepArgs};
use snapper_vision::config::{DetectionConfig, load_config, parse_blank};
use snapper_vision::logging::{EchoWriter, init_tracing};
use snapper_vision::parallel_pipeline::ParallelSweep;
use snapper_vision::pipeline::{SweepPipeline, SweepReport};
use snapper_vision::{Scan, SnapperImage, TargetShape, TextFileSource};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Version => {
            println!("snapper_vision {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Sweep(sweep) => run_sweep(sweep, args.log_level, args.log_file.as_deref()).await,
        Commands::Probe(probe) => {
            init_tracing(args.log_level.as_deref(), args.log_file.as_deref())?;
            run_probe(probe)
        }
    }
}

fn image_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn run_sweep(args: SweepArgs, log_level: Option<String>, log_file: Option<&Path>) -> Result<()> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => DetectionConfig::default(),
    };
    cfg.apply_overrides(args.overrides(log_level));
    init_tracing(cfg.log_level.as_deref(), log_file)?;
    cfg.validate()?;

    let blank = cfg.blank()?;
    let image_path = cfg.image.clone().context("no snapper image given")?;
    let image = Arc::new(
        SnapperImage::from_source(image_name(&image_path), &TextFileSource::new(&image_path))
            .with_context(|| format!("loading snapper image {}", image_path.display()))?,
    );
    info!(image = %image.name, "{}", image.grid_dimensions());

    let parallel = if args.parallel {
        Some(ParallelSweep::new(cfg.pipeline_config(), cfg.workers)?)
    } else {
        None
    };
    let sequential = SweepPipeline::new(cfg.pipeline_config())?;

    let mut reports: Vec<SweepReport> = Vec::with_capacity(cfg.targets.len());
    for target_cfg in &cfg.targets {
        let target = Arc::new(
            TargetShape::from_source(&target_cfg.name, &TextFileSource::new(&target_cfg.path), blank)
                .with_context(|| format!("loading target {}", target_cfg.path.display()))?,
        );
        let report = match &parallel {
            Some(pool) => pool.sweep(Arc::clone(&image), target).await?,
            None => sequential.sweep(&image, &target)?,
        };
        reports.push(report);
    }

    if let Some(pool) = parallel {
        pool.shutdown().await;
    }

    let mut echo = EchoWriter::stdout_and_file(cfg.echo_file.as_deref())?;
    if args.json {
        let json = serde_json::to_string_pretty(&reports).context("serializing reports")?;
        echo.echo_line(&json)?;
    } else {
        for report in &reports {
            for scan in report.scans_in_order() {
                echo.echo_line(&scan.summary)?;
            }
            echo.echo_line(&report.total_line())?;
        }
    }
    echo.flush()?;
    Ok(())
}

fn run_probe(args: ProbeArgs) -> Result<()> {
    let blank = parse_blank(&args.blank)?;

    let image = SnapperImage::from_source(image_name(&args.image), &TextFileSource::new(&args.image))
        .with_context(|| format!("loading snapper image {}", args.image.display()))?;
    let target = TargetShape::from_source(&args.target.name, &TextFileSource::new(&args.target.path), blank)
        .with_context(|| format!("loading target {}", args.target.path.display()))?;

    let scan = Scan::new(&image.grid, &target, args.horizontal, args.vertical, args.min_confidence)?;
    println!("{scan}");
    Ok(())
}
