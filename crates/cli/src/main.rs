//! PRA CLI - potential release area delineation for snow avalanches

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use pra_algorithms::forest::ForestType;
use pra_algorithms::pra::{run, PraConfig};
use pra_algorithms::terrain::{
    aspect, ruggedness, ruggedness_class, slope, wind_shelter, WindShelterParams,
    RUGGEDNESS_CUTOFF,
};
use pra_core::io::{read_geotiff, write_geotiff, GeoTiffOptions, SampleFormat};
use pra_core::Raster;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "pra")]
#[command(author, version, about = "Potential release area delineation for snow avalanches", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Run the full delineation and write every layer
    Delineate {
        /// Input DEM file
        #[arg(long)]
        dem: PathBuf,
        /// Forest raster (not needed for forest type no_forest)
        #[arg(long)]
        forest: Option<PathBuf>,
        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Forest type: stems, pcc, bav, sen2cc, no_forest
        #[arg(long)]
        forest_type: Option<String>,
        /// Cutoff of the single release mask
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Write masks for every cutoff 0.00..=1.00
        #[arg(long)]
        all_thresholds: bool,
        /// Wind-shelter radius in cells
        #[arg(short, long)]
        radius: Option<usize>,
        /// Wind-shelter quantile
        #[arg(short, long)]
        prob: Option<f64>,
        /// Wind direction in degrees (0=North, clockwise)
        #[arg(long)]
        wind_dir: Option<f64>,
        /// Sector half-width around the wind direction, degrees
        #[arg(long)]
        wind_tol: Option<f64>,
    },
    /// Single terrain stages
    Terrain {
        #[command(subcommand)]
        algorithm: TerrainCommands,
    },
    /// Compare valid-cell counts above a value in two rasters
    Compare {
        /// First raster
        first: PathBuf,
        /// Second raster (reference for the percent difference)
        second: PathBuf,
        /// Count cells strictly above this value
        #[arg(short, long, default_value = "1.0")]
        above: f64,
    },
}

// ─── Terrain subcommands ────────────────────────────────────────────────

#[derive(Subcommand)]
enum TerrainCommands {
    /// Calculate slope (degrees) from DEM
    Slope {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
    },
    /// Calculate aspect (degrees, 0=North, clockwise) from DEM
    Aspect {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
    },
    /// Calculate the wind shelter index from DEM
    WindShelter {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Search radius in cells
        #[arg(short, long, default_value = "6")]
        radius: usize,
        /// Wind direction in degrees (0=North, clockwise)
        #[arg(short = 'd', long, default_value = "0")]
        wind_dir: f64,
        /// Sector half-width around the wind direction, degrees
        #[arg(short = 't', long, default_value = "179")]
        wind_tol: f64,
        /// Quantile of the sampled angles
        #[arg(short, long, default_value = "0.5")]
        prob: f64,
    },
    /// Calculate vector ruggedness from DEM
    Ruggedness {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Also write the rugged/smooth class raster here
        #[arg(long)]
        class_output: Option<PathBuf>,
        /// Ruggedness at or above this value is rugged
        #[arg(long, default_value_t = RUGGEDNESS_CUTOFF)]
        cutoff: f64,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_raster(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> = read_geotiff(path, None)
        .with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn write_result(raster: &Raster<f64>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::default()))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn write_class(raster: &Raster<u8>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::new(SampleFormat::Int16)))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

/// File configuration (or defaults) with command-line overrides applied
#[allow(clippy::too_many_arguments)]
fn resolve_config(
    path: Option<&Path>,
    forest_type: Option<&str>,
    threshold: Option<f64>,
    all_thresholds: bool,
    radius: Option<usize>,
    prob: Option<f64>,
    wind_dir: Option<f64>,
    wind_tol: Option<f64>,
) -> Result<PraConfig> {
    let mut config = match path {
        Some(p) => PraConfig::load(p).with_context(|| format!("Invalid configuration {}", p.display()))?,
        None => PraConfig::default(),
    };

    if let Some(t) = forest_type {
        config.forest_type = t.parse::<ForestType>()?;
    }
    if let Some(t) = threshold {
        config.single_threshold = t;
    }
    if all_thresholds {
        config.save_all_thresholds = true;
    }
    if let Some(r) = radius {
        config.radius = r;
    }
    if let Some(p) = prob {
        config.prob = p;
    }
    if let Some(d) = wind_dir {
        config.wind_dir = d;
    }
    if let Some(t) = wind_tol {
        config.wind_tol = t;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Valid cells strictly above `above`
fn count_above(path: &Path, above: f64) -> Result<usize> {
    let raster = read_raster(path)?;
    let count = raster.count_above(above);
    let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    println!("{}: pixel count >{} = {}", name, above, count);
    Ok(count)
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let raster = read_raster(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(crs) = raster.crs() {
                println!("CRS: {}", crs);
            }
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len() as f64
            );
        }

        // ── Delineate ────────────────────────────────────────────────
        Commands::Delineate {
            dem,
            forest,
            out_dir,
            config,
            forest_type,
            threshold,
            all_thresholds,
            radius,
            prob,
            wind_dir,
            wind_tol,
        } => {
            let config = resolve_config(
                config.as_deref(),
                forest_type.as_deref(),
                threshold,
                all_thresholds,
                radius,
                prob,
                wind_dir,
                wind_tol,
            )?;

            let dem_raster = read_raster(&dem)?;
            let forest_raster = match (&forest, config.forest_type.requires_grid()) {
                (Some(path), true) => Some(read_raster(path)?),
                (None, true) => bail!("--forest is required for forest type '{}'", config.forest_type),
                (Some(path), false) => {
                    warn!("Ignoring forest raster {} for forest type no_forest", path.display());
                    None
                }
                (None, false) => None,
            };

            let start = Instant::now();
            let outputs = run(&dem_raster, forest_raster.as_ref(), &config).context("PRA delineation failed")?;

            let pb = spinner("Writing outputs...");
            let written = outputs
                .layers
                .write_all(&out_dir)
                .with_context(|| format!("Failed to write outputs to {}", out_dir.display()))?;
            pb.finish_and_clear();
            let elapsed = start.elapsed();

            println!("PRA delineation saved to: {}", out_dir.display());
            println!("  Layers written: {}", written.len());
            for timing in &outputs.diagnostics.timings {
                println!("  {:<24} {:.2?}", timing.stage, timing.elapsed);
            }
            if !outputs.diagnostics.warnings.is_empty() {
                println!("  Warnings:");
                for w in &outputs.diagnostics.warnings {
                    println!("    {}", w);
                }
            }
            println!("  Processing time: {:.2?}", elapsed);
        }

        // ── Terrain ──────────────────────────────────────────────────
        Commands::Terrain { algorithm } => match algorithm {
            TerrainCommands::Slope { input, output } => {
                let dem = read_raster(&input)?;
                let start = Instant::now();
                let result = slope(&dem).context("Failed to calculate slope")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Slope", &output, elapsed);
            }
            TerrainCommands::Aspect { input, output } => {
                let dem = read_raster(&input)?;
                let start = Instant::now();
                let result = aspect(&dem).context("Failed to calculate aspect")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Aspect", &output, elapsed);
            }
            TerrainCommands::WindShelter {
                input,
                output,
                radius,
                wind_dir,
                wind_tol,
                prob,
            } => {
                let dem = read_raster(&input)?;
                let params = WindShelterParams {
                    radius,
                    wind_direction: wind_dir,
                    wind_tolerance: wind_tol,
                    quantile: prob,
                };
                let start = Instant::now();
                let result = wind_shelter(&dem, &params).context("Failed to calculate wind shelter")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Wind shelter", &output, elapsed);
            }
            TerrainCommands::Ruggedness {
                input,
                output,
                class_output,
                cutoff,
            } => {
                let dem = read_raster(&input)?;
                let start = Instant::now();
                let slope_raster = slope(&dem).context("Failed to calculate slope")?;
                let aspect_raster = aspect(&dem).context("Failed to calculate aspect")?;
                let result = ruggedness(&slope_raster, &aspect_raster).context("Failed to calculate ruggedness")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                if let Some(class_path) = class_output {
                    let class = ruggedness_class(&result, cutoff)?;
                    write_class(&class, &class_path)?;
                    println!("Ruggedness class saved to: {}", class_path.display());
                }
                done("Ruggedness", &output, elapsed);
            }
        },

        // ── Compare ──────────────────────────────────────────────────
        Commands::Compare { first, second, above } => {
            let a = count_above(&first, above)?;
            let b = count_above(&second, above)?;
            let abs_diff = b as i64 - a as i64;

            println!("\n--- Comparison ---");
            println!("Absolute difference (second - first): {}", abs_diff);
            if b == 0 {
                println!("Percent difference (relative to second): n/a");
            } else {
                println!(
                    "Percent difference (relative to second): {:.2}%",
                    100.0 * abs_diff as f64 / b as f64
                );
            }
        }
    }

    Ok(())
}
