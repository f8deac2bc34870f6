//! Velogrid CLI - bike-share station accessibility analysis

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use velogrid_analysis::classify::Classifier;
use velogrid_analysis::overlay::{overlay_collections, OverlayOp, StudyArea};
use velogrid_analysis::pipeline::{access_matrix, station_suitability, AccessParams};
use velogrid_analysis::suitability::SuitabilityParams;
use velogrid_colormap::{
    style_by_class, style_by_value, style_markers, ColorScheme, DEFAULT_MARKER_COLOR,
};
use velogrid_core::io::{read_geojson, write_geojson};
use velogrid_core::{fields, Crs, FeatureCollection};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "velogrid")]
#[command(author, version, about = "Bike-share station accessibility analysis", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// CRS tag for all input layers (EPSG:<code>); GeoJSON itself is CRS-less
    #[arg(long, global = true, default_value = "EPSG:4326")]
    crs: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a vector layer
    Info {
        /// Input GeoJSON layer
        input: PathBuf,
    },
    /// Overlay a polygon layer against a mask layer
    Clip {
        /// Input polygon layer (e.g. the analysis grid)
        #[arg(short, long)]
        input: PathBuf,
        /// Mask layer (e.g. the sea polygon)
        #[arg(short, long)]
        mask: PathBuf,
        /// Overlay operation: difference or intersection
        #[arg(long, default_value = "difference")]
        how: String,
        /// Output layer
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Walking-distance choropleth for existing stations
    Access {
        /// Grid cell layer
        #[arg(short, long)]
        grid: PathBuf,
        /// Station point layer
        #[arg(short, long)]
        stations: PathBuf,
        /// Output styled layer
        #[arg(short, long)]
        output: PathBuf,
        /// Distance bin edges in CRS units, comma separated
        #[arg(short, long, default_value = "250,800")]
        bins: String,
        /// Optional study-area rectangle: minx,miny,maxx,maxy
        #[arg(long)]
        study_area: Option<String>,
        /// Color scheme for the choropleth
        #[arg(long, default_value = "rdylbu")]
        scheme: String,
    },
    /// Suitability index for placing a new station
    Suitability {
        /// Grid cell layer
        #[arg(short, long)]
        grid: PathBuf,
        /// Population point layer
        #[arg(short, long)]
        population: PathBuf,
        /// Distance layer produced by the access command
        #[arg(short, long)]
        distances: PathBuf,
        /// Output styled layer
        #[arg(short, long)]
        output: PathBuf,
        /// Minimum population sum for a candidate cell
        #[arg(long, default_value = "20")]
        min_population: f64,
        /// Minimum distance to an existing station for a candidate cell
        #[arg(long, default_value = "200")]
        min_distance: f64,
        /// Color scheme for the choropleth
        #[arg(long, default_value = "reds")]
        scheme: String,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_layer(path: &PathBuf, crs: &Crs) -> Result<FeatureCollection> {
    let pb = spinner("Reading layer...");
    let layer = read_geojson(path, Some(crs.clone()))
        .with_context(|| format!("Failed to read {}", path.display()))?;
    pb.finish_and_clear();
    info!("{}: {} features", path.display(), layer.len());
    Ok(layer)
}

fn write_layer(layer: &FeatureCollection, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geojson(layer, path).with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_bins(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid bin edge: {}", part))
        })
        .collect()
}

fn parse_study_area(s: &str, crs: &Crs) -> Result<StudyArea> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().context("Invalid study-area coordinate"))
        .collect::<Result<_>>()?;
    if parts.len() != 4 {
        anyhow::bail!("Study area must be minx,miny,maxx,maxy, got: {}", s);
    }
    if parts[0] >= parts[2] || parts[1] >= parts[3] {
        anyhow::bail!("Study area min corner must be below max corner");
    }
    Ok(StudyArea::new(parts[0], parts[1], parts[2], parts[3], crs.clone()))
}

fn parse_scheme(s: &str) -> Result<ColorScheme> {
    ColorScheme::parse(s)
        .ok_or_else(|| anyhow::anyhow!("Unknown color scheme: {}. Use rdylbu, reds, or grayscale.", s))
}

fn geometry_kind(geom: &geo_types::Geometry<f64>) -> &'static str {
    match geom {
        geo_types::Geometry::Point(_) => "Point",
        geo_types::Geometry::MultiPoint(_) => "MultiPoint",
        geo_types::Geometry::LineString(_) => "LineString",
        geo_types::Geometry::MultiLineString(_) => "MultiLineString",
        geo_types::Geometry::Polygon(_) => "Polygon",
        geo_types::Geometry::MultiPolygon(_) => "MultiPolygon",
        _ => "Other",
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let crs = Crs::parse(&cli.crs).context("Invalid --crs")?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let layer = read_layer(&input, &crs)?;

            let mut counts: std::collections::BTreeMap<&str, usize> =
                std::collections::BTreeMap::new();
            let mut no_geometry = 0usize;
            for feature in layer.iter() {
                match &feature.geometry {
                    Some(g) => *counts.entry(geometry_kind(g)).or_insert(0) += 1,
                    None => no_geometry += 1,
                }
            }

            println!("File: {}", input.display());
            println!("Features: {}", layer.len());
            println!("CRS: {}", layer.crs);
            for (kind, count) in counts {
                println!("  {}: {}", kind, count);
            }
            if no_geometry > 0 {
                println!("  (no geometry): {}", no_geometry);
            }
        }

        // ── Clip ─────────────────────────────────────────────────────
        Commands::Clip { input, mask, how, output } => {
            let op = OverlayOp::parse(&how)?;
            let layer = read_layer(&input, &crs)?;
            let mask_layer = read_layer(&mask, &crs)?;

            let start = Instant::now();
            let result = overlay_collections(&layer, &mask_layer, op)?;
            write_layer(&result, &output)?;
            done("Clipped layer", &output, start.elapsed());
        }

        // ── Access matrix ────────────────────────────────────────────
        Commands::Access { grid, stations, output, bins, study_area, scheme } => {
            let scheme = parse_scheme(&scheme)?;
            let bins = parse_bins(&bins)?;
            let study_area = study_area
                .as_deref()
                .map(|s| parse_study_area(s, &crs))
                .transpose()?;

            let grid_layer = read_layer(&grid, &crs)?;
            let station_layer = read_layer(&stations, &crs)?;

            let start = Instant::now();
            let params = AccessParams { study_area, bins: bins.clone() };
            let result = access_matrix(&grid_layer, &station_layer, &params)?;

            let classifier = Classifier::user_defined(bins)?;
            let mut styled = style_by_class(&result, fields::CLASS, scheme, classifier.n_classes());
            // Overlay the station markers on the choropleth
            let markers = style_markers(&station_layer, DEFAULT_MARKER_COLOR);
            styled.features.extend(markers.features);

            println!("Distance classes:");
            for (i, label) in classifier.labels().iter().enumerate() {
                let count = styled
                    .iter()
                    .filter(|f| f.get_i64(fields::CLASS) == Some(i as i64))
                    .count();
                println!("  class {} ({}): {} cells", i, label, count);
            }

            write_layer(&styled, &output)?;
            done("Access matrix", &output, start.elapsed());
        }

        // ── Suitability ──────────────────────────────────────────────
        Commands::Suitability {
            grid,
            population,
            distances,
            output,
            min_population,
            min_distance,
            scheme,
        } => {
            let scheme = parse_scheme(&scheme)?;
            let grid_layer = read_layer(&grid, &crs)?;
            let population_layer = read_layer(&population, &crs)?;
            let distance_layer = read_layer(&distances, &crs)?;

            let start = Instant::now();
            let params = SuitabilityParams { min_population, min_distance };
            let result =
                station_suitability(&grid_layer, &population_layer, &distance_layer, &params)?;

            if result.is_empty() {
                println!("No cells above the mean suitability; nothing to write.");
            } else {
                let styled = style_by_value(&result, fields::STATION_INDEX, scheme);
                write_layer(&styled, &output)?;
                done("Suitability layer", &output, start.elapsed());
            }
        }
    }

    Ok(())
}
