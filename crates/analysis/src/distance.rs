//! Nearest-station distance
//!
//! For each grid cell centroid, the minimum Euclidean distance to any station
//! point. Deliberately a brute-force O(n*m) scan over all stations: station
//! layers are small (hundreds of points) and the scan parallelizes trivially
//! over cells.
//!
//! Distances are in CRS units, so layers should be in a projected CRS
//! (meters) before calling.

use crate::maybe_rayon::*;
use geo::{Centroid, Distance, Euclidean};
use geo_types::{Geometry, Point};
use std::time::Instant;
use tracing::info;
use velogrid_core::{fields, Error, FeatureCollection, Result};

/// Extract station points from a layer. MultiPoints are flattened.
fn station_points(stations: &FeatureCollection) -> Vec<Point<f64>> {
    let mut points = Vec::with_capacity(stations.len());
    for feature in stations.iter() {
        match &feature.geometry {
            Some(Geometry::Point(p)) => points.push(*p),
            Some(Geometry::MultiPoint(mp)) => points.extend(mp.0.iter().copied()),
            _ => {}
        }
    }
    points
}

/// Minimum distance from each feature's centroid to the nearest station.
///
/// Returns one value per input feature, in input order. Features without a
/// geometry (or whose geometry has no centroid) get `f64::NAN`.
///
/// # Arguments
/// * `cells` - Grid cell layer (any geometry with a centroid)
/// * `stations` - Station point layer; must contain at least one point
pub fn nearest_distance(
    cells: &FeatureCollection,
    stations: &FeatureCollection,
) -> Result<Vec<f64>> {
    cells.crs.ensure_matching(&stations.crs)?;

    let points = station_points(stations);
    if points.is_empty() {
        return Err(Error::EmptyLayer("station layer has no points"));
    }

    let start = Instant::now();
    let centroids: Vec<Option<Point<f64>>> = cells
        .iter()
        .map(|f| f.geometry.as_ref().and_then(|g| g.centroid()))
        .collect();

    let distances: Vec<f64> = centroids
        .into_par_iter()
        .map(|centroid| match centroid {
            Some(c) => points
                .iter()
                .map(|p| Euclidean.distance(c, *p))
                .fold(f64::INFINITY, f64::min),
            None => f64::NAN,
        })
        .collect();

    info!(
        "Nearest-station distances for {} cells x {} stations in {:.2?}",
        cells.len(),
        points.len(),
        start.elapsed()
    );
    Ok(distances)
}

/// Clone `cells` with the nearest-station distance written to the
/// `distance` attribute of every feature.
pub fn attach_distances(
    cells: &FeatureCollection,
    stations: &FeatureCollection,
) -> Result<FeatureCollection> {
    let distances = nearest_distance(cells, stations)?;

    let mut output = cells.clone();
    for (feature, dist) in output.iter_mut().zip(distances) {
        feature.set_f64(fields::DISTANCE, dist);
    }
    Ok(output)
}
