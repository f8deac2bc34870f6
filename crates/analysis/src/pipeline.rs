//! The two composed analysis pipelines
//!
//! `access_matrix` builds the walking-distance choropleth layer for existing
//! stations; `station_suitability` ranks grid cells for a new station from
//! population and the distance layer the first pipeline produced.

use crate::classify::{classify_column, Classifier};
use crate::distance::attach_distances;
use crate::join::{merge_on, sum_within};
use crate::overlay::{clip_to_study_area, StudyArea};
use crate::suitability::{filter_gt, suitability_index, zscore, SuitabilityParams};
use tracing::info;
use velogrid_core::{fields, FeatureCollection, Result};

/// Parameters for the access-matrix pipeline
#[derive(Debug, Clone)]
pub struct AccessParams {
    /// Optional rectangular clip applied to the grid before analysis.
    pub study_area: Option<StudyArea>,
    /// Upper bin edges for distance classification, in CRS units.
    /// The defaults approximate walking times of 3 and 8 minutes.
    pub bins: Vec<f64>,
}

impl Default for AccessParams {
    fn default() -> Self {
        Self {
            study_area: None,
            bins: vec![250.0, 800.0],
        }
    }
}

/// Walking-distance accessibility of existing stations.
///
/// Clips the grid to the study area (if any), computes each cell's distance
/// to the nearest station and classifies it into bins. The output layer
/// carries `distance` and `class` per cell.
pub fn access_matrix(
    grid: &FeatureCollection,
    stations: &FeatureCollection,
    params: &AccessParams,
) -> Result<FeatureCollection> {
    let classifier = Classifier::user_defined(params.bins.clone())?;

    let clipped;
    let grid = match &params.study_area {
        Some(area) => {
            clipped = clip_to_study_area(grid, area)?;
            &clipped
        }
        None => grid,
    };

    let with_distances = attach_distances(grid, stations)?;
    let classified = classify_column(
        &with_distances,
        fields::DISTANCE,
        fields::CLASS,
        &classifier,
    );

    info!("Access matrix ready: {} cells", classified.len());
    Ok(classified)
}

/// Suitability of each grid cell for a new station.
///
/// Steps, in order: sum population points into cells; drop low-population
/// cells; pull the `distance` column from the access-matrix layer by cell
/// id; drop cells already near a station; compute `sum / distance` with the
/// floor rule; z-score normalize; keep only above-mean cells. Each filter
/// only removes rows.
///
/// Returns an empty layer when no cell survives the filters.
pub fn station_suitability(
    grid: &FeatureCollection,
    population: &FeatureCollection,
    distances: &FeatureCollection,
    params: &SuitabilityParams,
) -> Result<FeatureCollection> {
    let joined = sum_within(population, grid, fields::POPULATION, fields::POPULATION_SUM)?;
    let populated = filter_gt(&joined, fields::POPULATION_SUM, params.min_population);

    let merged = merge_on(&populated, distances, fields::CELL_ID, &[fields::DISTANCE]);
    let mut candidates = filter_gt(&merged, fields::DISTANCE, params.min_distance);

    if candidates.is_empty() {
        info!("No candidate cells after population/distance filters");
        return Ok(candidates);
    }

    for feature in candidates.iter_mut() {
        // Both fields survived the filters above
        let sum = feature.get_f64(fields::POPULATION_SUM).unwrap_or(0.0);
        let dist = feature.get_f64(fields::DISTANCE).unwrap_or(0.0);
        feature.set_f64(fields::STATION_INDEX, suitability_index(sum, dist));
    }

    let raw: Vec<f64> = candidates
        .iter()
        .filter_map(|f| f.get_f64(fields::STATION_INDEX))
        .collect();
    // A lone candidate or a flat index column leaves the z-score undefined,
    // so no cell can be above the mean
    let scaled = match zscore(&raw) {
        Ok(scaled) => scaled,
        Err(_) => {
            info!(
                "Degenerate index column over {} candidate cell(s): no cell is above the mean",
                candidates.len()
            );
            return Ok(candidates.like());
        }
    };

    for (feature, score) in candidates.iter_mut().zip(scaled) {
        feature.set_f64(fields::STATION_INDEX, score);
    }

    let result = filter_gt(&candidates, fields::STATION_INDEX, 0.0);
    info!(
        "Suitability: {} candidate cells, {} above the mean",
        candidates.len(),
        result.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, polygon, Geometry, Polygon};
    use velogrid_core::{AttributeValue, Crs, Feature};

    fn crs() -> Crs {
        Crs::from_epsg(3067)
    }

    /// A row of 100m cells along the x axis, ids 1..=n.
    fn grid_row(n: usize) -> FeatureCollection {
        let features = (0..n)
            .map(|i| {
                let x0 = i as f64 * 100.0;
                let poly: Polygon<f64> = polygon![
                    (x: x0, y: 0.0), (x: x0 + 100.0, y: 0.0),
                    (x: x0 + 100.0, y: 100.0), (x: x0, y: 100.0), (x: x0, y: 0.0),
                ];
                Feature::new(Geometry::Polygon(poly))
                    .with_property(fields::CELL_ID, AttributeValue::Int(i as i64 + 1))
            })
            .collect();
        FeatureCollection::from_features(features, crs())
    }

    fn stations_at(coords: &[(f64, f64)]) -> FeatureCollection {
        FeatureCollection::from_features(
            coords
                .iter()
                .map(|&(x, y)| Feature::new(Geometry::Point(point! { x: x, y: y })))
                .collect(),
            crs(),
        )
    }

    #[test]
    fn test_access_matrix_default() {
        let grid = grid_row(5);
        // Station at the centroid of the first cell
        let stations = stations_at(&[(50.0, 50.0)]);

        let result = access_matrix(&grid, &stations, &AccessParams::default()).unwrap();
        assert_eq!(result.len(), 5);

        // Cell 1: distance 0 -> class 0; cell 4: distance 300 -> class 1;
        // cell 5: distance 400 -> class 1
        assert_eq!(result.features[0].get_i64(fields::CLASS), Some(0));
        assert_eq!(result.features[3].get_i64(fields::CLASS), Some(1));
        let d5 = result.features[4].get_f64(fields::DISTANCE).unwrap();
        assert!((d5 - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_access_matrix_with_clip() {
        let grid = grid_row(5);
        let stations = stations_at(&[(50.0, 50.0)]);
        let params = AccessParams {
            study_area: Some(StudyArea::new(0.0, 0.0, 250.0, 100.0, crs())),
            ..AccessParams::default()
        };

        let result = access_matrix(&grid, &stations, &params).unwrap();
        // Cells 1-2 fully inside, cell 3 clipped in half, cells 4-5 dropped
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_access_matrix_bad_bins() {
        let grid = grid_row(2);
        let stations = stations_at(&[(50.0, 50.0)]);
        let params = AccessParams {
            study_area: None,
            bins: vec![],
        };
        assert!(access_matrix(&grid, &stations, &params).is_err());
    }

    fn population_in_cells(per_cell: &[(f64, f64, f64)]) -> FeatureCollection {
        FeatureCollection::from_features(
            per_cell
                .iter()
                .map(|&(x, y, count)| {
                    Feature::new(Geometry::Point(point! { x: x, y: y }))
                        .with_property(fields::POPULATION, AttributeValue::Float(count))
                })
                .collect(),
            crs(),
        )
    }

    #[test]
    fn test_station_suitability_end_to_end() {
        let grid = grid_row(5);
        let stations = stations_at(&[(50.0, 50.0)]);
        let distances = access_matrix(&grid, &stations, &AccessParams::default()).unwrap();

        // Cell 1 is served (distance 0), cell 2 has too few residents,
        // cells 4 and 5 are candidates with cell 4 much more attractive.
        let population = population_in_cells(&[
            (50.0, 50.0, 500.0),
            (150.0, 50.0, 5.0),
            (350.0, 50.0, 900.0),
            (450.0, 50.0, 50.0),
        ]);

        let result =
            station_suitability(&grid, &population, &distances, &SuitabilityParams::default())
                .unwrap();

        // Only the above-mean cell survives autoscaling: cell 4
        assert_eq!(result.len(), 1);
        assert_eq!(result.features[0].get_i64(fields::CELL_ID), Some(4));
        assert!(result.features[0].get_f64(fields::STATION_INDEX).unwrap() > 0.0);
    }

    #[test]
    fn test_station_suitability_filters_are_monotonic() {
        let grid = grid_row(5);
        let stations = stations_at(&[(50.0, 50.0)]);
        let distances = access_matrix(&grid, &stations, &AccessParams::default()).unwrap();
        let population = population_in_cells(&[
            (350.0, 50.0, 100.0),
            (450.0, 50.0, 200.0),
        ]);

        let result =
            station_suitability(&grid, &population, &distances, &SuitabilityParams::default())
                .unwrap();
        assert!(result.len() <= grid.len());
        for f in result.iter() {
            assert!(f.get_f64(fields::POPULATION_SUM).unwrap() > 20.0);
            assert!(f.get_f64(fields::DISTANCE).unwrap() > 200.0);
            assert!(f.get_f64(fields::STATION_INDEX).unwrap() > 0.0);
        }
    }

    #[test]
    fn test_station_suitability_single_candidate_is_empty() {
        let grid = grid_row(5);
        let stations = stations_at(&[(50.0, 50.0)]);
        let distances = access_matrix(&grid, &stations, &AccessParams::default()).unwrap();
        // Only cell 4 passes both filters; a lone candidate has no mean to beat
        let population = population_in_cells(&[(350.0, 50.0, 100.0)]);

        let result =
            station_suitability(&grid, &population, &distances, &SuitabilityParams::default())
                .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_station_suitability_constant_index_is_empty() {
        let grid = grid_row(5);
        let stations = stations_at(&[(50.0, 50.0)]);
        let distances = access_matrix(&grid, &stations, &AccessParams::default()).unwrap();
        // Cells 4 and 5 both end up with index 0.3 (90/300 and 120/400)
        let population = population_in_cells(&[(350.0, 50.0, 90.0), (450.0, 50.0, 120.0)]);

        let result =
            station_suitability(&grid, &population, &distances, &SuitabilityParams::default())
                .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_station_suitability_no_candidates() {
        let grid = grid_row(2);
        let stations = stations_at(&[(50.0, 50.0)]);
        let distances = access_matrix(&grid, &stations, &AccessParams::default()).unwrap();
        // Everyone lives next to the station
        let population = population_in_cells(&[(50.0, 50.0, 1000.0)]);

        let result =
            station_suitability(&grid, &population, &distances, &SuitabilityParams::default())
                .unwrap();
        assert!(result.is_empty());
    }
}
