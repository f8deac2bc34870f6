//! End-to-end test of both analysis pipelines over a synthetic city.
//!
//! Builds a 6x6 grid of 100m cells, a handful of stations and a population
//! layer, then runs the access matrix and the suitability pipeline on top of
//! it, checking the arithmetic properties the pipelines promise: the
//! suitability floor rule, strictly positive retained z-scores, and
//! monotonic filtering.

use geo_types::{point, polygon, Geometry, Polygon};
use velogrid_analysis::classify::Classifier;
use velogrid_analysis::overlay::StudyArea;
use velogrid_analysis::pipeline::{access_matrix, station_suitability, AccessParams};
use velogrid_analysis::suitability::{suitability_index, SuitabilityParams};
use velogrid_core::{fields, AttributeValue, Crs, Feature, FeatureCollection};

const CELL: f64 = 100.0;

fn crs() -> Crs {
    Crs::from_epsg(3067)
}

/// 6x6 grid of 100m cells, ids numbered row-major from 1.
fn make_grid() -> FeatureCollection {
    let mut features = Vec::new();
    for row in 0..6 {
        for col in 0..6 {
            let (x0, y0) = (col as f64 * CELL, row as f64 * CELL);
            let poly: Polygon<f64> = polygon![
                (x: x0, y: y0), (x: x0 + CELL, y: y0),
                (x: x0 + CELL, y: y0 + CELL), (x: x0, y: y0 + CELL), (x: x0, y: y0),
            ];
            features.push(
                Feature::new(Geometry::Polygon(poly))
                    .with_property(fields::CELL_ID, AttributeValue::Int(row * 6 + col + 1)),
            );
        }
    }
    FeatureCollection::from_features(features, crs())
}

/// Two stations in the south-west corner of the grid.
fn make_stations() -> FeatureCollection {
    FeatureCollection::from_features(
        vec![
            Feature::new(Geometry::Point(point! { x: 50.0, y: 50.0 })),
            Feature::new(Geometry::Point(point! { x: 150.0, y: 50.0 })),
        ],
        crs(),
    )
}

/// Population concentrated in the north-east, far from both stations.
fn make_population() -> FeatureCollection {
    let residents = [
        (50.0, 50.0, 300.0),   // next to a station
        (250.0, 250.0, 40.0),  // mid-grid
        (450.0, 450.0, 500.0), // far corner, should dominate
        (550.0, 550.0, 800.0), // even further
        (550.0, 450.0, 30.0),
        (50.0, 550.0, 60.0),   // far but modest population
    ];
    FeatureCollection::from_features(
        residents
            .iter()
            .map(|&(x, y, n)| {
                Feature::new(Geometry::Point(point! { x: x, y: y }))
                    .with_property(fields::POPULATION, AttributeValue::Float(n))
            })
            .collect(),
        crs(),
    )
}

#[test]
fn access_matrix_classifies_every_cell() {
    let result = access_matrix(&make_grid(), &make_stations(), &AccessParams::default()).unwrap();
    assert_eq!(result.len(), 36);

    let classifier = Classifier::user_defined(vec![250.0, 800.0]).unwrap();
    for feature in result.iter() {
        let distance = feature.get_f64(fields::DISTANCE).unwrap();
        assert!(distance.is_finite());
        let class = feature.get_i64(fields::CLASS).unwrap() as usize;
        assert_eq!(classifier.classify(distance), Some(class));
    }

    // The station cells themselves are in the nearest class
    let first = result
        .iter()
        .find(|f| f.get_i64(fields::CELL_ID) == Some(1))
        .unwrap();
    assert_eq!(first.get_i64(fields::CLASS), Some(0));
}

#[test]
fn access_matrix_study_area_clip_is_monotonic() {
    let full = access_matrix(&make_grid(), &make_stations(), &AccessParams::default()).unwrap();

    let params = AccessParams {
        study_area: Some(StudyArea::new(0.0, 0.0, 350.0, 350.0, crs())),
        ..AccessParams::default()
    };
    let clipped = access_matrix(&make_grid(), &make_stations(), &params).unwrap();

    assert!(clipped.len() < full.len());
    // 3x3 cells fully inside plus the boundary row/column clipped in place
    assert_eq!(clipped.len(), 16);
}

#[test]
fn suitability_retained_cells_are_above_mean() {
    let grid = make_grid();
    let distances = access_matrix(&grid, &make_stations(), &AccessParams::default()).unwrap();
    let result = station_suitability(
        &grid,
        &make_population(),
        &distances,
        &SuitabilityParams::default(),
    )
    .unwrap();

    assert!(!result.is_empty());
    assert!(result.len() < grid.len());

    for feature in result.iter() {
        // Every filter held: population, distance, and the autoscaled index
        assert!(feature.get_f64(fields::POPULATION_SUM).unwrap() > 20.0);
        assert!(feature.get_f64(fields::DISTANCE).unwrap() > 200.0);
        assert!(feature.get_f64(fields::STATION_INDEX).unwrap() > 0.0);
    }

    // The far, dense corner cells outrank everything else
    let ids: Vec<i64> = result
        .iter()
        .filter_map(|f| f.get_i64(fields::CELL_ID))
        .collect();
    assert!(ids.contains(&29) || ids.contains(&36));
}

#[test]
fn suitability_floor_rule_zeroes_station_cells() {
    // A cell with a station inside it has distance ~0; its raw index must be 0
    assert_eq!(suitability_index(10_000.0, 0.0), 0.0);
    assert_eq!(suitability_index(10_000.0, 0.5), 0.0);
    assert!(suitability_index(10_000.0, 1.0) > 0.0);
}

#[test]
fn suitability_pipeline_is_deterministic() {
    let grid = make_grid();
    let distances = access_matrix(&grid, &make_stations(), &AccessParams::default()).unwrap();

    let a = station_suitability(
        &grid,
        &make_population(),
        &distances,
        &SuitabilityParams::default(),
    )
    .unwrap();
    let b = station_suitability(
        &grid,
        &make_population(),
        &distances,
        &SuitabilityParams::default(),
    )
    .unwrap();

    assert_eq!(a.len(), b.len());
    for (fa, fb) in a.iter().zip(b.iter()) {
        assert_eq!(
            fa.get_f64(fields::STATION_INDEX),
            fb.get_f64(fields::STATION_INDEX)
        );
    }
}
