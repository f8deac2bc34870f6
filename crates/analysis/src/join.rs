//! Spatial and attribute joins
//!
//! `sum_within` replaces the sjoin-then-groupby step of the original
//! analysis: population points are assigned to the grid cell containing
//! them and summed per cell. `merge_on` is the attribute (left) join used to
//! bring the distance column from the access-matrix layer into the
//! suitability pipeline.

use geo::{BoundingRect, Contains};
use geo_types::{Geometry, Point, Rect};
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;
use velogrid_core::{FeatureCollection, Result};

/// Point with its numeric payload, pre-extracted for the scan.
struct ValuedPoint {
    point: Point<f64>,
    value: f64,
}

/// Sum a point attribute into the polygons containing the points.
///
/// For each polygon feature, sums `value_field` over all points of `points`
/// that fall inside it, and writes the sum to `output_field`. Polygons
/// containing no points get sum 0 and are retained. Points missing the value
/// field count as 0. A bounding-box test prefilters the point-in-polygon
/// checks; the scan itself is brute force.
///
/// # Arguments
/// * `points` - Point layer (e.g. population)
/// * `polygons` - Polygon layer (e.g. grid cells)
/// * `value_field` - Numeric attribute on the points to aggregate
/// * `output_field` - Attribute written on the output polygons
pub fn sum_within(
    points: &FeatureCollection,
    polygons: &FeatureCollection,
    value_field: &str,
    output_field: &str,
) -> Result<FeatureCollection> {
    points.crs.ensure_matching(&polygons.crs)?;

    let start = Instant::now();
    let valued: Vec<ValuedPoint> = points
        .iter()
        .filter_map(|f| match &f.geometry {
            Some(Geometry::Point(p)) => Some(ValuedPoint {
                point: *p,
                value: f.get_f64(value_field).unwrap_or(0.0),
            }),
            _ => None,
        })
        .collect();

    let mut output = polygons.clone();
    for feature in output.iter_mut() {
        let sum = match &feature.geometry {
            Some(geom @ (Geometry::Polygon(_) | Geometry::MultiPolygon(_))) => {
                let bbox = geom.bounding_rect();
                valued
                    .iter()
                    .filter(|vp| bbox_contains(&bbox, &vp.point) && geom.contains(&vp.point))
                    .map(|vp| vp.value)
                    .sum()
            }
            _ => 0.0,
        };
        feature.set_f64(output_field, sum);
    }

    info!(
        "Spatial join: {} points into {} cells in {:.2?}",
        valued.len(),
        polygons.len(),
        start.elapsed()
    );
    Ok(output)
}

fn bbox_contains(bbox: &Option<Rect<f64>>, p: &Point<f64>) -> bool {
    match bbox {
        Some(r) => {
            p.x() >= r.min().x && p.x() <= r.max().x && p.y() >= r.min().y && p.y() <= r.max().y
        }
        None => false,
    }
}

/// Attribute left join on an integer key.
///
/// Copies `fields` from the first matching feature of `right` onto each
/// feature of `left` where `key_field` values are equal. Left features
/// without a match keep their geometry and gain no new attributes, mirroring
/// `merge(..., how="left")`.
pub fn merge_on(
    left: &FeatureCollection,
    right: &FeatureCollection,
    key_field: &str,
    fields: &[&str],
) -> FeatureCollection {
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(right.len());
    for (i, feature) in right.iter().enumerate() {
        if let Some(key) = feature.get_i64(key_field) {
            index.entry(key).or_insert(i);
        }
    }

    let mut output = left.clone();
    for feature in output.iter_mut() {
        let Some(key) = feature.get_i64(key_field) else {
            continue;
        };
        if let Some(&i) = index.get(&key) {
            for &field in fields {
                if let Some(value) = right.features[i].get_property(field) {
                    feature.set_property(field, value.clone());
                }
            }
        }
    }
    output
}
