//! Polygon overlay against an arbitrary mask layer
//!
//! Handles the preprocessing step of the original analysis: erasing the sea
//! polygon from the grid (difference), or keeping only the part of a layer
//! inside a mask (intersection). The polygon set operations themselves are
//! delegated to `geo::BooleanOps`.

use geo::BooleanOps;
use geo_types::{Geometry, MultiPolygon, Polygon};
use std::time::Instant;
use tracing::{info, warn};
use velogrid_core::{Error, FeatureCollection, Result};

/// Which boolean overlay to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOp {
    /// Keep the parts of the input outside the mask
    Difference,
    /// Keep the parts of the input inside the mask
    Intersection,
}

impl OverlayOp {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "difference" | "diff" | "erase" => Ok(OverlayOp::Difference),
            "intersection" | "intersect" | "clip" => Ok(OverlayOp::Intersection),
            _ => Err(Error::InvalidParameter {
                name: "how",
                value: s.to_string(),
                reason: "expected difference or intersection".to_string(),
            }),
        }
    }
}

/// Collect all polygonal geometry of a layer into one MultiPolygon.
fn as_multipolygon(layer: &FeatureCollection) -> MultiPolygon<f64> {
    let mut polys: Vec<Polygon<f64>> = Vec::new();
    for feature in layer.iter() {
        match &feature.geometry {
            Some(Geometry::Polygon(p)) => polys.push(p.clone()),
            Some(Geometry::MultiPolygon(mp)) => polys.extend(mp.0.iter().cloned()),
            _ => {}
        }
    }
    MultiPolygon(polys)
}

/// Overlay a polygon layer against a mask layer.
///
/// Each input feature is intersected with (or differenced against) the union
/// of the mask layer's polygons; attributes are carried through. Features
/// whose geometry vanishes are dropped. Non-polygonal input features are
/// dropped with a warning, matching the polygon-only semantics of the
/// original `overlay` step.
///
/// # Arguments
/// * `layer` - Input polygon layer
/// * `mask` - Mask layer; only its polygonal geometry is used
/// * `op` - Difference or intersection
pub fn overlay_collections(
    layer: &FeatureCollection,
    mask: &FeatureCollection,
    op: OverlayOp,
) -> Result<FeatureCollection> {
    layer.crs.ensure_matching(&mask.crs)?;

    let mask_mp = as_multipolygon(mask);
    if mask_mp.0.is_empty() {
        return Err(Error::EmptyLayer("mask has no polygonal geometry"));
    }

    let start = Instant::now();
    let mut output = layer.like();
    let mut skipped = 0usize;

    for feature in layer.iter() {
        let subject = match &feature.geometry {
            Some(Geometry::Polygon(p)) => MultiPolygon(vec![p.clone()]),
            Some(Geometry::MultiPolygon(mp)) => mp.clone(),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let result = match op {
            OverlayOp::Difference => subject.difference(&mask_mp),
            OverlayOp::Intersection => subject.intersection(&mask_mp),
        };

        if result.0.is_empty() {
            continue;
        }

        let mut f = feature.clone();
        f.geometry = Some(if result.0.len() == 1 {
            Geometry::Polygon(result.0.into_iter().next().expect("len checked"))
        } else {
            Geometry::MultiPolygon(result)
        });
        output.push(f);
    }

    if skipped > 0 {
        warn!("{} non-polygon features dropped by overlay", skipped);
    }
    info!(
        "Overlay ({:?}): {} -> {} features in {:.2?}",
        op,
        layer.len(),
        output.len(),
        start.elapsed()
    );
    Ok(output)
}
