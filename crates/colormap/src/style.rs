//! Choropleth styling of feature collections.
//!
//! Writes simplestyle properties (`fill`, `fill-opacity`) derived from a
//! numeric column, so the exported GeoJSON renders as a choropleth without
//! any dedicated map-rendering code.

use crate::scheme::{evaluate, ColorScheme};
use velogrid_core::{AttributeValue, FeatureCollection};

/// Fill opacity written by the styling functions, matching the translucent
/// fills of the original maps.
pub const DEFAULT_FILL_OPACITY: f64 = 0.6;

/// Marker color for station point layers overlaid on the choropleths.
pub const DEFAULT_MARKER_COLOR: &str = "#d7191c";

fn set_fill(feature: &mut velogrid_core::Feature, hex: String) {
    feature.set_property("fill", AttributeValue::String(hex));
    feature.set_f64("fill-opacity", DEFAULT_FILL_OPACITY);
}

/// Style a layer by an integer class column.
///
/// Class `i` of `n_classes` samples the scheme at `i / (n_classes - 1)`,
/// giving evenly spaced discrete colors. Features without the class field
/// are left unstyled.
pub fn style_by_class(
    layer: &FeatureCollection,
    field: &str,
    scheme: ColorScheme,
    n_classes: usize,
) -> FeatureCollection {
    let denom = (n_classes.saturating_sub(1)).max(1) as f64;

    let mut output = layer.clone();
    for feature in output.iter_mut() {
        if let Some(class) = feature.get_i64(field) {
            let t = (class.max(0) as f64 / denom).clamp(0.0, 1.0);
            set_fill(feature, evaluate(scheme, t).to_hex());
        }
    }
    output
}

/// Style a layer by a continuous column, min/max normalized.
///
/// A constant or empty column falls back to the scheme midpoint so the
/// output is still visibly styled.
pub fn style_by_value(
    layer: &FeatureCollection,
    field: &str,
    scheme: ColorScheme,
) -> FeatureCollection {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in layer.numeric_column(field).into_iter().flatten() {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }

    let range = max - min;
    let degenerate = !range.is_finite() || range.abs() < f64::EPSILON;

    let mut output = layer.clone();
    for feature in output.iter_mut() {
        let Some(v) = feature.get_f64(field).filter(|v| v.is_finite()) else {
            continue;
        };
        let t = if degenerate { 0.5 } else { (v - min) / range };
        set_fill(feature, evaluate(scheme, t).to_hex());
    }
    output
}

/// Write a simplestyle `marker-color` on every feature of a point layer.
///
/// Used to overlay station markers on a styled grid before export.
pub fn style_markers(layer: &FeatureCollection, color: &str) -> FeatureCollection {
    let mut output = layer.clone();
    for feature in output.iter_mut() {
        feature.set_property("marker-color", AttributeValue::String(color.to_string()));
    }
    output
}
