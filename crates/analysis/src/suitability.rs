//! Station suitability index
//!
//! Where should a new bike station go? Cells with many residents far from
//! any existing station score high: `index = population_sum / distance`,
//! with a floor rule so near-zero distances cannot blow the ratio up. The
//! index is then z-score normalized (autoscaled) so that zero is the mean,
//! and only above-mean cells are kept.

use velogrid_core::{Error, FeatureCollection, Result};

/// Parameters for the suitability pipeline
#[derive(Debug, Clone)]
pub struct SuitabilityParams {
    /// Cells with population sum at or below this are discarded.
    pub min_population: f64,
    /// Cells closer than this to an existing station are discarded
    /// (they are already served).
    pub min_distance: f64,
}

impl Default for SuitabilityParams {
    fn default() -> Self {
        Self {
            min_population: 20.0,
            min_distance: 200.0,
        }
    }
}

/// Raw suitability index for one cell.
///
/// Returns 0 when `distance < 1` (the cell effectively contains a station),
/// otherwise `population_sum / distance`.
pub fn suitability_index(population_sum: f64, distance: f64) -> f64 {
    if distance < 1.0 {
        return 0.0;
    }
    population_sum / distance
}

/// Z-score normalize a column (autoscaling).
///
/// Subtracts the mean and divides by the *sample* standard deviation
/// (ddof = 1, matching pandas). Requires at least two values and nonzero
/// deviation.
pub fn zscore(values: &[f64]) -> Result<Vec<f64>> {
    if values.len() < 2 {
        return Err(Error::Algorithm(
            "z-score needs at least two values".to_string(),
        ));
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    let std = var.sqrt();

    if std <= f64::EPSILON {
        return Err(Error::Algorithm(
            "z-score undefined for a constant column".to_string(),
        ));
    }

    Ok(values.iter().map(|v| (v - mean) / std).collect())
}

/// Keep only features whose numeric `field` is strictly greater than
/// `threshold`. Features with a missing or non-numeric field are removed.
///
/// A pure row filter: never adds features or alters geometry.
pub fn filter_gt(layer: &FeatureCollection, field: &str, threshold: f64) -> FeatureCollection {
    let mut output = layer.clone();
    output.retain(|f| f.get_f64(field).is_some_and(|v| v > threshold));
    output
}
