//! User-defined bin classification
//!
//! Maps a continuous column into integer class codes for choropleth
//! display, with the same semantics as mapclassify's `UserDefined` scheme:
//! bins are ascending upper edges, a value lands in the first bin whose edge
//! it does not exceed, and anything above the last edge goes to the final
//! class.

use velogrid_core::{AttributeValue, Error, FeatureCollection, Result};

/// A classifier over ascending upper bin edges.
///
/// With bins `[250, 800]` there are three classes:
/// class 0 for `v <= 250`, class 1 for `250 < v <= 800`, class 2 above.
#[derive(Debug, Clone)]
pub struct Classifier {
    bins: Vec<f64>,
}

impl Classifier {
    /// Build a classifier from ascending upper bin edges.
    pub fn user_defined(bins: Vec<f64>) -> Result<Self> {
        if bins.is_empty() {
            return Err(Error::InvalidParameter {
                name: "bins",
                value: "[]".to_string(),
                reason: "at least one bin edge required".to_string(),
            });
        }
        if bins.windows(2).any(|w| w[0] >= w[1]) || bins.iter().any(|b| b.is_nan()) {
            return Err(Error::InvalidParameter {
                name: "bins",
                value: format!("{:?}", bins),
                reason: "bin edges must be strictly ascending".to_string(),
            });
        }
        Ok(Self { bins })
    }

    /// Number of classes produced (edges + 1).
    pub fn n_classes(&self) -> usize {
        self.bins.len() + 1
    }

    /// Class code for a value, or None for NaN.
    pub fn classify(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        Some(
            self.bins
                .iter()
                .position(|&edge| value <= edge)
                .unwrap_or(self.bins.len()),
        )
    }

    /// Human-readable range labels, one per class.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.n_classes());
        labels.push(format!("<= {}", self.bins[0]));
        for w in self.bins.windows(2) {
            labels.push(format!("{} - {}", w[0], w[1]));
        }
        labels.push(format!("> {}", self.bins[self.bins.len() - 1]));
        labels
    }
}

/// Classify a numeric column into integer class codes.
///
/// Writes the class to `output_field` on a cloned layer. Features whose
/// `field` is missing, non-numeric or NaN get no class attribute.
pub fn classify_column(
    layer: &FeatureCollection,
    field: &str,
    output_field: &str,
    classifier: &Classifier,
) -> FeatureCollection {
    let mut output = layer.clone();
    for feature in output.iter_mut() {
        let class = feature.get_f64(field).and_then(|v| classifier.classify(v));
        if let Some(class) = class {
            feature.set_property(output_field, AttributeValue::Int(class as i64));
        }
    }
    output
}
