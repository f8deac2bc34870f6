//! Vector layers: features with geometry and typed attributes

use crate::crs::Crs;
use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Numeric view of the value; `Int` coerces to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer view of the value; `Float` coerces when it is a whole number.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            AttributeValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
    /// Optional feature ID
    pub id: Option<String>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Create a feature with no geometry
    pub fn empty() -> Self {
        Self {
            geometry: None,
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Set a numeric attribute
    pub fn set_f64(&mut self, key: impl Into<String>, value: f64) {
        self.properties.insert(key.into(), AttributeValue::Float(value));
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    /// Get an attribute as f64, if present and numeric
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(AttributeValue::as_f64)
    }

    /// Get an attribute as i64, if present and integral
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.properties.get(key).and_then(AttributeValue::as_i64)
    }

    /// Builder-style property assignment, convenient in tests and fixtures
    pub fn with_property(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.set_property(key, value);
        self
    }
}

/// An ordered collection of features tagged with a CRS
#[derive(Debug, Clone)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    pub crs: Crs,
}

impl FeatureCollection {
    pub fn new(crs: Crs) -> Self {
        Self {
            features: Vec::new(),
            crs,
        }
    }

    /// Build a collection from features, tagging them with `crs`.
    pub fn from_features(features: Vec<Feature>, crs: Crs) -> Self {
        Self { features, crs }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Feature> {
        self.features.iter_mut()
    }

    /// Extract a numeric column. Features missing the field or holding a
    /// non-numeric value yield `None` at their position.
    pub fn numeric_column(&self, field: &str) -> Vec<Option<f64>> {
        self.features.iter().map(|f| f.get_f64(field)).collect()
    }

    /// Keep only features for which `pred` returns true.
    ///
    /// This is the single row-removal primitive in velogrid: filters never
    /// add features or touch geometry, so any chain of them is monotonic.
    pub fn retain(&mut self, pred: impl FnMut(&Feature) -> bool) {
        self.features.retain(pred);
    }

    /// Same-CRS collection with the same capacity, for map-style transforms.
    pub fn like(&self) -> Self {
        Self {
            features: Vec::with_capacity(self.features.len()),
            crs: self.crs.clone(),
        }
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, Geometry};

    fn sample_feature(id: i64, pop: f64) -> Feature {
        Feature::new(Geometry::Point(point! { x: 24.9, y: 60.2 }))
            .with_property("YKR_ID", AttributeValue::Int(id))
            .with_property("ASYHT", AttributeValue::Float(pop))
    }

    #[test]
    fn test_attribute_coercion() {
        assert_eq!(AttributeValue::Int(42).as_f64(), Some(42.0));
        assert_eq!(AttributeValue::Float(42.0).as_i64(), Some(42));
        assert_eq!(AttributeValue::Float(42.5).as_i64(), None);
        assert_eq!(AttributeValue::String("x".into()).as_f64(), None);
        assert_eq!(AttributeValue::Null.as_f64(), None);
    }

    #[test]
    fn test_feature_properties() {
        let mut f = sample_feature(5963655, 120.0);
        assert_eq!(f.get_i64("YKR_ID"), Some(5963655));
        assert_eq!(f.get_f64("ASYHT"), Some(120.0));
        assert_eq!(f.get_f64("missing"), None);

        f.set_f64("distance", 312.5);
        assert_eq!(f.get_f64("distance"), Some(312.5));
    }

    #[test]
    fn test_numeric_column() {
        let mut fc = FeatureCollection::new(Crs::wgs84());
        fc.push(sample_feature(1, 10.0));
        fc.push(sample_feature(2, 20.0));
        fc.push(Feature::empty()); // no attributes at all

        let col = fc.numeric_column("ASYHT");
        assert_eq!(col, vec![Some(10.0), Some(20.0), None]);
    }

    #[test]
    fn test_retain_only_removes() {
        let mut fc = FeatureCollection::new(Crs::wgs84());
        for i in 0..10 {
            fc.push(sample_feature(i, i as f64));
        }

        let before = fc.len();
        fc.retain(|f| f.get_f64("ASYHT").is_some_and(|v| v > 4.0));
        assert!(fc.len() <= before);
        assert_eq!(fc.len(), 5);
    }
}
