//! GeoJSON reading and writing for `FeatureCollection`

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geojson::GeoJson;
use std::fs;
use std::path::Path;

fn value_to_attribute(value: &serde_json::Value) -> Option<AttributeValue> {
    match value {
        serde_json::Value::Null => Some(AttributeValue::Null),
        serde_json::Value::Bool(b) => Some(AttributeValue::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(AttributeValue::Int(i))
            } else {
                n.as_f64().map(AttributeValue::Float)
            }
        }
        serde_json::Value::String(s) => Some(AttributeValue::String(s.clone())),
        // Nested arrays/objects have no column semantics; dropped on read
        _ => None,
    }
}

fn attribute_to_value(value: &AttributeValue) -> serde_json::Value {
    match value {
        AttributeValue::Null => serde_json::Value::Null,
        AttributeValue::Bool(b) => serde_json::Value::Bool(*b),
        AttributeValue::Int(i) => serde_json::Value::from(*i),
        AttributeValue::Float(f) => {
            // JSON has no NaN/Inf; map them to null
            serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null)
        }
        AttributeValue::String(s) => serde_json::Value::String(s.clone()),
    }
}

fn convert_feature(gj: geojson::Feature) -> Result<Feature> {
    let geometry = match gj.geometry {
        Some(g) => Some(geo_types::Geometry::<f64>::try_from(g.value)?),
        None => None,
    };

    let mut feature = match geometry {
        Some(g) => Feature::new(g),
        None => Feature::empty(),
    };

    if let Some(props) = gj.properties {
        for (key, value) in props {
            if let Some(attr) = value_to_attribute(&value) {
                feature.set_property(key, attr);
            }
        }
    }

    feature.id = match gj.id {
        Some(geojson::feature::Id::String(s)) => Some(s),
        Some(geojson::feature::Id::Number(n)) => Some(n.to_string()),
        None => None,
    };

    Ok(feature)
}

/// Parse a GeoJSON string into a `FeatureCollection`.
///
/// `crs` tags the resulting layer; `None` assumes WGS84 per RFC 7946.
/// A bare Feature or Geometry document becomes a single-feature collection.
pub fn read_geojson_str(text: &str, crs: Option<Crs>) -> Result<FeatureCollection> {
    let crs = crs.unwrap_or_default();
    let geojson: GeoJson = text.parse()?;

    let mut collection = FeatureCollection::new(crs);
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in fc.features {
                collection.push(convert_feature(feature)?);
            }
        }
        GeoJson::Feature(f) => collection.push(convert_feature(f)?),
        GeoJson::Geometry(g) => {
            let geom = geo_types::Geometry::<f64>::try_from(g.value)?;
            collection.push(Feature::new(geom));
        }
    }

    Ok(collection)
}

/// Read a GeoJSON file into a `FeatureCollection`.
pub fn read_geojson(path: &Path, crs: Option<Crs>) -> Result<FeatureCollection> {
    let text = fs::read_to_string(path)?;
    read_geojson_str(&text, crs)
}

/// Serialize a layer to a GeoJSON string.
pub fn write_geojson_string(layer: &FeatureCollection) -> Result<String> {
    let features: Vec<geojson::Feature> = layer
        .iter()
        .map(|f| {
            let geometry = f
                .geometry
                .as_ref()
                .map(|g| geojson::Geometry::new(geojson::Value::from(g)));

            let mut props = serde_json::Map::new();
            for (key, value) in &f.properties {
                props.insert(key.clone(), attribute_to_value(value));
            }

            geojson::Feature {
                bbox: None,
                geometry,
                id: f.id.clone().map(geojson::feature::Id::String),
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();

    let fc = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    Ok(GeoJson::from(fc).to_string())
}

/// Write a layer to a GeoJSON file.
pub fn write_geojson(layer: &FeatureCollection, path: &Path) -> Result<()> {
    let text = write_geojson_string(layer)?;
    fs::write(path, text).map_err(Error::Io)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATIONS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [24.93, 60.17] },
                "properties": { "name": "Kamppi", "capacity": 30 }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [24.95, 60.18] },
                "properties": { "name": "Kaisaniemi", "capacity": 24.5 }
            }
        ]
    }"#;

    #[test]
    fn test_read_feature_collection() {
        let fc = read_geojson_str(STATIONS, None).unwrap();
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.crs, Crs::wgs84());

        let first = &fc.features[0];
        assert_eq!(first.get_property("name").and_then(|v| v.as_str()), Some("Kamppi"));
        assert_eq!(first.get_i64("capacity"), Some(30));
        assert!(matches!(
            first.geometry,
            Some(geo_types::Geometry::Point(_))
        ));
    }

    #[test]
    fn test_read_with_explicit_crs() {
        let fc = read_geojson_str(STATIONS, Some(Crs::from_epsg(3067))).unwrap();
        assert_eq!(fc.crs.epsg(), Some(3067));
    }

    #[test]
    fn test_roundtrip() {
        let fc = read_geojson_str(STATIONS, None).unwrap();
        let text = write_geojson_string(&fc).unwrap();
        let back = read_geojson_str(&text, None).unwrap();

        assert_eq!(back.len(), fc.len());
        assert_eq!(
            back.features[1].get_f64("capacity"),
            fc.features[1].get_f64("capacity")
        );
    }

    #[test]
    fn test_nan_attribute_becomes_null() {
        let mut fc = read_geojson_str(STATIONS, None).unwrap();
        fc.features[0].set_f64("distance", f64::NAN);

        let text = write_geojson_string(&fc).unwrap();
        let back = read_geojson_str(&text, None).unwrap();
        assert_eq!(
            back.features[0].get_property("distance"),
            Some(&AttributeValue::Null)
        );
    }

    #[test]
    fn test_read_malformed() {
        assert!(read_geojson_str("{ not geojson", None).is_err());
    }
}
