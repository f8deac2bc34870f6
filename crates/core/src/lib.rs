//! # Velogrid Core
//!
//! Core types and I/O for the velogrid bike-share accessibility toolkit.
//!
//! This crate provides:
//! - `Feature` / `FeatureCollection`: vector layers with typed attributes
//! - `Crs`: Coordinate Reference System tagging and equivalence checks
//! - GeoJSON reading and writing
//! - Attribute name constants shared by the analysis pipelines

pub mod crs;
pub mod error;
pub mod io;
pub mod vector;

pub use crs::Crs;
pub use error::{Error, Result};
pub use vector::{AttributeValue, Feature, FeatureCollection};

/// Attribute names used across the analysis pipelines.
pub mod fields {
    /// Grid cell identifier.
    pub const CELL_ID: &str = "YKR_ID";
    /// Population count attribute on population point layers.
    pub const POPULATION: &str = "ASYHT";
    /// Distance from cell centroid to the nearest station, in CRS units.
    pub const DISTANCE: &str = "distance";
    /// Population sum aggregated into a grid cell.
    pub const POPULATION_SUM: &str = "sum";
    /// Integer class code produced by a classifier.
    pub const CLASS: &str = "class";
    /// Suitability index for placing a new station.
    pub const STATION_INDEX: &str = "station_index";
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::fields;
    pub use crate::vector::{AttributeValue, Feature, FeatureCollection};
}
