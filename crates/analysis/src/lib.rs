//! # Velogrid Analysis
//!
//! Geospatial analysis operations for the velogrid pipelines.
//!
//! ## Available operation categories
//!
//! - **overlay**: study-area clipping and polygon overlay (difference/intersection)
//! - **distance**: brute-force nearest-station distance per grid cell
//! - **join**: spatial point-in-polygon aggregation and attribute joins
//! - **classify**: user-defined bin classification (choropleth classes)
//! - **suitability**: population/distance index, z-score normalization, filters
//! - **pipeline**: the two composed end-to-end analyses

pub mod classify;
pub mod distance;
pub mod join;
mod maybe_rayon;
pub mod overlay;
pub mod pipeline;
pub mod suitability;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classify::{classify_column, Classifier};
    pub use crate::distance::{attach_distances, nearest_distance};
    pub use crate::join::{merge_on, sum_within};
    pub use crate::overlay::{overlay_collections, clip_to_study_area, OverlayOp, StudyArea};
    pub use crate::pipeline::{access_matrix, station_suitability, AccessParams};
    pub use crate::suitability::{
        filter_gt, suitability_index, zscore, SuitabilityParams,
    };
    pub use velogrid_core::prelude::*;
}
