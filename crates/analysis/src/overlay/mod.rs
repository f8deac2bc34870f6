//! Overlay operations
//!
//! Clipping a layer to a rectangular study area (the direct Sutherland-Hodgman
//! path) and general polygon overlay against an arbitrary mask layer
//! (difference / intersection, delegated to `geo`).
//!
//! Every entry point checks CRS equivalence between the two layers before
//! touching geometry and logs elapsed time at info level.

mod boolean;
mod study_area;

pub use boolean::{overlay_collections, OverlayOp};
pub use study_area::{clip_to_study_area, StudyArea};
