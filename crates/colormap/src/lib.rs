//! # Velogrid Colormap
//!
//! Color mapping and choropleth styling for velogrid layers.
//!
//! Provides the choropleth color schemes used by the analysis maps plus a
//! generic multi-stop interpolation engine. The main entry points are
//! [`style_by_class`] and [`style_by_value`], which write simplestyle
//! `fill` properties onto features so the exported GeoJSON renders as a
//! choropleth in any viewer.
//!
//! ## Usage
//!
//! ```ignore
//! use velogrid_colormap::{ColorScheme, style_by_class};
//!
//! let styled = style_by_class(&layer, "class", ColorScheme::RdYlBu, 3);
//! ```

mod scheme;
mod style;

pub use scheme::{evaluate, ColorScheme, ColorStop, Rgb};
pub use style::{
    style_by_class, style_by_value, style_markers, DEFAULT_FILL_OPACITY, DEFAULT_MARKER_COLOR,
};
