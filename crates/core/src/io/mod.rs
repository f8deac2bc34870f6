//! Layer I/O
//!
//! Velogrid reads and writes vector layers as GeoJSON only. GeoJSON is
//! CRS-less by specification (RFC 7946 fixes WGS84), so readers accept an
//! explicit CRS tag for layers that were exported in a projected CRS.

mod geojson_io;

pub use geojson_io::{read_geojson, read_geojson_str, write_geojson, write_geojson_string};
