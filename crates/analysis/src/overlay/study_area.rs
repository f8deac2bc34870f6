//! Rectangular study-area mask and clipping
//!
//! The study area is an axis-aligned rectangle, like the exclusion box the
//! original Helsinki analysis used to cut Vantaa out of the city-bike grid.
//! Polygon clipping is Sutherland-Hodgman against the four rectangle edges.

use geo_types::{Coord, Geometry, LineString, MultiPolygon, Polygon};
use std::time::Instant;
use tracing::{debug, info};
use velogrid_core::{Crs, FeatureCollection, Result};

/// An axis-aligned rectangular study area with a CRS
#[derive(Debug, Clone)]
pub struct StudyArea {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub crs: Crs,
}

impl StudyArea {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64, crs: Crs) -> Self {
        Self { min_x, min_y, max_x, max_y, crs }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (self.min_x, self.min_y),
                (self.max_x, self.min_y),
                (self.max_x, self.max_y),
                (self.min_x, self.max_y),
                (self.min_x, self.min_y),
            ]),
            vec![],
        )
    }
}

/// Edge of the clipping rectangle
#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    fn is_inside(&self, p: &Coord<f64>, area: &StudyArea) -> bool {
        match self {
            Edge::Left => p.x >= area.min_x,
            Edge::Right => p.x <= area.max_x,
            Edge::Bottom => p.y >= area.min_y,
            Edge::Top => p.y <= area.max_y,
        }
    }

    fn intersect(&self, p: &Coord<f64>, q: &Coord<f64>, area: &StudyArea) -> Coord<f64> {
        let (px, py) = (p.x, p.y);
        let dx = q.x - px;
        let dy = q.y - py;

        match self {
            Edge::Left => {
                let t = (area.min_x - px) / dx;
                Coord { x: area.min_x, y: py + t * dy }
            }
            Edge::Right => {
                let t = (area.max_x - px) / dx;
                Coord { x: area.max_x, y: py + t * dy }
            }
            Edge::Bottom => {
                let t = (area.min_y - py) / dy;
                Coord { x: px + t * dx, y: area.min_y }
            }
            Edge::Top => {
                let t = (area.max_y - py) / dy;
                Coord { x: px + t * dx, y: area.max_y }
            }
        }
    }
}

/// Clip a polygon ring against one edge (Sutherland-Hodgman step)
fn clip_ring_edge(vertices: &[Coord<f64>], edge: Edge, area: &StudyArea) -> Vec<Coord<f64>> {
    if vertices.is_empty() {
        return Vec::new();
    }

    let mut output = Vec::new();
    let n = vertices.len();

    for i in 0..n {
        let current = &vertices[i];
        let next = &vertices[(i + 1) % n];

        let current_inside = edge.is_inside(current, area);
        let next_inside = edge.is_inside(next, area);

        match (current_inside, next_inside) {
            (true, true) => {
                output.push(*next);
            }
            (true, false) => {
                output.push(edge.intersect(current, next, area));
            }
            (false, true) => {
                output.push(edge.intersect(current, next, area));
                output.push(*next);
            }
            (false, false) => {}
        }
    }

    output
}

fn clip_polygon(poly: &Polygon<f64>, area: &StudyArea) -> Option<Polygon<f64>> {
    let mut vertices: Vec<Coord<f64>> = poly.exterior().0.to_vec();

    // Remove closing vertex for the algorithm
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    for edge in [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top] {
        vertices = clip_ring_edge(&vertices, edge, area);
        if vertices.is_empty() {
            return None;
        }
    }

    if vertices.len() < 3 {
        return None;
    }

    // Close the ring
    vertices.push(vertices[0]);

    // Interior rings are not clipped: grid cells have none
    Some(Polygon::new(LineString::new(vertices), vec![]))
}

/// Clip one geometry to the study area. Returns None when nothing remains.
fn clip_geometry(geom: &Geometry<f64>, area: &StudyArea) -> Option<Geometry<f64>> {
    match geom {
        Geometry::Point(p) => {
            if area.contains(p.x(), p.y()) {
                Some(geom.clone())
            } else {
                None
            }
        }
        Geometry::Polygon(poly) => clip_polygon(poly, area).map(Geometry::Polygon),
        Geometry::MultiPolygon(mp) => {
            let parts: Vec<Polygon<f64>> =
                mp.0.iter().filter_map(|p| clip_polygon(p, area)).collect();
            if parts.is_empty() {
                None
            } else {
                Some(Geometry::MultiPolygon(MultiPolygon(parts)))
            }
        }
        // Line layers do not occur in the pipelines
        other => Some(other.clone()),
    }
}

/// Clip a layer to a rectangular study area (intersection).
///
/// Features falling entirely outside the rectangle are dropped; attributes
/// of surviving features are carried through unchanged.
///
/// # Arguments
/// * `layer` - Input layer (grid cells or stations)
/// * `area` - Study-area rectangle; its CRS must match the layer's
pub fn clip_to_study_area(
    layer: &FeatureCollection,
    area: &StudyArea,
) -> Result<FeatureCollection> {
    layer.crs.ensure_matching(&area.crs)?;

    let start = Instant::now();
    let mut output = layer.like();

    for feature in layer.iter() {
        let clipped = feature.geometry.as_ref().and_then(|g| clip_geometry(g, area));
        if let Some(geom) = clipped {
            let mut f = feature.clone();
            f.geometry = Some(geom);
            output.push(f);
        } else {
            debug!("feature outside study area, dropped");
        }
    }

    info!(
        "Study-area clip: {} -> {} features in {:.2?}",
        layer.len(),
        output.len(),
        start.elapsed()
    );
    Ok(output)
}
