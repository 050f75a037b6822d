//! Street network components - nodes, edges, and point features

use geo::{LineString, Point, line_string};

use crate::{Meters, NodeId};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// External id of the intersection
    pub id: NodeId,
    /// Node coordinates (x = lon, y = lat)
    pub geometry: Point<f64>,
}

/// Street segment as delivered by network retrieval, before scoring
#[derive(Debug, Clone, Default)]
pub struct SegmentInput {
    /// Actual path of the segment in lon/lat. `None` means a straight line
    /// between the endpoint nodes.
    pub geometry: Option<LineString<f64>>,
    /// Length in meters, if the provider supplied one
    pub length: Option<Meters>,
    /// Road classification tags (usually a single OSM `highway` value)
    pub highway: Vec<String>,
    /// Assigned travel speed
    pub speed_kph: Option<f64>,
    /// Raw `maxspeed` tag, e.g. "50" or "35 mph"
    pub maxspeed: Option<String>,
    pub name: Option<String>,
}

impl SegmentInput {
    pub fn with_highway(mut self, tag: impl Into<String>) -> Self {
        self.highway.push(tag.into());
        self
    }

    pub fn with_length(mut self, length: Meters) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_speed(mut self, speed_kph: f64) -> Self {
        self.speed_kph = Some(speed_kph);
        self
    }

    pub fn with_geometry(mut self, geometry: LineString<f64>) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

/// Street graph edge (street segment)
#[derive(Debug, Clone)]
pub struct StreetEdge {
    /// Disambiguates parallel edges between the same pair of nodes
    pub key: u32,
    pub segment: SegmentInput,
}

impl StreetEdge {
    /// Segment geometry, falling back to the straight line between endpoints
    pub fn resolved_geometry(&self, from: &StreetNode, to: &StreetNode) -> LineString<f64> {
        match &self.segment.geometry {
            Some(geometry) if geometry.0.len() >= 2 => geometry.clone(),
            _ => line_string![from.geometry.0, to.geometry.0],
        }
    }
}

/// Point-located hazard or safety feature (e.g. a street light)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointFeature {
    pub lat: f64,
    pub lon: f64,
}

impl PointFeature {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the coordinates are finite and within WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}
