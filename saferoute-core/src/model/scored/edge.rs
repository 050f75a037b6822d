use geo::LineString;
use serde::Serialize;

use crate::{Meters, Seconds};

/// Per-edge risk attributes, populated exactly once during scoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeScores {
    /// Point features attributed to this edge
    pub light_count: u32,
    /// Excess sinuosity, unbounded above
    pub curve_score: f64,
    /// In (0, 1], 1 means no lights at all
    pub darkness_score: f64,
    /// In [0, 1], 0 is the safest road class
    pub highway_risk: f64,
    /// In [0, 1]
    pub land_risk: f64,
    /// Normalized road class that produced `highway_risk`
    pub highway_tag: Option<String>,
    pub land_label: String,
    /// Weighted sum of the four components
    pub safety_score: f64,
    /// `travel_time * (1 + safety_score / 100)`, used by the legacy router
    pub optimized_weight: f64,
}

/// Street segment of a scored network
#[derive(Debug, Clone)]
pub struct ScoredEdge {
    pub key: u32,
    /// Path in lon/lat; straight line between endpoints when the provider
    /// had no detailed geometry
    pub geometry: LineString<f64>,
    pub length: Meters,
    pub speed_kph: f64,
    pub travel_time: Seconds,
    pub name: Option<String>,
    pub scores: EdgeScores,
}

impl ScoredEdge {
    pub fn safety_score(&self) -> f64 {
        self.scores.safety_score
    }

    /// Risk scaled by distance traveled (`safety_score * length`)
    pub fn danger_exposure(&self) -> f64 {
        self.scores.safety_score * self.length
    }
}
