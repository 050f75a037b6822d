//! Graph-wide maxima that put time and danger on comparable scales

use serde::Serialize;

use crate::model::{ScoredEdge, ScoredNetwork};

/// Maxima of travel time, length and safety score over a scored network
///
/// Computed from the edges of exactly one network version and never written
/// back onto edges. A maximum that is missing or not positive is 1.0, so
/// normalization never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizationStats {
    pub max_time: f64,
    pub max_length: f64,
    pub max_safety: f64,
    /// Version of the network these maxima were computed from
    pub graph_version: u64,
}

impl NormalizationStats {
    /// Recomputes the maxima from the current edges of `network`
    pub fn compute(network: &ScoredNetwork) -> Self {
        Self::from_edges(network.graph().edge_weights(), network.version())
    }

    pub(crate) fn from_edges<'a>(
        edges: impl IntoIterator<Item = &'a ScoredEdge>,
        graph_version: u64,
    ) -> Self {
        let (max_time, max_length, max_safety) = edges.into_iter().fold(
            (0.0_f64, 0.0_f64, 0.0_f64),
            |(time, length, safety), edge| {
                (
                    time.max(edge.travel_time),
                    length.max(edge.length),
                    safety.max(edge.safety_score()),
                )
            },
        );

        Self {
            max_time: positive_or_one(max_time),
            max_length: positive_or_one(max_length),
            max_safety: positive_or_one(max_safety),
            graph_version,
        }
    }

    /// Travel time scaled to [0, 1]
    pub fn time_term(&self, edge: &ScoredEdge) -> f64 {
        (edge.travel_time / self.max_time).max(0.0)
    }

    /// Danger exposure (`safety_score * length`) scaled to [0, 1]
    pub fn safety_term(&self, edge: &ScoredEdge) -> f64 {
        (edge.danger_exposure() / (self.max_safety * self.max_length)).max(0.0)
    }
}

fn positive_or_one(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}
