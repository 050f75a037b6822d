use std::sync::atomic::{AtomicU64, Ordering};

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use rstar::RTree;
use serde::Serialize;

use super::edge::ScoredEdge;
use crate::model::streets::{IndexedPoint, StreetNode};
use crate::routing::NormalizationStats;
use crate::{Meters, NodeId};

pub type ScoredGraph = DiGraph<StreetNode, ScoredEdge>;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Street network with every edge scored
///
/// Never mutated after construction, so it can be shared by any number of
/// concurrent routing queries. Each instance carries a unique version and
/// the normalization maxima computed for exactly this edge set.
#[derive(Debug)]
pub struct ScoredNetwork {
    graph: ScoredGraph,
    node_lookup: HashMap<NodeId, NodeIndex>,
    rtree: RTree<IndexedPoint>,
    version: u64,
    normalization: NormalizationStats,
}

/// Aggregate figures describing a scored network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub nodes: usize,
    pub edges: usize,
    pub lit_edges: usize,
    pub max_lights: u32,
    pub mean_safety: f64,
    pub max_safety: f64,
    pub total_length_m: Meters,
}

impl ScoredNetwork {
    pub(crate) fn new(graph: ScoredGraph, node_lookup: HashMap<NodeId, NodeIndex>) -> Self {
        let points: Vec<IndexedPoint> = graph
            .node_indices()
            .map(|index| {
                let node = &graph[index];
                IndexedPoint::new([node.geometry.x(), node.geometry.y()], index)
            })
            .collect();
        let rtree = RTree::bulk_load(points);

        let version = NEXT_VERSION.fetch_add(1, Ordering::Relaxed);
        let normalization = NormalizationStats::from_edges(graph.edge_weights(), version);

        Self {
            graph,
            node_lookup,
            rtree,
            version,
            normalization,
        }
    }

    pub fn graph(&self) -> &ScoredGraph {
        &self.graph
    }

    /// Unique identifier of this scored network instance
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Normalization maxima computed when this network was built
    pub fn normalization(&self) -> &NormalizationStats {
        &self.normalization
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_lookup.get(&id).copied()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&StreetNode> {
        self.graph.node_weight(index)
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&ScoredEdge> {
        self.graph.edge_weight(index)
    }

    /// Nearest intersection to `point` (lon/lat) and its great-circle
    /// distance in meters
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<(NodeIndex, Meters)> {
        let nearest = self.rtree.nearest_neighbor(&[point.x(), point.y()])?;
        let node = self.graph.node_weight(nearest.data)?;
        Some((nearest.data, Haversine.distance(*point, node.geometry)))
    }

    pub fn summary(&self) -> NetworkSummary {
        let mut lit_edges = 0;
        let mut max_lights = 0;
        let mut max_safety: f64 = 0.0;
        let mut safety_sum = 0.0;
        let mut total_length_m = 0.0;

        for edge in self.graph.edge_weights() {
            if edge.scores.light_count > 0 {
                lit_edges += 1;
            }
            max_lights = max_lights.max(edge.scores.light_count);
            max_safety = max_safety.max(edge.safety_score());
            safety_sum += edge.safety_score();
            total_length_m += edge.length;
        }

        let edges = self.graph.edge_count();
        #[allow(clippy::cast_precision_loss)]
        let mean_safety = if edges > 0 {
            safety_sum / edges as f64
        } else {
            0.0
        };

        NetworkSummary {
            nodes: self.graph.node_count(),
            edges,
            lit_edges,
            max_lights,
            mean_safety,
            max_safety,
            total_length_m,
        }
    }
}
