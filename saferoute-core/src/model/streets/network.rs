//! Directed multigraph of intersections and street segments

use geo::Point;
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use rstar::primitives::GeomWithData;

use super::components::{SegmentInput, StreetEdge, StreetNode};
use crate::{Error, NodeId};

pub type StreetGraph = DiGraph<StreetNode, StreetEdge>;

/// Node coordinate stored in the snapping R-tree
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Street network as produced by network retrieval
///
/// Parallel edges between the same node pair are allowed and are told
/// apart by a key, either supplied or assigned in insertion order. Topology
/// is frozen once the network is handed to scoring.
#[derive(Debug, Clone, Default)]
pub struct StreetNetwork {
    pub(crate) graph: StreetGraph,
    pub(crate) node_lookup: HashMap<NodeId, NodeIndex>,
}

impl StreetNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an intersection. Adding an already known id returns the
    /// existing node and keeps its original coordinates.
    pub fn add_node(&mut self, id: NodeId, lon: f64, lat: f64) -> NodeIndex {
        if let Some(&index) = self.node_lookup.get(&id) {
            return index;
        }
        let index = self.graph.add_node(StreetNode {
            id,
            geometry: Point::new(lon, lat),
        });
        self.node_lookup.insert(id, index);
        index
    }

    /// Adds a directed segment between two known intersections
    ///
    /// The segment gets the next free key for its node pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if either endpoint was never added.
    pub fn add_segment(
        &mut self,
        from: NodeId,
        to: NodeId,
        segment: SegmentInput,
    ) -> Result<EdgeIndex, Error> {
        let (source, target) = self.endpoints(from, to)?;
        let key = match self
            .graph
            .edges_connecting(source, target)
            .map(|edge| edge.weight().key)
            .max()
        {
            Some(max) => max.checked_add(1).ok_or_else(|| {
                Error::InvalidData(format!("too many parallel edges {from}->{to}"))
            })?,
            None => 0,
        };

        Ok(self
            .graph
            .add_edge(source, target, StreetEdge { key, segment }))
    }

    /// Adds a directed segment with a key supplied by the data provider
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if either endpoint was never added and
    /// [`Error::InvalidData`] if the node pair already has an edge with `key`.
    pub fn add_keyed_segment(
        &mut self,
        from: NodeId,
        to: NodeId,
        key: u32,
        segment: SegmentInput,
    ) -> Result<EdgeIndex, Error> {
        let (source, target) = self.endpoints(from, to)?;
        if self
            .graph
            .edges_connecting(source, target)
            .any(|edge| edge.weight().key == key)
        {
            return Err(Error::InvalidData(format!(
                "duplicate edge {from}->{to} with key {key}"
            )));
        }

        Ok(self
            .graph
            .add_edge(source, target, StreetEdge { key, segment }))
    }

    fn endpoints(&self, from: NodeId, to: NodeId) -> Result<(NodeIndex, NodeIndex), Error> {
        let source = self.node_index(from).ok_or(Error::UnknownNode(from))?;
        let target = self.node_index(to).ok_or(Error::UnknownNode(to))?;
        Ok((source, target))
    }

    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_lookup.get(&id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn graph(&self) -> &StreetGraph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_edges_get_distinct_keys() {
        let mut network = StreetNetwork::new();
        network.add_node(1, 0.0, 0.0);
        network.add_node(2, 0.001, 0.0);

        let first = network.add_segment(1, 2, SegmentInput::default()).unwrap();
        let second = network.add_segment(1, 2, SegmentInput::default()).unwrap();
        let reverse = network.add_segment(2, 1, SegmentInput::default()).unwrap();

        assert_eq!(network.graph()[first].key, 0);
        assert_eq!(network.graph()[second].key, 1);
        assert_eq!(network.graph()[reverse].key, 0);
        assert_eq!(network.edge_count(), 3);
    }

    #[test]
    fn provider_keys_are_kept_and_never_reused() {
        let mut network = StreetNetwork::new();
        network.add_node(1, 0.0, 0.0);
        network.add_node(2, 0.001, 0.0);

        let keyed = network
            .add_keyed_segment(1, 2, 3, SegmentInput::default())
            .unwrap();
        let next = network.add_segment(1, 2, SegmentInput::default()).unwrap();
        let duplicate = network.add_keyed_segment(1, 2, 3, SegmentInput::default());

        assert_eq!(network.graph()[keyed].key, 3);
        assert_eq!(network.graph()[next].key, 4);
        assert!(matches!(duplicate, Err(Error::InvalidData(_))));
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let mut network = StreetNetwork::new();
        network.add_node(1, 0.0, 0.0);

        let result = network.add_segment(1, 42, SegmentInput::default());
        assert!(matches!(result, Err(Error::UnknownNode(42))));
    }

    #[test]
    fn re_adding_node_keeps_first_position() {
        let mut network = StreetNetwork::new();
        let a = network.add_node(7, 1.0, 2.0);
        let b = network.add_node(7, 5.0, 5.0);

        assert_eq!(a, b);
        assert_eq!(network.graph()[a].geometry, Point::new(1.0, 2.0));
    }
}
