use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::state::State;
use crate::model::{ScoredEdge, ScoredGraph};

/// Node and edge sequence of a shortest path
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShortestPath {
    pub(crate) nodes: Vec<NodeIndex>,
    pub(crate) edges: Vec<EdgeIndex>,
    pub(crate) cost: f64,
}

/// Dijkstra's algorithm from `start` to `target` over the directed multigraph
///
/// Among parallel edges the cheapest one is taken, ties going to the lower
/// edge index. Edge costs must be non-negative; non-finite costs make an
/// edge impassable. Returns `None` when `target` is unreachable.
pub(crate) fn shortest_path<F>(
    graph: &ScoredGraph,
    start: NodeIndex,
    target: NodeIndex,
    edge_cost: F,
) -> Option<ShortestPath>
where
    F: Fn(&ScoredEdge) -> f64,
{
    let node_count = graph.node_count();
    if start.index() >= node_count || target.index() >= node_count {
        return None;
    }

    let mut distances = vec![f64::INFINITY; node_count];
    let mut predecessors: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; node_count];
    let mut settled = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::with_capacity(node_count.min(1000) / 4);

    distances[start.index()] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: start,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if settled.put(node.index()) {
            continue;
        }
        if node == target {
            break;
        }

        for edge in graph.edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }
            let weight = edge_cost(edge.weight());
            if !weight.is_finite() || weight < 0.0 {
                continue;
            }
            let next_cost = cost + weight;
            let best = distances[next.index()];

            if next_cost < best {
                distances[next.index()] = next_cost;
                predecessors[next.index()] = Some((node, edge.id()));
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            } else if next_cost == best
                && let Some((prev, prev_edge)) = predecessors[next.index()]
                && prev == node
                && edge.id() < prev_edge
            {
                // Equal-cost parallel edge: keep the lower index
                predecessors[next.index()] = Some((node, edge.id()));
            }
        }
    }

    if !settled.contains(target.index()) {
        return None;
    }

    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut current = target;
    while current != start {
        let (prev, edge) = predecessors[current.index()]?;
        edges.push(edge);
        nodes.push(prev);
        current = prev;
    }
    nodes.reverse();
    edges.reverse();

    Some(ShortestPath {
        nodes,
        edges,
        cost: distances[target.index()],
    })
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Point};

    use super::*;
    use crate::model::{EdgeScores, StreetNode};

    fn edge(travel_time: f64) -> ScoredEdge {
        ScoredEdge {
            key: 0,
            geometry: LineString::new(vec![]),
            length: 100.0,
            speed_kph: 36.0,
            travel_time,
            name: None,
            scores: EdgeScores {
                light_count: 0,
                curve_score: 0.0,
                darkness_score: 1.0,
                highway_risk: 0.0,
                land_risk: 0.6,
                highway_tag: None,
                land_label: "Unknown".to_string(),
                safety_score: 42.0,
                optimized_weight: travel_time,
            },
        }
    }

    fn graph(nodes: usize, edges: &[(usize, usize, f64)]) -> ScoredGraph {
        let mut graph = ScoredGraph::default();
        for id in 0..nodes {
            graph.add_node(StreetNode {
                id: id as i64,
                geometry: Point::new(0.0, 0.0),
            });
        }
        for &(from, to, time) in edges {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), edge(time));
        }
        graph
    }

    #[test]
    fn finds_cheaper_detour() {
        let graph = graph(3, &[(0, 2, 10.0), (0, 1, 3.0), (1, 2, 3.0)]);
        let path = shortest_path(&graph, NodeIndex::new(0), NodeIndex::new(2), |e| e.travel_time)
            .unwrap();

        assert_eq!(path.nodes, vec![NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(2)]);
        assert_eq!(path.edges.len(), 2);
        assert_eq!(path.cost, 6.0);
    }

    #[test]
    fn picks_cheapest_parallel_edge() {
        let graph = graph(2, &[(0, 1, 9.0), (0, 1, 4.0), (0, 1, 4.0)]);
        let path = shortest_path(&graph, NodeIndex::new(0), NodeIndex::new(1), |e| e.travel_time)
            .unwrap();

        assert_eq!(path.edges, vec![EdgeIndex::new(1)]);
        assert_eq!(path.cost, 4.0);
    }

    #[test]
    fn respects_edge_direction() {
        let graph = graph(2, &[(1, 0, 1.0)]);
        assert!(
            shortest_path(&graph, NodeIndex::new(0), NodeIndex::new(1), |e| e.travel_time)
                .is_none()
        );
    }

    #[test]
    fn start_equals_target() {
        let graph = graph(1, &[]);
        let path = shortest_path(&graph, NodeIndex::new(0), NodeIndex::new(0), |e| e.travel_time)
            .unwrap();
        assert_eq!(path.nodes, vec![NodeIndex::new(0)]);
        assert!(path.edges.is_empty());
    }

    #[test]
    fn out_of_range_nodes_have_no_path() {
        let graph = graph(1, &[]);
        assert!(
            shortest_path(&graph, NodeIndex::new(0), NodeIndex::new(7), |e| e.travel_time)
                .is_none()
        );
    }
}
