use geo::{Coord, LineString};
use geojson::{Feature, Geometry, Value as GeoJsonValue};
use itertools::Itertools;
use serde_json::json;

use super::dual::{DualRoute, Route, RouteOutcome};
use crate::Error;
use crate::model::ScoredNetwork;

impl Route {
    /// Path of the route as one line, shared vertices between consecutive
    /// edges appear once
    pub fn geometry(&self, network: &ScoredNetwork) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = self
            .edges
            .iter()
            .filter_map(|&edge| network.edge(edge))
            .flat_map(|edge| edge.geometry.0.iter().copied())
            .dedup()
            .collect();

        if coords.is_empty()
            && let Some(node) = self.nodes.first().and_then(|&index| network.node(index))
        {
            coords.push(node.geometry.0);
        }

        LineString::new(coords)
    }

    /// Converts the route to a `GeoJSON` `LineString` feature
    pub fn to_feature(&self, network: &ScoredNetwork, route_type: &str) -> Result<Feature, Error> {
        let geometry = Geometry::new(GeoJsonValue::from(&self.geometry(network)));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "route_type": route_type,
                "nodes": self.node_ids(network),
                "distance_m": self.summary.distance_m,
                "travel_time_s": self.summary.travel_time_s,
                "danger_exposure": self.summary.danger_exposure,
                "avg_speed_kmh": self.summary.avg_speed_kmh,
            }
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

impl DualRoute {
    /// Found routes as features tagged `fastest` and `safest`
    pub fn to_features(&self, network: &ScoredNetwork) -> Result<Vec<Feature>, Error> {
        [("fastest", &self.fastest), ("safest", &self.safest)]
            .into_iter()
            .filter_map(|(route_type, outcome)| match outcome {
                RouteOutcome::Found(route) => Some(route.to_feature(network, route_type)),
                RouteOutcome::NotFound => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use crate::model::{SegmentInput, StreetNetwork};
    use crate::routing::{SafetyAlpha, dual_routes};
    use crate::scoring::{ScoringConfig, land_cover::NoLandCover, score_network};

    #[test]
    fn route_geometry_skips_shared_vertices() {
        let mut network = StreetNetwork::new();
        network.add_node(1, 0.0, 0.0);
        network.add_node(2, 0.001, 0.0);
        network.add_node(3, 0.002, 0.0);
        network
            .add_segment(
                1,
                2,
                SegmentInput::default().with_geometry(line_string![
                    (x: 0.0, y: 0.0),
                    (x: 0.0005, y: 0.0001),
                    (x: 0.001, y: 0.0)
                ]),
            )
            .unwrap();
        network.add_segment(2, 3, SegmentInput::default()).unwrap();
        let (scored, _) =
            score_network(network, &[], &NoLandCover, &ScoringConfig::default()).unwrap();

        let routes = dual_routes(&scored, 1, 3, SafetyAlpha::default()).unwrap();
        let route = routes.fastest.route().unwrap();
        assert_eq!(route.geometry(&scored).0.len(), 4);

        let feature = route.to_feature(&scored, "fastest").unwrap();
        let properties = feature.properties.unwrap();
        assert_eq!(properties["route_type"], "fastest");
        assert_eq!(properties["nodes"], serde_json::json!([1, 2, 3]));

        assert_eq!(routes.to_features(&scored).unwrap().len(), 2);
    }
}
